//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::OrderResponse},
    state::State,
};

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order with items and payment"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use pawcart_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::test_helpers::{TEST_USER_UUID, TestApp, authed_service, make_order, make_payment};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        let app = TestApp {
            orders,
            ..TestApp::default()
        };

        authed_service(app, Router::with_path("orders/{order}").get(handler))
    }

    #[tokio::test]
    async fn get_returns_snapshot_and_payment() -> TestResult {
        let mut order = make_order(1042);
        order.payment = Some(make_payment(&order));

        let uuid = order.uuid;

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .with(eq(TEST_USER_UUID), eq(uuid))
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(body.number, 1042);
        assert_eq!(body.status, "PENDING");
        assert_eq!(body.payment_method, "pix");
        assert_eq!(body.items.first().map(|item| item.total_price), Some(100_00));
        assert_eq!(
            body.payment.map(|payment| payment.status),
            Some("initiated".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn foreign_order_returns_404() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
