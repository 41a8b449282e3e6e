//! List Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, handlers::OrderResponse},
    state::State,
};

/// List Orders Handler
///
/// The caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order history"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use pawcart_app::domain::orders::MockOrdersService;

    use crate::test_helpers::{TEST_USER_UUID, TestApp, authed_service, make_order};

    use super::*;

    #[tokio::test]
    async fn list_returns_orders_in_service_order() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .with(eq(TEST_USER_UUID))
            .return_once(|_| Ok(vec![make_order(2), make_order(1)]));

        let app = TestApp {
            orders,
            ..TestApp::default()
        };

        let mut res = TestClient::get("http://example.com/orders")
            .send(&authed_service(app, Router::with_path("orders").get(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Vec<OrderResponse> = res.take_json().await?;
        let numbers: Vec<i64> = body.iter().map(|order| order.number).collect();

        assert_eq!(numbers, [2, 1]);
        assert_eq!(body.first().map(|order| order.total), Some(90_00));

        Ok(())
    }
}
