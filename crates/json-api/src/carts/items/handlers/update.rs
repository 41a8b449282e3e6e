//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Update Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New quantity; zero removes the item
    pub quantity: u32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Set Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    item: PathParam<Uuid>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .update_item_quantity(user, item.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use pawcart_app::domain::carts::{CartsServiceError, MockCartsService, records::CartItemUuid};

    use crate::test_helpers::{TEST_USER_UUID, TestApp, authed_service, make_cart};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        let app = TestApp {
            carts,
            ..TestApp::default()
        };

        authed_service(app, Router::with_path("cart/items/{item}").put(handler))
    }

    #[tokio::test]
    async fn zero_quantity_is_forwarded_and_returns_cart() -> TestResult {
        let item = CartItemUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_update_item_quantity()
            .once()
            .with(eq(TEST_USER_UUID), eq(item), eq(0))
            .return_once(|_, _, _| Ok(make_cart(Vec::new())));

        let mut res = TestClient::put(format!("http://example.com/cart/items/{item}"))
            .json(&json!({"quantity": 0}))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert!(body.items.is_empty(), "item should be gone");

        Ok(())
    }

    #[tokio::test]
    async fn foreign_item_returns_404() {
        let mut carts = MockCartsService::new();

        carts
            .expect_update_item_quantity()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/cart/items/{}", Uuid::now_v7()))
            .json(&json!({"quantity": 3}))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
