//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawcart_app::domain::carts::data::NewCartItem;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    pub variant_uuid: Uuid,

    /// Units to add; adding a variant already in the cart increases its quantity
    pub quantity: u32,
}

impl From<AddCartItemRequest> for NewCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        NewCartItem {
            variant_uuid: request.variant_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Add Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .add_item(user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use pawcart_app::domain::{
        carts::{CartsServiceError, MockCartsService},
        catalog::records::VariantUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, TestApp, authed_service, make_cart, make_cart_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        let app = TestApp {
            carts,
            ..TestApp::default()
        };

        authed_service(app, Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn add_item_returns_201() -> TestResult {
        let variant = VariantUuid::new();
        let cart = make_cart(vec![make_cart_item(50_00, 2)]);

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .with(
                eq(TEST_USER_UUID),
                eq(NewCartItem {
                    variant_uuid: variant,
                    quantity: 2,
                }),
            )
            .return_once(move |_, _| Ok(cart));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({"variant_uuid": variant.to_string(), "quantity": 2}))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_variant_returns_404() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::VariantNotFound));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({"variant_uuid": VariantUuid::new().to_string(), "quantity": 1}))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn zero_quantity_returns_400() {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InvalidQuantity));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({"variant_uuid": VariantUuid::new().to_string(), "quantity": 0}))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
