//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawcart_app::domain::carts::records::{CartItemRecord, CartRecord};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart, as sent to `POST /checkout`
    pub uuid: Uuid,

    /// Cart lifecycle status
    pub status: String,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// Sum of line totals in centavos, before any coupon
    pub subtotal: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        let subtotal = cart
            .items
            .iter()
            .map(|item| item.unit_price.saturating_mul(u64::from(item.quantity)))
            .fold(0_u64, u64::saturating_add);

        Self {
            uuid: cart.uuid.into(),
            status: cart.status.as_str().to_string(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The variant in the cart item
    pub variant_uuid: Uuid,

    pub product_name: String,

    pub variant_name: String,

    /// Price in centavos captured when the variant was first added
    pub unit_price: u64,

    pub quantity: u32,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            variant_uuid: item.variant_uuid.into(),
            product_name: item.product_name,
            variant_name: item.variant_name,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's active cart, creating an empty one on first use.
#[endpoint(
    tags("carts"),
    summary = "Get Active Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Active cart"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_active_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use pawcart_app::domain::carts::{CartsServiceError, MockCartsService};

    use crate::test_helpers::{TEST_USER_UUID, TestApp, authed_service, make_cart, make_cart_item};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        let app = TestApp {
            carts,
            ..TestApp::default()
        };

        authed_service(app, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn get_returns_active_cart_with_subtotal() -> TestResult {
        let cart = make_cart(vec![make_cart_item(19_90, 3), make_cart_item(7_45, 1)]);
        let uuid = cart.uuid;

        let mut carts = MockCartsService::new();

        carts
            .expect_get_active_cart()
            .once()
            .with(eq(TEST_USER_UUID))
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartResponse = res.take_json().await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "active");
        assert_eq!(body.items.len(), 2);
        assert_eq!(body.subtotal, 67_15);

        Ok(())
    }

    #[tokio::test]
    async fn storage_error_returns_500() {
        let mut carts = MockCartsService::new();

        carts
            .expect_get_active_cart()
            .once()
            .return_once(|_| Err(CartsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
