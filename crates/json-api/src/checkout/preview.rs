//! Checkout Preview Handler

use salvo::prelude::*;
use serde::Deserialize;

use pawcart_app::domain::{
    carts::records::CartUuid,
    checkout::{CheckoutServiceError, records::CheckoutTotals},
};

use crate::{
    checkout::{AmountsResponse, Rejection, caller, non_blank, respond, state},
    money::major_units,
};

/// Checkout Request
#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutRequest {
    #[serde(default)]
    pub cart_id: Option<String>,

    #[serde(default)]
    pub coupon_code: Option<String>,
}

impl From<CheckoutTotals> for AmountsResponse {
    fn from(totals: CheckoutTotals) -> Self {
        Self {
            subtotal: major_units(totals.subtotal),
            discount: major_units(totals.discount),
            total: major_units(totals.total),
        }
    }
}

/// Checkout Preview Handler
///
/// Prices the caller's cart with an optional coupon. Nothing is written.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = preview(req, depot).await;

    respond("checkout", res, result);
}

async fn preview(req: &mut Request, depot: &Depot) -> Result<AmountsResponse, Rejection> {
    let state = state(depot)?;
    let user = caller(req, &state, "Invalid authentication").await?;

    let request = req
        .parse_json::<CheckoutRequest>()
        .await
        .map_err(|_ignored| Rejection::rejected("cart_id is required"))?;

    let cart = non_blank(request.cart_id)
        .ok_or_else(|| Rejection::rejected("cart_id is required"))?
        .trim()
        .parse::<CartUuid>()
        .map_err(|_ignored| Rejection::rejected("cart_id must be a valid UUID"))?;

    let totals = state
        .app
        .checkout
        .preview_totals(user, cart, request.coupon_code)
        .await
        .map_err(into_rejection)?;

    Ok(totals.into())
}

fn into_rejection(error: CheckoutServiceError) -> Rejection {
    match error {
        CheckoutServiceError::CartNotFound => {
            Rejection::rejected("Cart not found or not accessible")
        }
        error @ (CheckoutServiceError::CouponNotFound
        | CheckoutServiceError::CouponIneligible(_)
        | CheckoutServiceError::InvalidQuantity) => {
            Rejection::rejected(format!("Error calculating totals: {error}"))
        }
        error => Rejection::internal(&format!("failed to calculate checkout totals: {error}")),
    }
}
