//! Checkout Handlers
//!
//! `POST /checkout` prices the caller's cart and `POST /place-order` turns it into an
//! order. Unlike the supporting routes, both answer every failure with
//! `400 {"error": "..."}`, and `/place-order` localizes the failures a shopper can act on.

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use pawcart_app::domain::{
    checkout::StockShortfall, orders::records::OrderUuid, users::records::UserUuid,
};

use crate::{
    auth::{BearerError, authenticate},
    observability::{CheckoutOutcome, observe_checkout},
    state::State,
};

pub(crate) mod place;
pub(crate) mod preview;

const INTERNAL_ERROR: &str = "Internal server error";

/// Failure body shared by both checkout routes.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ErrorResponse {
    /// Human-readable reason
    pub error: String,

    /// Set when the order was committed but its payment could not be opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,

    /// Customer-facing number of that order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<i64>,

    /// Every cart line that current stock cannot cover
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ShortfallResponse>,
}

/// A cart line short of stock.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct ShortfallResponse {
    pub variant_id: Uuid,
    pub requested: u32,
    pub available: u32,
}

impl From<StockShortfall> for ShortfallResponse {
    fn from(shortfall: StockShortfall) -> Self {
        Self {
            variant_id: shortfall.variant.into(),
            requested: shortfall.requested,
            available: shortfall.available,
        }
    }
}

/// Amounts in reais, serialized as JSON numbers.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct AmountsResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug)]
pub(crate) struct Rejection {
    outcome: CheckoutOutcome,
    body: ErrorResponse,
}

impl Rejection {
    fn new(outcome: CheckoutOutcome, message: impl Into<String>) -> Self {
        Self {
            outcome,
            body: ErrorResponse {
                error: message.into(),
                ..ErrorResponse::default()
            },
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self::new(CheckoutOutcome::Rejected, message)
    }

    /// Log `context` and answer with a generic message.
    fn internal(context: &str) -> Self {
        error!("{context}");

        Self::new(CheckoutOutcome::Error, INTERNAL_ERROR)
    }

    fn with_variants(mut self, shortfalls: Vec<StockShortfall>) -> Self {
        self.body.variants = shortfalls.into_iter().map(ShortfallResponse::from).collect();
        self
    }

    fn with_order(mut self, order: OrderUuid, number: i64) -> Self {
        self.body.order_id = Some(order.into());
        self.body.order_number = Some(number);
        self
    }
}

/// Shared state, or an internal rejection when it was never injected.
fn state(depot: &Depot) -> Result<Arc<State>, Rejection> {
    depot
        .obtain::<Arc<State>>()
        .cloned()
        .map_err(|_ignored| Rejection::internal("app state missing from depot"))
}

async fn caller(
    req: &Request,
    state: &State,
    unauthenticated: &'static str,
) -> Result<UserUuid, Rejection> {
    authenticate(req, state.app.auth.as_ref())
        .await
        .map_err(|error| match error {
            BearerError::Missing | BearerError::Invalid => {
                Rejection::new(CheckoutOutcome::Unauthenticated, unauthenticated)
            }
            BearerError::Internal => Rejection::new(CheckoutOutcome::Error, INTERNAL_ERROR),
        })
}

/// `None` for absent or blank values.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn respond<T>(operation: &str, res: &mut Response, result: Result<T, Rejection>)
where
    T: Serialize + Send,
{
    match result {
        Ok(body) => {
            observe_checkout(operation, CheckoutOutcome::Success);

            res.render(Json(body));
        }
        Err(rejection) => {
            observe_checkout(operation, rejection.outcome);

            res.status_code(StatusCode::BAD_REQUEST);
            res.render(Json(rejection.body));
        }
    }
}
