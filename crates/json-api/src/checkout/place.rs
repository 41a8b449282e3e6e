//! Place Order Handler

use rust_decimal::Decimal;
use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use pawcart_app::domain::{
    addresses::records::AddressUuid,
    checkout::{CheckoutServiceError, data::CommitOrder, records::PlacedOrder},
    payments::records::{PaymentMethod, PaymentRecord},
};

use crate::{
    checkout::{AmountsResponse, Rejection, caller, non_blank, respond, state},
    money::major_units,
    observability::CheckoutOutcome,
};

const MISSING_FIELDS: &str = "Missing required fields: address_id and payment_method";

/// Place Order Request
///
/// The cart is always the caller's active cart.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaceOrderRequest {
    #[serde(default)]
    pub address_id: Option<String>,

    #[serde(default)]
    pub payment_method: Option<String>,

    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Payment opened for a new order.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct PaymentResponse {
    pub provider: String,
    pub status: String,
    /// Reference the customer quotes to the payment provider
    pub reference: String,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        Self {
            provider: payment.provider,
            status: payment.status.as_str().to_string(),
            reference: payment.external_id,
        }
    }
}

/// Place Order Response
#[derive(Debug, Serialize)]
pub(crate) struct PlaceOrderResponse {
    pub order_id: Uuid,
    pub order_number: i64,

    #[serde(flatten)]
    pub amounts: AmountsResponse,

    /// Flat shipping already included in `total`
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,

    pub payment: PaymentResponse,
}

impl From<PlacedOrder> for PlaceOrderResponse {
    fn from(PlacedOrder { order, payment }: PlacedOrder) -> Self {
        Self {
            order_id: order.uuid.into(),
            order_number: order.number,
            amounts: AmountsResponse {
                subtotal: major_units(order.subtotal),
                discount: major_units(order.discount),
                total: major_units(order.total),
            },
            shipping: major_units(order.shipping_cost),
            payment: payment.into(),
        }
    }
}

/// Place Order Handler
///
/// Commits the caller's active cart and opens a stub payment for the order.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = place(req, depot).await;

    respond("place_order", res, result);
}

async fn place(req: &mut Request, depot: &Depot) -> Result<PlaceOrderResponse, Rejection> {
    let state = state(depot)?;
    let user = caller(req, &state, "User not authenticated").await?;

    let request = req
        .parse_json::<PlaceOrderRequest>()
        .await
        .map_err(|_ignored| Rejection::rejected(MISSING_FIELDS))?;

    let (Some(address), Some(method)) = (
        non_blank(request.address_id),
        non_blank(request.payment_method),
    ) else {
        return Err(Rejection::rejected(MISSING_FIELDS));
    };

    let address_uuid = address
        .trim()
        .parse::<AddressUuid>()
        .map_err(|_ignored| Rejection::rejected("address_id must be a valid UUID"))?;

    let payment_method = method
        .trim()
        .parse::<PaymentMethod>()
        .map_err(|_ignored| Rejection::rejected("payment_method must be one of: pix, card"))?;

    let placed = state
        .app
        .checkout
        .place_order(
            user,
            CommitOrder {
                address_uuid,
                payment_method,
                coupon_code: request.coupon_code,
            },
        )
        .await
        .map_err(into_rejection)?;

    info!(
        user = %user,
        order = %placed.order.uuid,
        number = placed.order.number,
        "order placed"
    );

    Ok(placed.into())
}

fn into_rejection(error: CheckoutServiceError) -> Rejection {
    match error {
        CheckoutServiceError::CartNotFound => {
            Rejection::rejected("Carrinho não encontrado ou inativo")
        }
        CheckoutServiceError::InsufficientStock(shortfalls) => Rejection::new(
            CheckoutOutcome::OutOfStock,
            "Alguns produtos não possuem estoque suficiente",
        )
        .with_variants(shortfalls),
        CheckoutServiceError::InvalidQuantity => {
            Rejection::rejected("Quantidade inválida no carrinho")
        }
        CheckoutServiceError::PaymentRecordFailed { order, number, .. } => {
            warn!(order = %order, number, "order placed without payment record");

            Rejection::new(
                CheckoutOutcome::PaymentFailed,
                "Failed to create payment record",
            )
            .with_order(order, number)
        }
        error @ (CheckoutServiceError::CouponNotFound
        | CheckoutServiceError::CouponIneligible(_)
        | CheckoutServiceError::EmptyCart
        | CheckoutServiceError::AddressNotFound) => Rejection::rejected(error.to_string()),
        error => Rejection::internal(&format!("failed to place order: {error}")),
    }
}
