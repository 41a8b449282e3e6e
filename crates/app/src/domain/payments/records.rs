//! Payment Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::orders::records::OrderUuid, uuids::TypedUuid};

/// Payment UUID
pub type PaymentUuid = TypedUuid<PaymentRecord>;

/// Raised when a payment method or status string is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown payment {kind} {value:?}")]
pub struct UnknownPaymentValue {
    kind: &'static str,
    value: String,
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Pix,
    Card,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pix" => Ok(Self::Pix),
            "card" => Ok(Self::Card),
            other => Err(UnknownPaymentValue {
                kind: "method",
                value: other.to_string(),
            }),
        }
    }
}

/// Payment Status
///
/// Payments start `Initiated`; a provider webhook later settles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Initiated,
    Paid,
    Failed,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownPaymentValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "initiated" => Ok(Self::Initiated),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownPaymentValue {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Payment Record
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub uuid: PaymentUuid,
    pub order_uuid: OrderUuid,
    pub provider: String,
    pub method: PaymentMethod,
    pub amount: u64,
    pub status: PaymentStatus,
    /// Opaque reference handed to the customer and the provider.
    pub external_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
