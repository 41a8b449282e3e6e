//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{catalog::records::VariantUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart lifecycle. A cart is only mutated while `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStatus {
    Active,
    Converted,
    Abandoned,
}

impl CartStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Converted => "converted",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Cart Record
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub status: CartStatus,
    pub items: Vec<CartItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record
///
/// `unit_price` is the variant price captured when the item was first added.
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub variant_uuid: VariantUuid,
    pub product_name: String,
    pub variant_name: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
