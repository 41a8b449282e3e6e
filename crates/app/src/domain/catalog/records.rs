//! Catalog Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Raised when a species string is not one the catalog stores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown species {0:?}")]
pub struct UnknownSpecies(String);

/// Which pets a product is meant for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Species {
    Dog,
    Cat,
    /// Suitable for any pet
    #[default]
    General,
}

impl Species {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dog => "CACHORRO",
            Self::Cat => "GATO",
            Self::General => "GERAL",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = UnknownSpecies;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CACHORRO" => Ok(Self::Dog),
            "GATO" => Ok(Self::Cat),
            "GERAL" => Ok(Self::General),
            other => Err(UnknownSpecies(other.to_string())),
        }
    }
}

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub species: Species,
    pub active: bool,
    pub variants: Vec<VariantRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Variant Record
///
/// The sellable unit: price and stock live here, not on the product.
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub price: u64,
    pub compare_at_price: Option<u64>,
    pub stock: u32,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A variant row locked for the duration of an order commit.
#[derive(Debug, Clone)]
pub(crate) struct LockedVariant {
    pub uuid: VariantUuid,
    pub stock: u32,
    pub available: bool,
}
