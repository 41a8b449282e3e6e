//! Catalog Data

use crate::domain::catalog::records::{ProductUuid, Species, VariantUuid};

/// Largest page a listing returns.
pub const MAX_PAGE_SIZE: u32 = 100;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub species: Species,
    pub variants: Vec<NewVariant>,
}

/// New Variant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub name: String,
    pub price: u64,
    pub compare_at_price: Option<u64>,
    pub stock: u32,
}

/// Variant Update Data
///
/// Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantUpdate {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub active: Option<bool>,
}

/// Listing order for products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Newest first
    #[default]
    Recent,
    /// Cheapest active variant first
    PriceAsc,
    /// Most expensive cheapest-variant first
    PriceDesc,
}

impl ProductSort {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

/// Product Filter
///
/// Only active products with at least one active variant are listed. Price bounds apply to
/// a product's cheapest active variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the name or description
    pub search: Option<String>,
    pub species: Option<Species>,
    /// Require an active variant with at least one unit in stock
    pub in_stock: bool,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub sort: ProductSort,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            species: None,
            in_stock: false,
            min_price: None,
            max_price: None,
            sort: ProductSort::default(),
            limit: 24,
            offset: 0,
        }
    }
}
