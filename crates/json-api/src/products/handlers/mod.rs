//! Product Handlers

pub(crate) mod get;
pub(crate) mod index;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawcart_app::domain::catalog::records::{ProductRecord, Species, VariantRecord};

/// Product Response
///
/// Prices are centavos.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub brand: Option<String>,

    /// `dog`, `cat` or `general`
    pub species: String,

    /// Active variants, cheapest first
    pub variants: Vec<VariantResponse>,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            uuid: product.uuid.into(),
            name: product.name,
            slug: product.slug,
            description: product.description,
            brand: product.brand,
            species: species_name(product.species).to_string(),
            variants: product.variants.into_iter().map(VariantResponse::from).collect(),
        }
    }
}

/// Variant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantResponse {
    pub uuid: Uuid,
    pub name: String,
    pub price: u64,

    /// List price shown struck through, when on sale
    pub compare_at_price: Option<u64>,

    pub stock: u32,
}

impl From<VariantRecord> for VariantResponse {
    fn from(variant: VariantRecord) -> Self {
        Self {
            uuid: variant.uuid.into(),
            name: variant.name,
            price: variant.price,
            compare_at_price: variant.compare_at_price,
            stock: variant.stock,
        }
    }
}

const fn species_name(species: Species) -> &'static str {
    match species {
        Species::Dog => "dog",
        Species::Cat => "cat",
        Species::General => "general",
    }
}
