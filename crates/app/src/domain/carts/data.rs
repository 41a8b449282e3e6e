//! Cart Data

use crate::domain::catalog::records::VariantUuid;

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub variant_uuid: VariantUuid,
    pub quantity: u32,
}
