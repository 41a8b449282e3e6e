//! Address Handlers

pub(crate) mod create;
pub(crate) mod index;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pawcart_app::domain::addresses::records::AddressRecord;

/// Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    /// Identifier sent as `address_id` to `POST /place-order`
    pub uuid: Uuid,
    pub recipient: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub is_default: bool,
}

impl From<AddressRecord> for AddressResponse {
    fn from(address: AddressRecord) -> Self {
        Self {
            uuid: address.uuid.into(),
            recipient: address.recipient,
            street: address.street,
            number: address.number,
            complement: address.complement,
            district: address.district,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            is_default: address.is_default,
        }
    }
}
