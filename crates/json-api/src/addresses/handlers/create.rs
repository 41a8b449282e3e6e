//! Create Address Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use pawcart_app::domain::addresses::{data::NewAddress, records::AddressUuid};

use crate::{
    addresses::{errors::into_status_error, handlers::AddressResponse},
    extensions::*,
    state::State,
};

/// Create Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAddressRequest {
    pub recipient: String,
    pub street: String,
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    /// Two-letter state code, e.g. `SP`
    pub state: String,
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateAddressRequest> for NewAddress {
    fn from(request: CreateAddressRequest) -> Self {
        NewAddress {
            uuid: AddressUuid::new(),
            recipient: request.recipient,
            street: request.street,
            number: request.number,
            complement: request.complement,
            district: request.district,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            is_default: request.is_default,
        }
    }
}

/// Create Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let address = state
        .app
        .addresses
        .create_address(user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, "/addresses", true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(address.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use pawcart_app::domain::addresses::{
        AddressesServiceError, MockAddressesService, records::AddressRecord,
    };

    use crate::test_helpers::{TEST_USER_UUID, TestApp, authed_service};

    use super::*;

    fn make_service(addresses: MockAddressesService) -> Service {
        let app = TestApp {
            addresses,
            ..TestApp::default()
        };

        authed_service(app, Router::with_path("addresses").post(handler))
    }

    fn body() -> serde_json::Value {
        json!({
            "recipient": "Ana Souza",
            "street": "Rua das Flores",
            "number": "123",
            "district": "Centro",
            "city": "São Paulo",
            "state": "SP",
            "postal_code": "01001-000",
        })
    }

    #[tokio::test]
    async fn create_returns_201_with_the_saved_address() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_create_address()
            .once()
            .withf(|user, address| {
                *user == TEST_USER_UUID && address.city == "São Paulo" && !address.is_default
            })
            .return_once(|user, address| {
                Ok(AddressRecord {
                    uuid: address.uuid,
                    user_uuid: user,
                    recipient: address.recipient,
                    street: address.street,
                    number: address.number,
                    complement: address.complement,
                    district: address.district,
                    city: address.city,
                    state: address.state,
                    postal_code: address.postal_code,
                    is_default: address.is_default,
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let mut res = TestClient::post("http://example.com/addresses")
            .json(&body())
            .send(&make_service(addresses))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let created: AddressResponse = res.take_json().await?;

        assert_eq!(created.recipient, "Ana Souza");

        Ok(())
    }

    #[tokio::test]
    async fn check_violation_returns_400() {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_create_address()
            .once()
            .return_once(|_, _| Err(AddressesServiceError::InvalidData));

        let res = TestClient::post("http://example.com/addresses")
            .json(&body())
            .send(&make_service(addresses))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
