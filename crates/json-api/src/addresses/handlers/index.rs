//! List Addresses Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    addresses::{errors::into_status_error, handlers::AddressResponse},
    extensions::*,
    state::State,
};

/// List Addresses Handler
///
/// The caller's delivery addresses, default first.
#[endpoint(
    tags("addresses"),
    summary = "List Addresses",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Delivery addresses"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<AddressResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(addresses.into_iter().map(AddressResponse::from).collect()))
}
