//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use pawcart_app::domain::catalog::CatalogServiceError;

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        CatalogServiceError::InvalidAmount(_) => {
            StatusError::bad_request().brief("Price filter out of range")
        }
        other => {
            error!("failed to read catalog: {other}");

            StatusError::internal_server_error()
        }
    }
}
