//! Get Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    extensions::*,
    products::{errors::into_status_error, handlers::ProductResponse},
    state::State,
};

/// Get Product Handler
///
/// An active product by slug, with its active variants.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product with variants"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    slug: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .catalog
        .get_product(&slug.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use pawcart_app::domain::catalog::{CatalogServiceError, MockCatalogService};

    use crate::test_helpers::{TestApp, make_product, public_service};

    use super::*;

    fn make_service(catalog: MockCatalogService) -> Service {
        let app = TestApp {
            catalog,
            ..TestApp::default()
        };

        public_service(app, Router::with_path("products/{slug}").get(handler))
    }

    #[tokio::test]
    async fn get_returns_product_with_variants() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .once()
            .with(eq("racao-golden"))
            .return_once(|slug| Ok(make_product(slug)));

        let mut res = TestClient::get("http://example.com/products/racao-golden")
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(body.slug, "racao-golden");
        assert_eq!(body.species, "dog");
        assert_eq!(
            body.variants.iter().map(|variant| variant.price).collect::<Vec<_>>(),
            [49_90, 189_90]
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_slug_returns_404() {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .once()
            .return_once(|_| Err(CatalogServiceError::NotFound));

        let res = TestClient::get("http://example.com/products/nao-existe")
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
