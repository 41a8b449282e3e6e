//! List Products Handler

use std::{str::FromStr, sync::Arc};

use salvo::{oapi::extract::QueryParam, prelude::*};

use pawcart_app::domain::catalog::{
    data::{ProductFilter, ProductSort},
    records::Species,
};

use crate::{
    extensions::*,
    products::{errors::into_status_error, handlers::ProductResponse},
    state::State,
};

/// List Products Handler
///
/// Browse the catalog. `species` is `dog`, `cat` or `both`. `sort` is `recent`, `price_asc`
/// or `price_desc`. Prices are centavos and bound the cheapest active variant.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Matching products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed query parameter"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[expect(clippy::too_many_arguments, reason = "one extractor per documented query parameter")]
pub(crate) async fn handler(
    q: QueryParam<String, false>,
    species: QueryParam<String, false>,
    in_stock: QueryParam<String, false>,
    min_price: QueryParam<String, false>,
    max_price: QueryParam<String, false>,
    sort: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    offset: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let defaults = ProductFilter::default();

    let filter = ProductFilter {
        search: q.into_inner(),
        species: parse_species(species.into_inner())?,
        in_stock: parse("in_stock", in_stock.into_inner())?.unwrap_or(false),
        min_price: parse("min_price", min_price.into_inner())?,
        max_price: parse("max_price", max_price.into_inner())?,
        sort: parse_sort(sort.into_inner())?,
        limit: parse("limit", limit.into_inner())?.unwrap_or(defaults.limit),
        offset: parse("offset", offset.into_inner())?.unwrap_or(defaults.offset),
    };

    let products = state
        .app
        .catalog
        .list_products(filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

fn invalid(name: &str) -> StatusError {
    StatusError::bad_request().brief(format!("Invalid \"{name}\" query parameter"))
}

fn parse<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>, StatusError> {
    raw.map(|value| value.trim().parse::<T>())
        .transpose()
        .map_err(|_unparsed| invalid(name))
}

/// `both` and an absent parameter list every species.
fn parse_species(raw: Option<String>) -> Result<Option<Species>, StatusError> {
    match raw.as_deref().map(str::trim) {
        None | Some("" | "both") => Ok(None),
        Some("dog") => Ok(Some(Species::Dog)),
        Some("cat") => Ok(Some(Species::Cat)),
        Some(_) => Err(invalid("species")),
    }
}

fn parse_sort(raw: Option<String>) -> Result<ProductSort, StatusError> {
    match raw.as_deref().map(str::trim) {
        None | Some("" | "recent") => Ok(ProductSort::Recent),
        Some("price_asc") => Ok(ProductSort::PriceAsc),
        Some("price_desc") => Ok(ProductSort::PriceDesc),
        Some(_) => Err(invalid("sort")),
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use pawcart_app::domain::catalog::MockCatalogService;

    use crate::test_helpers::{TestApp, make_product, public_service};

    use super::*;

    fn make_service(catalog: MockCatalogService) -> Service {
        let app = TestApp {
            catalog,
            ..TestApp::default()
        };

        public_service(app, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn bare_listing_uses_default_filter() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_list_products()
            .once()
            .with(eq(ProductFilter::default()))
            .return_once(|_| Ok(vec![make_product("racao-golden"), make_product("coleira")]));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Vec<ProductResponse> = res.take_json().await?;

        assert_eq!(
            body.iter().map(|product| product.slug.as_str()).collect::<Vec<_>>(),
            ["racao-golden", "coleira"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn query_parameters_build_the_filter() -> TestResult {
        let expected = ProductFilter {
            search: Some("golden".to_string()),
            species: Some(Species::Dog),
            in_stock: true,
            min_price: Some(10_00),
            max_price: Some(200_00),
            sort: ProductSort::PriceDesc,
            limit: 12,
            offset: 24,
        };

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_list_products()
            .once()
            .with(eq(expected))
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get(
            "http://example.com/products?q=golden&species=dog&in_stock=true\
             &min_price=1000&max_price=20000&sort=price_desc&limit=12&offset=24",
        )
        .send(&make_service(catalog))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn both_species_means_no_species_filter() {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_list_products()
            .once()
            .withf(|filter| filter.species.is_none())
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/products?species=both")
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn malformed_parameters_return_400() {
        for query in ["species=bird", "sort=popular", "limit=-1", "in_stock=maybe", "min_price=1.5"]
        {
            let mut catalog = MockCatalogService::new();

            catalog.expect_list_products().never();

            let res = TestClient::get(format!("http://example.com/products?{query}"))
                .send(&make_service(catalog))
                .await;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST), "{query}");
        }
    }
}
