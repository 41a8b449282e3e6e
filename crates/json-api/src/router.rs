//! App Router

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    catcher::Catcher,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Cors, CorsHandler},
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE, HeaderName},
    },
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{
    addresses, auth, carts, checkout, healthcheck, observability, orders, products, state::State,
};

/// The full HTTP service: routes, API docs and CORS.
pub(crate) fn service(state: Arc<State>) -> Service {
    let router = app_router(state);

    let doc = OpenApi::new("Pawcart API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    // Preflight requests match no route, so CORS sits on the service.
    Service::new(router)
        .catcher(Catcher::default().hoop(cors()))
        .hoop(cors())
}

pub(crate) fn app_router(state: Arc<State>) -> Router {
    Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(Router::with_path("checkout").post(checkout::preview::handler))
        .push(Router::with_path("place-order").post(checkout::place::handler))
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{slug}").get(products::get::handler)),
        )
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("cart").get(carts::get::handler).push(
                        Router::with_path("items")
                            .post(carts::items::create::handler)
                            .push(
                                Router::with_path("{item}")
                                    .put(carts::items::update::handler)
                                    .delete(carts::items::delete::handler),
                            ),
                    ),
                )
                .push(
                    Router::with_path("orders")
                        .get(orders::index::handler)
                        .push(Router::with_path("{order}").get(orders::get::handler)),
                )
                .push(
                    Router::with_path("addresses")
                        .get(addresses::index::handler)
                        .post(addresses::create::handler),
                ),
        )
}

/// Any origin, with the headers browser storefront clients send.
fn cors() -> CorsHandler {
    Cors::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]))
        .into_handler()
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN,
            ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
        },
        test::{ResponseExt, TestClient},
    };
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::test_helpers::TestApp;

    use super::*;

    fn make_service() -> Service {
        service(TestApp::default().into_state())
    }

    fn header(res: &salvo::Response, name: HeaderName) -> Option<String> {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    #[tokio::test]
    async fn preflight_allows_any_origin_and_client_headers() {
        let res = TestClient::options("http://example.com/place-order")
            .add_header(ORIGIN, "https://loja.example", true)
            .add_header(ACCESS_CONTROL_REQUEST_METHOD, "POST", true)
            .add_header(
                ACCESS_CONTROL_REQUEST_HEADERS,
                "authorization, x-client-info, apikey, content-type",
                true,
            )
            .send(&make_service())
            .await;

        assert_eq!(header(&res, ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(), Some("*"));

        let allowed = header(&res, ACCESS_CONTROL_ALLOW_HEADERS).unwrap_or_default();

        for name in ["authorization", "x-client-info", "apikey", "content-type"] {
            assert!(allowed.contains(name), "{name} missing from {allowed:?}");
        }
    }

    #[tokio::test]
    async fn checkout_failures_carry_cors_headers() -> TestResult {
        let mut res = TestClient::post("http://example.com/checkout")
            .add_header(ORIGIN, "https://loja.example", true)
            .json(&json!({"cart_id": "x"}))
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(header(&res, ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(), Some("*"));
        assert_eq!(
            res.take_json::<Value>().await?,
            json!({"error": "Invalid authentication"})
        );

        Ok(())
    }

    #[tokio::test]
    async fn supporting_routes_require_a_bearer_token() {
        for path in ["cart", "orders", "addresses"] {
            let res = TestClient::get(format!("http://example.com/{path}"))
                .send(&make_service())
                .await;

            assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "GET /{path}");
        }
    }

    #[tokio::test]
    async fn product_browsing_needs_no_token() {
        let mut app = TestApp::default();

        app.catalog
            .expect_list_products()
            .once()
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get("http://example.com/products")
            .send(&service(app.into_state()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn openapi_document_lists_supporting_routes() -> TestResult {
        let mut res = TestClient::get("http://example.com/api-doc/openapi.json")
            .send(&make_service())
            .await;

        let doc: Value = res.take_json().await?;
        let paths = doc.get("paths").and_then(Value::as_object).ok_or("no paths")?;

        for path in [
            "/cart",
            "/cart/items/{item}",
            "/orders/{order}",
            "/addresses",
            "/products",
            "/products/{slug}",
            "/healthcheck",
        ] {
            assert!(paths.contains_key(path), "{path} missing from openapi paths");
        }

        Ok(())
    }
}
