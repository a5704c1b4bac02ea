//! JSON endpoints in front of the scrape pipelines.
//!
//! Every handler answers either with its success envelope or with
//! `{"error": "..."}` and a 400/500 status; there is no partial success.

mod handlers;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::ScrapeError;
use crate::models::{ProductDetail, ProductSummary};
use crate::scrapers::ScrapeService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScrapeService>,
}

impl AppState {
    pub fn new(service: ScrapeService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/scrape", post(handlers::scrape_raw))
        .route("/api/scrape/srp", post(handlers::scrape_srp))
        .route("/api/scrape/pdp", post(handlers::scrape_pdp))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct RawHtmlResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub details: ProductDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ScrapeError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self {
            ScrapeError::InvalidInput(message) => warn!("Rejected request: {}", message),
            other => error!("Scrape request failed: {}", other),
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::scrapers::ScrapingBeeFetcher;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(server: &MockServer, api_key: Option<&str>) -> Router {
        let config = ProviderConfig {
            endpoint: format!("{}/api/v1/", server.uri()),
            api_key: api_key.map(str::to_string),
            render_js: false,
            block_resources: None,
        };
        let fetcher = ScrapingBeeFetcher::new(reqwest::Client::new(), config);
        router(AppState::new(ScrapeService::new(Arc::new(fetcher))))
    }

    async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn provider_serving(html: &str, expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("api_key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    fn pdp_selectors() -> Value {
        json!({
            "title": "h1",
            "price": ".price",
            "description": ".description",
            "specificationsTable": "table.specs",
            "specRowKey": "th",
            "specRowValue": "td",
            "mainImage": "img.hero",
            "imageAttribute": "data-src",
            "sku": ".sku"
        })
    }

    #[tokio::test]
    async fn srp_endpoint_returns_products() {
        let html = r#"
            <div class="item"><a href="/p/1"><span class="t">Rolex 1016</span></a>
                <span class="p">8.400 €</span><img data-src="/i/1.jpg" src="/s/1.jpg"></div>
            <div class="item"><span class="t">No link</span></div>
            <div class="item"><a href="/p/3"><span class="t">Omega 2998</span></a>
                <img src="/s/3.jpg"></div>
        "#;
        let server = provider_serving(html, 1).await;

        let body = json!({
            "url": "https://example.com/search",
            "selectors": {
                "productListItem": ".item", "title": ".t", "price": ".p",
                "link": "a", "imageUrl": "img", "imageAttribute": "data-src"
            }
        });
        let (status, json) = post_json(
            app(&server, Some("test-key")),
            "/api/scrape/srp",
            body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"products": [
                {"title": "Rolex 1016", "price": "8.400 €",
                 "link": "https://example.com/p/1", "imageUrl": "/i/1.jpg"},
                {"title": "Omega 2998", "price": null,
                 "link": "https://example.com/p/3", "imageUrl": "/s/3.jpg"}
            ]})
        );
    }

    #[tokio::test]
    async fn pdp_endpoint_returns_details() {
        let html = r#"
            <h1> IWC Mark XV </h1><div class="price">3.100 €</div>
            <p class="description">Box and papers.</p>
            <img class="hero" src="/hero.jpg">
            <table class="specs"><tr><th>Reference</th><td>3253</td></tr></table>
        "#;
        let server = provider_serving(html, 1).await;

        let body = json!({"url": "https://example.com/p/1", "selectors": pdp_selectors()});
        let (status, json) = post_json(
            app(&server, Some("test-key")),
            "/api/scrape/pdp",
            body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"details": {
                "title": "IWC Mark XV",
                "price": "3.100 €",
                "description": "Box and papers.",
                "specifications": {"Reference": "3253"},
                "mainImageUrl": "/hero.jpg",
                "sku": null
            }})
        );
    }

    #[tokio::test]
    async fn missing_pdp_selector_is_rejected_before_fetching() {
        let server = provider_serving("<html></html>", 0).await;

        let mut selectors = pdp_selectors();
        selectors.as_object_mut().unwrap().remove("description");
        let body = json!({"url": "https://example.com/p/1", "selectors": selectors});
        let (status, json) = post_json(
            app(&server, Some("test-key")),
            "/api/scrape/pdp",
            body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("description"));
    }

    #[tokio::test]
    async fn invalid_css_selector_is_rejected_before_fetching() {
        let server = provider_serving("<html></html>", 0).await;

        let mut selectors = pdp_selectors();
        selectors["specRowKey"] = json!("th[");
        let body = json!({"url": "https://example.com/p/1", "selectors": selectors});
        let (status, _) = post_json(
            app(&server, Some("test-key")),
            "/api/scrape/pdp",
            body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn input_errors_are_bad_requests() {
        let server = provider_serving("<html></html>", 0).await;
        let cases = [
            ("/api/scrape", json!({}).to_string()),
            ("/api/scrape", json!({"url": 42}).to_string()),
            ("/api/scrape", json!({"url": "not a url"}).to_string()),
            ("/api/scrape", "{not json".to_string()),
            ("/api/scrape/srp", json!({"url": "https://example.com"}).to_string()),
            (
                "/api/scrape/srp",
                json!({"url": "https://example.com", "selectors": "x"}).to_string(),
            ),
            (
                "/api/scrape/pdp",
                json!({"url": "relative/path", "selectors": pdp_selectors()}).to_string(),
            ),
        ];

        for (uri, body) in cases {
            let (status, json) = post_json(app(&server, Some("test-key")), uri, body.clone()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, body);
            assert!(json["error"].is_string());
        }
    }

    #[tokio::test]
    async fn oversized_body_keeps_the_error_envelope() {
        let server = provider_serving("<html></html>", 0).await;

        let body = format!(
            r#"{{"url": "https://example.com/", "note": "{}"}}"#,
            "x".repeat(3 * 1024 * 1024)
        );
        let (status, json) = post_json(app(&server, Some("test-key")), "/api/scrape", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Could not read request body"));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_server_error() {
        let server = provider_serving("<html></html>", 0).await;

        let body = json!({"url": "https://example.com"}).to_string();
        let (status, json) = post_json(app(&server, None), "/api/scrape", body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Server configuration error: API key missing.");
    }

    #[tokio::test]
    async fn upstream_failure_is_a_server_error_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(429).set_body_string(r#"{"message": "Too many requests"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = json!({"url": "https://example.com/search", "selectors": {
            "productListItem": ".item", "title": ".t", "price": ".p", "link": "a", "imageUrl": "img"
        }});
        let (status, json) = post_json(
            app(&server, Some("test-key")),
            "/api/scrape/srp",
            body.to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json,
            json!({"error": "Scraping provider error (429): Too many requests"})
        );
    }

    #[tokio::test]
    async fn raw_endpoint_passes_html_through() {
        let server = provider_serving("<html><body>rendered</body></html>", 1).await;

        let body = json!({"url": "https://example.com/"}).to_string();
        let (status, json) = post_json(app(&server, Some("test-key")), "/api/scrape", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"result": "<html><body>rendered</body></html>"}));
    }

    #[tokio::test]
    async fn health_endpoint() {
        let server = MockServer::start().await;
        let response = app(&server, None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
