use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use crate::api::{AppState, DetailResponse, ListingResponse, RawHtmlResponse};
use crate::error::{Result, ScrapeError};
use crate::models::{PdpSelectors, SrpSelectors};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn scrape_raw(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<RawHtmlResponse>> {
    state.service.check_configured()?;

    let body = parse_body(body)?;
    let target_url = parse_target_url(require_url(&body)?)?;

    let result = state.service.fetch_raw(&target_url).await?;
    Ok(Json(RawHtmlResponse { result }))
}

pub async fn scrape_srp(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<ListingResponse>> {
    state.service.check_configured()?;

    let body = parse_body(body)?;
    let raw_url = require_url(&body)?;
    let selectors: SrpSelectors = require_selectors(&body, "SRP")?;
    selectors.validate()?;
    let target_url = parse_target_url(raw_url)?;
    let selectors = selectors.compile()?;

    let products = state
        .service
        .scrape_listing(&target_url, &selectors)
        .await?;
    Ok(Json(ListingResponse { products }))
}

pub async fn scrape_pdp(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<DetailResponse>> {
    state.service.check_configured()?;

    let body = parse_body(body)?;
    let raw_url = require_url(&body)?;
    let selectors: PdpSelectors = require_selectors(&body, "PDP")?;
    selectors.validate()?;
    let target_url = parse_target_url(raw_url)?;
    let selectors = selectors.compile()?;

    let details = state
        .service
        .scrape_details(&target_url, &selectors)
        .await?;
    Ok(Json(DetailResponse { details }))
}

fn parse_body(body: std::result::Result<Bytes, BytesRejection>) -> Result<Value> {
    // Rejections (e.g. an oversized body) still answer with the JSON error envelope.
    let body = body.map_err(|rejection| {
        ScrapeError::invalid_input(format!(
            "Could not read request body: {}",
            rejection.body_text()
        ))
    })?;

    serde_json::from_slice(&body).map_err(|e| {
        ScrapeError::invalid_input(format!("Request body must be valid JSON: {}", e))
    })
}

fn require_url(body: &Value) -> Result<&str> {
    body.get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ScrapeError::invalid_input("URL is required in the request body."))
}

fn parse_target_url(raw: &str) -> Result<Url> {
    Url::parse(raw.trim()).map_err(|_| ScrapeError::invalid_input("Invalid URL format provided."))
}

fn require_selectors<T: DeserializeOwned>(body: &Value, kind: &str) -> Result<T> {
    let selectors = body
        .get("selectors")
        .filter(|value| value.is_object())
        .ok_or_else(|| {
            ScrapeError::invalid_input(format!("{} selectors are required", kind))
        })?;

    serde_json::from_value(selectors.clone())
        .map_err(|e| ScrapeError::invalid_input(format!("Invalid {} selectors: {}", kind, e)))
}
