use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use super::response::ApiResponse;
use super::AppState;
use crate::prelude::*;
use crate::seo::domain::{
    backlinks_data, domain_metrics_advanced_data, domain_metrics_data, BacklinksListOutput,
    DomainMetricsAdvancedOutput, DomainMetricsOutput,
};
use crate::seo::opportunity::{
    keyword_volume_data, opportunity_finder_data, KeywordVolumeOutput, OpportunityOutput,
    OpportunityParams, NO_KEYWORDS_MESSAGE,
};
use crate::seo::serp::{serp_competitors_data, SerpCompetitorsOutput, SerpCompetitorsParams};

type ApiResult<T> = std::result::Result<ApiResponse<T>, Error>;

// ============================================================================
// Request bodies
// ============================================================================
//
// Every field is optional at the serde level so a missing field is reported
// by name instead of as a generic deserialization failure.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerpCompetitorsRequest {
    pub keyword: Option<String>,
    pub location_code_google: Option<u32>,
    pub language_code: Option<String>,
    pub country_iso_code: Option<String>,
    pub fallback_locale: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRequest {
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklinksRequest {
    pub domain: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityFinderRequest {
    pub niche: Option<String>,
    pub sub_niche: Option<String>,
    pub business_model: Option<String>,
    pub google_language_code: Option<String>,
    pub google_location_code: Option<u32>,
    pub google_language_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordVolumeRequest {
    pub keywords: Option<Vec<String>>,
    pub google_language_code: Option<String>,
    pub google_location_code: Option<u32>,
}

fn require_text(field: &str, value: Option<String>) -> SeoResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::InvalidInput(f!("{field} is required")))
}

fn require<T>(field: &str, value: Option<T>) -> SeoResult<T> {
    value.ok_or_else(|| Error::InvalidInput(f!("{field} is required")))
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health() -> ApiResponse<serde_json::Value> {
    ApiResponse::ok(serde_json::json!({"status": "ok"}))
}

pub async fn serp_competitors(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SerpCompetitorsRequest>, JsonRejection>,
) -> ApiResult<SerpCompetitorsOutput> {
    let Json(request) = payload?;

    let params = SerpCompetitorsParams {
        keyword: require_text("keyword", request.keyword)?,
        location_code: require("locationCodeGoogle", request.location_code_google)?,
        language_code: require_text("languageCode", request.language_code)?,
        country_iso_code: request.country_iso_code,
        fallback_locale: request.fallback_locale,
    };

    let data = serp_competitors_data(&state.providers, params).await?;
    Ok(ApiResponse::ok(data))
}

pub async fn backlinks(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BacklinksRequest>, JsonRejection>,
) -> ApiResult<BacklinksListOutput> {
    let Json(request) = payload?;
    let domain = require_text("domain", request.domain)?;

    let data = backlinks_data(
        &state.providers,
        &domain,
        request.limit,
        request.offset,
        request.sort,
    )
    .await?;
    Ok(ApiResponse::ok(data))
}

pub async fn domain_metrics(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DomainRequest>, JsonRejection>,
) -> ApiResult<DomainMetricsOutput> {
    let Json(request) = payload?;
    let domain = require_text("domain", request.domain)?;

    let data = domain_metrics_data(&state.providers, &domain).await?;
    Ok(ApiResponse::ok(data))
}

pub async fn domain_metrics_advanced(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DomainRequest>, JsonRejection>,
) -> ApiResult<DomainMetricsAdvancedOutput> {
    let Json(request) = payload?;
    let domain = require_text("domain", request.domain)?;

    let data = domain_metrics_advanced_data(&state.providers, &domain).await?;
    Ok(ApiResponse::ok(data))
}

pub async fn opportunity_finder(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<OpportunityFinderRequest>, JsonRejection>,
) -> ApiResult<OpportunityOutput> {
    let Json(request) = payload?;

    let params = OpportunityParams {
        niche: require_text("niche", request.niche)?,
        sub_niche: request.sub_niche,
        business_model: request.business_model,
        language_code: require_text("googleLanguageCode", request.google_language_code)?,
        location_code: require("googleLocationCode", request.google_location_code)?,
        language_name: require_text("googleLanguageName", request.google_language_name)?,
    };

    let data = opportunity_finder_data(&state.providers, params).await?;
    if data.keywords.is_empty() {
        return Ok(ApiResponse::ok_with_message(data, NO_KEYWORDS_MESSAGE));
    }
    Ok(ApiResponse::ok(data))
}

pub async fn keyword_volume(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<KeywordVolumeRequest>, JsonRejection>,
) -> ApiResult<KeywordVolumeOutput> {
    let Json(request) = payload?;

    let keywords = require("keywords", request.keywords)?;
    let language_code = require_text("googleLanguageCode", request.google_language_code)?;
    let location_code = require("googleLocationCode", request.google_location_code)?;

    let data =
        keyword_volume_data(&state.providers, keywords, &language_code, location_code).await?;
    Ok(ApiResponse::ok(data))
}
