//! Site-authority vendor models
//!
//! The vendor speaks JSON-RPC 2.0. Every method wraps its parameters in
//! `params.data` and returns a `result` object, or an `error` object in-band.

use serde::{Deserialize, Serialize};

pub const METHOD_SITE_METRICS: &str = "data.site.metrics.fetch";
pub const METHOD_SITE_METRICS_MULTIPLE: &str = "data.site.metrics.fetch.multiple";
pub const METHOD_METRICS_DISTRIBUTIONS: &str = "data.site.metrics.distributions.fetch";
pub const METHOD_KEYWORD_DIFFICULTY: &str = "data.keyword.metrics.difficulty.fetch";

// ============================================================================
// JSON-RPC envelope
// ============================================================================

#[derive(Debug, Serialize, Clone)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: String,
    pub params: JsonRpcParams<P>,
}

#[derive(Debug, Serialize, Clone)]
pub struct JsonRpcParams<P> {
    pub data: P,
}

impl<P> JsonRpcRequest<P> {
    pub fn new(method: &str, data: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id: method.to_string(),
            method: method.to_string(),
            params: JsonRpcParams { data },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JsonRpcErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl<R> JsonRpcResponse<R> {
    /// Unwrap the envelope, turning an in-band error or a missing result into a message.
    pub fn into_result(self) -> Result<R, String> {
        if let Some(error) = self.error {
            return Err(format!("JSON-RPC error {}: {}", error.code, error.message));
        }
        self.result
            .ok_or_else(|| "JSON-RPC response carried neither result nor error".to_string())
    }
}

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SiteQuery {
    pub query: String,
    pub scope: String,
}

impl SiteQuery {
    pub fn domain(domain: &str) -> Self {
        Self {
            query: domain.to_string(),
            scope: "domain".to_string(),
        }
    }

    pub fn url(url: &str) -> Self {
        Self {
            query: url.to_string(),
            scope: "url".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct SiteQueryData {
    pub site_query: SiteQuery,
}

#[derive(Debug, Serialize, Clone)]
pub struct SiteQueriesData {
    pub site_queries: Vec<SiteQuery>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SerpQuery {
    pub keyword: String,
    pub locale: String,
    pub device: String,
    pub engine: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct SerpQueryData {
    pub serp_query: SerpQuery,
}

impl SerpQueryData {
    pub fn new(keyword: &str, locale: &str) -> Self {
        Self {
            serp_query: SerpQuery {
                keyword: keyword.to_string(),
                locale: locale.to_string(),
                device: "desktop".to_string(),
                engine: "google".to_string(),
            },
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Authority and link metrics for one site query.
///
/// Every field defaults to zero so partial vendor payloads still deserialize.
/// Reads the vendor's snake_case fields and writes camelCase.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct SiteMetrics {
    pub page: Option<String>,
    pub root_domain: Option<String>,
    pub domain_authority: f64,
    pub page_authority: f64,
    pub spam_score: f64,
    pub link_propensity: f64,
    pub root_domains_to_root_domain: u64,
    pub indirect_root_domains_to_root_domain: u64,
    pub external_pages_to_root_domain: u64,
    pub root_domains_to_page: u64,
    pub external_pages_to_page: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteMetricsResult {
    #[serde(default)]
    pub site_metrics: SiteMetrics,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteMetricsMultipleResult {
    #[serde(default)]
    pub results_by_site: Vec<SiteMetricsBySite>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteMetricsBySite {
    #[serde(default)]
    pub site_query: Option<SiteQuery>,
    #[serde(default)]
    pub site_metrics: SiteMetrics,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeywordDifficultyResult {
    #[serde(default)]
    pub keyword_metrics: Option<KeywordMetrics>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeywordMetrics {
    #[serde(default)]
    pub difficulty: Option<f64>,
}

impl KeywordDifficultyResult {
    /// Vendor difficulty rounded into `[0, 100]`, if the vendor reported one.
    pub fn difficulty(&self) -> Option<u8> {
        self.keyword_metrics
            .as_ref()
            .and_then(|m| m.difficulty)
            .filter(|d| d.is_finite())
            .map(|d| d.round().clamp(0.0, 100.0) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = JsonRpcRequest::new(
            METHOD_SITE_METRICS,
            SiteQueryData {
                site_query: SiteQuery::domain("example.com"),
            },
        );

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["method"], "data.site.metrics.fetch");
        assert_eq!(
            value["params"]["data"]["site_query"]["query"],
            "example.com"
        );
        assert_eq!(value["params"]["data"]["site_query"]["scope"], "domain");
    }

    #[test]
    fn test_partial_site_metrics_default_to_zero() {
        let json = r#"{"result": {"site_metrics": {"domain_authority": 42}}}"#;
        let response: JsonRpcResponse<SiteMetricsResult> = serde_json::from_str(json).unwrap();

        let metrics = response.into_result().unwrap().site_metrics;
        assert_eq!(metrics.domain_authority, 42.0);
        assert_eq!(metrics.root_domains_to_root_domain, 0);
        assert_eq!(metrics.page, None);
    }

    #[test]
    fn test_in_band_error_is_reported() {
        let json = r#"{"error": {"code": 401, "message": "bad token"}}"#;
        let response: JsonRpcResponse<SiteMetricsResult> = serde_json::from_str(json).unwrap();

        let err = response.into_result().unwrap_err();
        assert!(err.contains("401"));
        assert!(err.contains("bad token"));
    }

    #[test]
    fn test_keyword_difficulty_rounding() {
        let json = r#"{"keyword_metrics": {"difficulty": 37.6}}"#;
        let result: KeywordDifficultyResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.difficulty(), Some(38));

        let missing: KeywordDifficultyResult = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.difficulty(), None);
    }
}
