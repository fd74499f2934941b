use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

use seolens_core::moz::{
    JsonRpcRequest, JsonRpcResponse, KeywordDifficultyResult, SerpQueryData, SiteMetrics,
    SiteMetricsBySite, SiteMetricsMultipleResult, SiteMetricsResult, SiteQueriesData, SiteQuery,
    SiteQueryData, METHOD_KEYWORD_DIFFICULTY, METHOD_METRICS_DISTRIBUTIONS, METHOD_SITE_METRICS,
    METHOD_SITE_METRICS_MULTIPLE,
};

use super::{create_client, optional_env, send_json};
use crate::error::ProviderRequestError;
use crate::prelude::*;

pub const VENDOR: &str = "moz";

const TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_HEADER: &str = "x-moz-token";

/// The two accepted credential forms.
#[derive(Debug, Clone, PartialEq)]
pub enum MozCredentials {
    /// Pre-encoded token, sent as is.
    Token(String),
    /// Access id and secret, sent as `base64("id:secret")`.
    Pair {
        access_id: String,
        secret_key: String,
    },
}

impl MozCredentials {
    /// Pick the single credential form that was supplied.
    ///
    /// Exactly one form must be present: both, neither or half a pair is a
    /// configuration error.
    pub fn resolve(
        token: Option<String>,
        access_id: Option<String>,
        secret_key: Option<String>,
    ) -> SeoResult<Self> {
        match (token, access_id, secret_key) {
            (Some(token), None, None) => Ok(Self::Token(token)),
            (None, Some(access_id), Some(secret_key)) => Ok(Self::Pair {
                access_id,
                secret_key,
            }),
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::Config(
                "Set either MOZ_TOKEN or MOZ_ACCESS_ID/MOZ_SECRET_KEY, not both".to_string(),
            )),
            (None, Some(_), None) | (None, None, Some(_)) => Err(Error::Config(
                "MOZ_ACCESS_ID and MOZ_SECRET_KEY must be set together".to_string(),
            )),
            (None, None, None) => Err(Error::Config(
                "Neither MOZ_TOKEN nor MOZ_ACCESS_ID/MOZ_SECRET_KEY environment variables are set"
                    .to_string(),
            )),
        }
    }

    /// The value sent in the token header.
    pub fn token(&self) -> String {
        use base64::{engine::general_purpose::STANDARD, Engine};

        match self {
            Self::Token(token) => token.clone(),
            Self::Pair {
                access_id,
                secret_key,
            } => STANDARD.encode(format!("{access_id}:{secret_key}")),
        }
    }
}

/// Site-authority vendor configuration from environment variables
#[derive(Debug, Clone)]
pub struct MozConfig {
    pub base_url: String,
    pub credentials: MozCredentials,
}

impl MozConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.moz.com";

    /// Load configuration from environment variables
    /// Uses MOZ_TOKEN, or MOZ_ACCESS_ID together with MOZ_SECRET_KEY
    /// Uses MOZ_BASE_URL with default fallback
    pub fn from_env() -> SeoResult<Self> {
        Ok(Self {
            base_url: optional_env("MOZ_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            credentials: MozCredentials::resolve(
                optional_env("MOZ_TOKEN"),
                optional_env("MOZ_ACCESS_ID"),
                optional_env("MOZ_SECRET_KEY"),
            )?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MozClient {
    client: reqwest::Client,
    endpoint: String,
}

impl MozClient {
    pub fn new(config: MozConfig) -> SeoResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(TOKEN_HEADER),
            HeaderValue::from_str(&config.credentials.token())
                .map_err(|e| Error::Config(format!("Invalid header value: {e}")))?,
        );

        Ok(Self {
            client: create_client(headers, TIMEOUT)?,
            endpoint: format!("{}/jsonrpc", config.base_url.trim_end_matches('/')),
        })
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        data: P,
    ) -> Result<R, ProviderRequestError> {
        let request = self
            .client
            .post(&self.endpoint)
            .json(&JsonRpcRequest::new(method, data));

        let response: JsonRpcResponse<R> = send_json(VENDOR, method, request).await?;

        response
            .into_result()
            .map_err(|message| ProviderRequestError::new(VENDOR, method, message))
    }

    /// Authority and link metrics for a whole domain
    pub async fn site_metrics(&self, domain: &str) -> Result<SiteMetrics, ProviderRequestError> {
        let result: SiteMetricsResult = self
            .call(
                METHOD_SITE_METRICS,
                SiteQueryData {
                    site_query: SiteQuery::domain(domain),
                },
            )
            .await?;
        Ok(result.site_metrics)
    }

    /// Metrics for several URLs in one call
    pub async fn site_metrics_batch(
        &self,
        urls: &[String],
    ) -> Result<Vec<SiteMetricsBySite>, ProviderRequestError> {
        let result: SiteMetricsMultipleResult = self
            .call(
                METHOD_SITE_METRICS_MULTIPLE,
                SiteQueriesData {
                    site_queries: urls.iter().map(|url| SiteQuery::url(url)).collect(),
                },
            )
            .await?;
        Ok(result.results_by_site)
    }

    /// Distribution buckets for a domain, passed through untouched
    pub async fn metrics_distributions(
        &self,
        domain: &str,
    ) -> Result<serde_json::Value, ProviderRequestError> {
        self.call(
            METHOD_METRICS_DISTRIBUTIONS,
            SiteQueryData {
                site_query: SiteQuery::domain(domain),
            },
        )
        .await
    }

    /// Vendor keyword difficulty for a `language-COUNTRY` locale
    pub async fn keyword_difficulty(
        &self,
        keyword: &str,
        locale: &str,
    ) -> Result<Option<u8>, ProviderRequestError> {
        let data = SerpQueryData::new(keyword, locale);
        let result: KeywordDifficultyResult = self.call(METHOD_KEYWORD_DIFFICULTY, data).await?;
        Ok(result.difficulty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_resolve_token_form() {
        let credentials = MozCredentials::resolve(some("abc"), None, None).unwrap();
        assert_eq!(credentials.token(), "abc");
    }

    #[test]
    fn test_resolve_pair_form_is_base64_encoded() {
        let credentials = MozCredentials::resolve(None, some("id"), some("secret")).unwrap();
        // base64("id:secret")
        assert_eq!(credentials.token(), "aWQ6c2VjcmV0");
    }

    #[test]
    fn test_resolve_rejects_both_forms() {
        let result = MozCredentials::resolve(some("abc"), some("id"), some("secret"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_rejects_half_pair() {
        assert!(matches!(
            MozCredentials::resolve(None, some("id"), None),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            MozCredentials::resolve(None, None, some("secret")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_no_credentials() {
        assert!(matches!(
            MozCredentials::resolve(None, None, None),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_site_metrics_sends_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jsonrpc"))
            .and(header("x-moz-token", "aWQ6c2VjcmV0"))
            .and(body_partial_json(serde_json::json!({
                "method": "data.site.metrics.fetch",
                "params": {"data": {"site_query": {"query": "example.com", "scope": "domain"}}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "id": "data.site.metrics.fetch",
                "result": {"site_metrics": {"domain_authority": 55, "spam_score": 2}}
            })))
            .mount(&server)
            .await;

        let client = MozClient::new(MozConfig {
            base_url: server.uri(),
            credentials: MozCredentials::resolve(None, some("id"), some("secret")).unwrap(),
        })
        .unwrap();

        let metrics = client.site_metrics("example.com").await.unwrap();
        assert_eq!(metrics.domain_authority, 55.0);
        assert_eq!(metrics.spam_score, 2.0);
    }

    #[tokio::test]
    async fn test_json_rpc_error_becomes_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jsonrpc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jsonrpc": "2.0",
                "error": {"code": -32602, "message": "invalid locale"}
            })))
            .mount(&server)
            .await;

        let client = MozClient::new(MozConfig {
            base_url: server.uri(),
            credentials: MozCredentials::Token("t".to_string()),
        })
        .unwrap();

        let err = client
            .keyword_difficulty("shoes", "xx-YY")
            .await
            .unwrap_err();
        assert_eq!(err.vendor, "moz");
        assert_eq!(err.operation, METHOD_KEYWORD_DIFFICULTY);
        assert!(err.message.contains("invalid locale"));
    }
}
