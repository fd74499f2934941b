use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;

use seolens_core::backlinks::{
    AnchorItem, BacklinkItem, CompetitorDomainItem, DomainPageItem, HistoryItem, ItemsResult,
    ReferringDomainItem, SummaryResult, TargetTask,
};
use seolens_core::dataforseo::{
    TaskResponse, TaskResults, PATH_BACKLINKS_ANCHORS, PATH_BACKLINKS_HISTORY, PATH_BACKLINKS_LIST,
    PATH_BACKLINKS_SUMMARY, PATH_COMPETITORS_DOMAIN, PATH_DOMAIN_PAGES, PATH_KEYWORDS_FOR_KEYWORDS,
    PATH_REFERRING_DOMAINS, PATH_SEARCH_VOLUME, PATH_SERP_ORGANIC,
};
use seolens_core::keywords::{KeywordItem, KeywordsTask};
use seolens_core::serp::{SerpResult, SerpTask};

use super::{create_client, optional_env, required_env, send_json};
use crate::error::ProviderRequestError;
use crate::prelude::*;

pub const VENDOR: &str = "dataforseo";

const TIMEOUT: Duration = Duration::from_secs(60);

/// SERP vendor configuration from environment variables
#[derive(Debug, Clone)]
pub struct DataForSeoConfig {
    pub base_url: String,
    pub login: String,
    pub password: String,
}

impl DataForSeoConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.dataforseo.com";

    /// Load configuration from environment variables
    /// Uses DATAFORSEO_LOGIN and DATAFORSEO_PASSWORD for basic auth
    /// Uses DATAFORSEO_BASE_URL with default fallback
    pub fn from_env() -> SeoResult<Self> {
        Ok(Self {
            base_url: optional_env("DATAFORSEO_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            login: required_env("DATAFORSEO_LOGIN")?,
            password: required_env("DATAFORSEO_PASSWORD")?,
        })
    }
}

/// A list of items plus the vendor-reported cost of fetching it.
pub type CostedItems<T> = (Option<ItemsResult<T>>, f64);

#[derive(Debug, Clone)]
pub struct DataForSeoClient {
    client: reqwest::Client,
    base_url: String,
}

impl DataForSeoClient {
    pub fn new(config: DataForSeoConfig) -> SeoResult<Self> {
        use base64::Engine;

        let auth_string = format!("{}:{}", config.login, config.password);
        let auth_encoded = base64::engine::general_purpose::STANDARD.encode(&auth_string);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {auth_encoded}"))
                .map_err(|e| Error::Config(format!("Invalid header value: {e}")))?,
        );

        Ok(Self {
            client: create_client(headers, TIMEOUT)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Post a single task and flatten the results of the envelope
    async fn post<P: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        operation: &str,
        task: P,
    ) -> Result<TaskResults<R>, ProviderRequestError> {
        let url = format!("{}/{path}", self.base_url);
        let request = self.client.post(&url).json(&[task]);

        let response: TaskResponse<R> = send_json(VENDOR, operation, request).await?;

        response
            .into_results()
            .map_err(|message| ProviderRequestError::new(VENDOR, operation, message))
    }

    /// Post a task whose single result wraps an `items` list
    async fn post_items<R: DeserializeOwned>(
        &self,
        path: &str,
        operation: &str,
        task: TargetTask,
    ) -> Result<CostedItems<R>, ProviderRequestError> {
        let results: TaskResults<ItemsResult<R>> = self.post(path, operation, task).await?;
        let cost = results.cost;
        Ok((results.into_first(), cost))
    }

    /// Live organic Google results
    pub async fn serp_organic(
        &self,
        keyword: &str,
        location_code: u32,
        language_code: &str,
    ) -> Result<TaskResults<SerpResult>, ProviderRequestError> {
        self.post(
            PATH_SERP_ORGANIC,
            "serp_organic",
            SerpTask::new(keyword, location_code, language_code),
        )
        .await
    }

    /// Keyword ideas with concept annotations for a seed list
    pub async fn keywords_for_keywords(
        &self,
        task: KeywordsTask,
    ) -> Result<TaskResults<KeywordItem>, ProviderRequestError> {
        self.post(PATH_KEYWORDS_FOR_KEYWORDS, "keywords_for_keywords", task)
            .await
    }

    /// Search volume for exactly the given keywords
    pub async fn search_volume(
        &self,
        task: KeywordsTask,
    ) -> Result<TaskResults<KeywordItem>, ProviderRequestError> {
        self.post(PATH_SEARCH_VOLUME, "search_volume", task).await
    }

    pub async fn backlinks_summary(
        &self,
        task: TargetTask,
    ) -> Result<Option<SummaryResult>, ProviderRequestError> {
        let results = self
            .post::<_, SummaryResult>(PATH_BACKLINKS_SUMMARY, "backlinks_summary", task)
            .await?;
        Ok(results.into_first())
    }

    pub async fn backlinks_history(
        &self,
        task: TargetTask,
    ) -> Result<CostedItems<HistoryItem>, ProviderRequestError> {
        self.post_items(PATH_BACKLINKS_HISTORY, "backlinks_history", task)
            .await
    }

    pub async fn anchors(
        &self,
        task: TargetTask,
    ) -> Result<CostedItems<AnchorItem>, ProviderRequestError> {
        self.post_items(PATH_BACKLINKS_ANCHORS, "anchors", task)
            .await
    }

    pub async fn backlinks(
        &self,
        task: TargetTask,
    ) -> Result<CostedItems<BacklinkItem>, ProviderRequestError> {
        self.post_items(PATH_BACKLINKS_LIST, "backlinks", task)
            .await
    }

    pub async fn referring_domains(
        &self,
        task: TargetTask,
    ) -> Result<CostedItems<ReferringDomainItem>, ProviderRequestError> {
        self.post_items(PATH_REFERRING_DOMAINS, "referring_domains", task)
            .await
    }

    /// Pages of a domain, ordered by the caller's `order_by`
    pub async fn domain_pages(
        &self,
        task: TargetTask,
    ) -> Result<CostedItems<DomainPageItem>, ProviderRequestError> {
        self.post_items(PATH_DOMAIN_PAGES, "domain_pages", task)
            .await
    }

    /// Domains competing for the same organic keywords
    pub async fn competitors_domain(
        &self,
        task: TargetTask,
    ) -> Result<CostedItems<CompetitorDomainItem>, ProviderRequestError> {
        self.post_items(PATH_COMPETITORS_DOMAIN, "competitors_domain", task)
            .await
    }
}
