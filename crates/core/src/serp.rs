//! SERP competitor analysis
//!
//! Pure pieces of the competitor pipeline: organic item extraction, pairing
//! SERP items with their site metrics, and the response contract.

use serde::{Deserialize, Serialize};

use crate::moz::{SiteMetrics, SiteMetricsBySite};
use crate::scoring::{compute_popularity_score, compute_trust_score};

/// Number of SERP items that get site metrics and scores.
pub const COMPETITOR_LIMIT: usize = 10;

// ============================================================================
// Domain Models (Input from API)
// ============================================================================

#[derive(Debug, Serialize, Clone)]
pub struct SerpTask {
    pub keyword: String,
    pub location_code: u32,
    pub language_code: String,
    pub device: String,
    pub depth: u32,
}

impl SerpTask {
    pub fn new(keyword: &str, location_code: u32, language_code: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            location_code,
            language_code: language_code.to_string(),
            device: "desktop".to_string(),
            depth: COMPETITOR_LIMIT as u32,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SerpResult {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub se_results_count: Option<u64>,
    #[serde(default)]
    pub items: Option<Vec<SerpItem>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SerpItem {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub rank_group: Option<u32>,
    #[serde(default)]
    pub rank_absolute: Option<u32>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ============================================================================
// Output Models (Domain Model)
// ============================================================================

/// One ranking page with its metrics and derived authority scores.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorRecord {
    pub rank: u32,
    pub url: String,
    pub domain: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metrics: SiteMetrics,
    pub popularity_score: u8,
    pub trust_score: u8,
}

impl CompetitorRecord {
    pub fn new(
        rank: u32,
        url: String,
        domain: String,
        title: Option<String>,
        description: Option<String>,
        metrics: SiteMetrics,
    ) -> Self {
        let popularity_score = compute_popularity_score(&metrics);
        let trust_score = compute_trust_score(&metrics);
        Self {
            rank,
            url,
            domain,
            title,
            description,
            metrics,
            popularity_score,
            trust_score,
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DifficultySource {
    Vendor,
    Computed,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SerpCompetitorsOutput {
    pub keyword: String,
    pub location_code: u32,
    pub language_code: String,
    pub total_results: Option<u64>,
    pub keyword_difficulty: u8,
    pub difficulty_source: DifficultySource,
    /// Locale that produced the vendor difficulty, when one did.
    pub difficulty_locale: Option<String>,
    pub competitors: Vec<CompetitorRecord>,
}

// ============================================================================
// Pure Transformation Functions
// ============================================================================

/// Organic items across every SERP result, in vendor rank order.
pub fn organic_items(results: Vec<SerpResult>) -> Vec<SerpItem> {
    results
        .into_iter()
        .flat_map(|result| result.items.unwrap_or_default())
        .filter(|item| item.item_type == "organic" && item.url.is_some())
        .collect()
}

/// URLs of the items that will be scored.
pub fn competitor_urls(items: &[SerpItem]) -> Vec<String> {
    items
        .iter()
        .take(COMPETITOR_LIMIT)
        .filter_map(|item| item.url.clone())
        .collect()
}

/// Locales to try for the vendor difficulty lookup, in order.
///
/// The primary locale is `language-COUNTRY` when a country is known. The
/// fallback is only added when it differs from the primary.
pub fn difficulty_locales(
    language_code: &str,
    country_iso_code: Option<&str>,
    fallback_locale: Option<&str>,
) -> Vec<String> {
    let mut locales = Vec::with_capacity(2);

    if let Some(country) = country_iso_code.map(str::trim).filter(|c| !c.is_empty()) {
        locales.push(format!(
            "{}-{}",
            language_code.trim().to_lowercase(),
            country.to_uppercase()
        ));
    }

    if let Some(fallback) = fallback_locale.map(str::trim).filter(|f| !f.is_empty()) {
        if !locales.iter().any(|l| l.eq_ignore_ascii_case(fallback)) {
            locales.push(fallback.to_string());
        }
    }

    locales
}

/// Comparable form of a URL: no scheme, no `www.`, no trailing slash.
fn url_key(url: &str) -> String {
    let url = url.trim().to_lowercase();
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(&url);
    let url = url.strip_prefix("www.").unwrap_or(url);
    url.trim_end_matches('/').to_string()
}

/// Pair each SERP item with its metrics.
///
/// Entries that echo the URL they were queried for are matched by URL first.
/// Items left unmatched take the entry at their own position when that entry
/// is still unclaimed. Anything else gets zero-valued metrics.
pub fn pair_metrics(items: &[SerpItem], metrics: Vec<SiteMetricsBySite>) -> Vec<SiteMetrics> {
    let keys: Vec<Option<String>> = metrics
        .iter()
        .map(|m| m.site_query.as_ref().map(|q| url_key(&q.query)))
        .collect();
    let mut slots: Vec<Option<SiteMetrics>> =
        metrics.into_iter().map(|m| Some(m.site_metrics)).collect();

    let mut paired: Vec<Option<SiteMetrics>> = items
        .iter()
        .map(|item| {
            let key = item.url.as_deref().map(url_key)?;
            let index = (0..keys.len())
                .find(|&i| slots[i].is_some() && keys[i].as_deref() == Some(key.as_str()))?;
            slots[index].take()
        })
        .collect();

    for (index, entry) in paired.iter_mut().enumerate() {
        if entry.is_none() {
            *entry = slots.get_mut(index).and_then(Option::take);
        }
    }

    paired.into_iter().map(Option::unwrap_or_default).collect()
}

/// Build scored competitor records for the first [`COMPETITOR_LIMIT`] items.
pub fn build_competitors(
    items: &[SerpItem],
    metrics: Vec<SiteMetricsBySite>,
) -> Vec<CompetitorRecord> {
    let items = &items[..items.len().min(COMPETITOR_LIMIT)];
    let paired = pair_metrics(items, metrics);

    items
        .iter()
        .zip(paired)
        .enumerate()
        .map(|(index, (item, metrics))| {
            let url = item.url.clone().unwrap_or_default();
            let domain = item
                .domain
                .clone()
                .unwrap_or_else(|| crate::domain::normalize_domain(&url));
            CompetitorRecord::new(
                item.rank_group.unwrap_or(index as u32 + 1),
                url,
                domain,
                item.title.clone(),
                item.description.clone(),
                metrics,
            )
        })
        .collect()
}
