//! Backlink summary, history and list normalizers
//!
//! Flattens the SERP vendor's backlink payloads into camelCase rows and
//! derives ratios. A ratio is always 0 when its denominator is 0.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trailing window covered by the backlinks history.
pub const HISTORY_WINDOW_DAYS: i64 = 365;

/// Safe division: 0 when the denominator is 0.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// `(date_from, date_to)` for a history window ending on `today`.
pub fn history_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(HISTORY_WINDOW_DAYS), today)
}

// ============================================================================
// Request payloads
// ============================================================================

#[derive(Debug, Serialize, Clone)]
pub struct TargetTask {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl TargetTask {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            limit: None,
            offset: None,
            order_by: None,
            mode: None,
            date_from: None,
            date_to: None,
            location_code: None,
            language_code: None,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by = Some(vec![order.to_string()]);
        self
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    pub fn window(mut self, (from, to): (NaiveDate, NaiveDate)) -> Self {
        self.date_from = Some(from.format("%Y-%m-%d").to_string());
        self.date_to = Some(to.format("%Y-%m-%d").to_string());
        self
    }

    pub fn locale(mut self, location_code: u32, language_code: &str) -> Self {
        self.location_code = Some(location_code);
        self.language_code = Some(language_code.to_string());
        self
    }
}

// ============================================================================
// Domain Models (Input from API)
// ============================================================================

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SummaryResult {
    pub target: Option<String>,
    pub rank: Option<u64>,
    pub backlinks: Option<u64>,
    pub backlinks_spam_score: Option<u64>,
    pub broken_backlinks: Option<u64>,
    pub referring_domains: Option<u64>,
    pub referring_domains_nofollow: Option<u64>,
    pub referring_main_domains: Option<u64>,
    pub referring_ips: Option<u64>,
    pub referring_subnets: Option<u64>,
    pub referring_pages: Option<u64>,
    pub first_seen: Option<String>,
    pub referring_links_attributes: Option<HashMap<String, u64>>,
}

/// Result wrapper for endpoints that return an `items` list.
#[derive(Debug, Deserialize, Clone)]
pub struct ItemsResult<T> {
    #[serde(default)]
    pub total_count: Option<u64>,
    pub items: Option<Vec<T>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct HistoryItem {
    pub date: Option<String>,
    pub rank: Option<u64>,
    pub backlinks: Option<u64>,
    pub new_backlinks: Option<u64>,
    pub lost_backlinks: Option<u64>,
    pub referring_domains: Option<u64>,
    pub new_referring_domains: Option<u64>,
    pub lost_referring_domains: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AnchorItem {
    pub anchor: Option<String>,
    pub backlinks: Option<u64>,
    pub referring_domains: Option<u64>,
    pub first_seen: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ReferringDomainItem {
    pub domain: Option<String>,
    pub rank: Option<u64>,
    pub backlinks: Option<u64>,
    pub backlinks_spam_score: Option<u64>,
    pub first_seen: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BacklinkItem {
    pub url_from: Option<String>,
    pub url_to: Option<String>,
    pub domain_from: Option<String>,
    pub anchor: Option<String>,
    pub dofollow: Option<bool>,
    pub rank: Option<u64>,
    pub domain_from_rank: Option<u64>,
    pub page_from_rank: Option<u64>,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub is_lost: Option<bool>,
    pub is_broken: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DomainPageItem {
    pub page: Option<String>,
    pub meta: Option<PageMeta>,
    pub page_summary: Option<PageSummary>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PageMeta {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PageSummary {
    pub rank: Option<u64>,
    pub backlinks: Option<u64>,
    pub referring_domains: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CompetitorDomainItem {
    pub domain: Option<String>,
    pub avg_position: Option<f64>,
    pub intersections: Option<u64>,
    pub full_domain_metrics: Option<CompetitorMetrics>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CompetitorMetrics {
    pub organic: Option<OrganicMetrics>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct OrganicMetrics {
    pub etv: Option<f64>,
    pub count: Option<u64>,
}

// ============================================================================
// Output Models (Domain Model)
// ============================================================================

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BacklinksSummaryRecord {
    pub target: Option<String>,
    pub rank: u64,
    pub backlinks: u64,
    pub broken_backlinks: u64,
    pub nofollow_backlinks: u64,
    pub spam_score: u64,
    pub referring_domains: u64,
    pub referring_domains_nofollow: u64,
    pub referring_main_domains: u64,
    pub referring_ips: u64,
    pub referring_subnets: u64,
    pub referring_pages: u64,
    pub first_seen: Option<String>,
    pub active_links_ratio: f64,
    pub dofollow_links_ratio: f64,
    pub links_per_domain: f64,
    pub links_per_ip: f64,
    pub links_per_subnet: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BacklinksHistoryPoint {
    pub date: String,
    pub rank: u64,
    pub backlinks: u64,
    pub new_backlinks: u64,
    pub lost_backlinks: u64,
    pub referring_domains: u64,
    pub new_referring_domains: u64,
    pub lost_referring_domains: u64,
    pub links_per_domain: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRecord {
    pub anchor: String,
    pub backlinks: u64,
    pub referring_domains: u64,
    /// Fraction of all listed anchor backlinks carried by this anchor.
    pub share: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferringDomainRecord {
    pub domain: String,
    pub rank: u64,
    pub backlinks: u64,
    pub spam_score: u64,
    pub first_seen: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BacklinkRecord {
    pub url_from: String,
    pub url_to: String,
    pub domain_from: Option<String>,
    pub anchor: Option<String>,
    pub dofollow: bool,
    pub rank: u64,
    pub domain_from_rank: u64,
    pub page_from_rank: u64,
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub is_lost: bool,
    pub is_broken: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BacklinksListOutput {
    pub domain: String,
    pub total_count: u64,
    pub backlinks: Vec<BacklinkRecord>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopPageRecord {
    pub url: String,
    pub title: Option<String>,
    pub rank: u64,
    pub backlinks: u64,
    pub referring_domains: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorDomainRecord {
    pub domain: String,
    pub avg_position: Option<f64>,
    pub intersections: u64,
    pub organic_traffic: Option<f64>,
    pub organic_keywords: Option<u64>,
}

// ============================================================================
// Pure Transformation Functions
// ============================================================================

pub fn normalize_summary(summary: SummaryResult) -> BacklinksSummaryRecord {
    let backlinks = summary.backlinks.unwrap_or(0);
    let broken = summary.broken_backlinks.unwrap_or(0);
    let nofollow = summary
        .referring_links_attributes
        .as_ref()
        .and_then(|attributes| attributes.get("nofollow").copied())
        .unwrap_or(0);
    let referring_domains = summary.referring_domains.unwrap_or(0);
    let referring_ips = summary.referring_ips.unwrap_or(0);
    let referring_subnets = summary.referring_subnets.unwrap_or(0);

    let total = backlinks as f64;

    BacklinksSummaryRecord {
        target: summary.target,
        rank: summary.rank.unwrap_or(0),
        backlinks,
        broken_backlinks: broken,
        nofollow_backlinks: nofollow,
        spam_score: summary.backlinks_spam_score.unwrap_or(0),
        referring_domains,
        referring_domains_nofollow: summary.referring_domains_nofollow.unwrap_or(0),
        referring_main_domains: summary.referring_main_domains.unwrap_or(0),
        referring_ips,
        referring_subnets,
        referring_pages: summary.referring_pages.unwrap_or(0),
        first_seen: summary.first_seen,
        active_links_ratio: ratio(backlinks.saturating_sub(broken) as f64, total),
        dofollow_links_ratio: ratio(backlinks.saturating_sub(nofollow) as f64, total),
        links_per_domain: ratio(total, referring_domains as f64),
        links_per_ip: ratio(total, referring_ips as f64),
        links_per_subnet: ratio(total, referring_subnets as f64),
    }
}

/// Vendor timestamps look like `2024-01-01 00:00:00 +00:00`; keep the date part.
fn date_part(timestamp: &str) -> String {
    timestamp
        .split([' ', 'T'])
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn normalize_history(items: Vec<HistoryItem>) -> Vec<BacklinksHistoryPoint> {
    items
        .into_iter()
        .map(|item| {
            let backlinks = item.backlinks.unwrap_or(0);
            let referring_domains = item.referring_domains.unwrap_or(0);
            BacklinksHistoryPoint {
                date: item.date.as_deref().map(date_part).unwrap_or_default(),
                rank: item.rank.unwrap_or(0),
                backlinks,
                new_backlinks: item.new_backlinks.unwrap_or(0),
                lost_backlinks: item.lost_backlinks.unwrap_or(0),
                referring_domains,
                new_referring_domains: item.new_referring_domains.unwrap_or(0),
                lost_referring_domains: item.lost_referring_domains.unwrap_or(0),
                links_per_domain: ratio(backlinks as f64, referring_domains as f64),
            }
        })
        .collect()
}

pub fn normalize_anchors(items: Vec<AnchorItem>) -> Vec<AnchorRecord> {
    let total: u64 = items.iter().map(|item| item.backlinks.unwrap_or(0)).sum();

    items
        .into_iter()
        .map(|item| {
            let backlinks = item.backlinks.unwrap_or(0);
            AnchorRecord {
                anchor: item.anchor.unwrap_or_default(),
                backlinks,
                referring_domains: item.referring_domains.unwrap_or(0),
                share: ratio(backlinks as f64, total as f64),
            }
        })
        .collect()
}

pub fn normalize_referring_domains(items: Vec<ReferringDomainItem>) -> Vec<ReferringDomainRecord> {
    items
        .into_iter()
        .filter_map(|item| {
            Some(ReferringDomainRecord {
                domain: item.domain?,
                rank: item.rank.unwrap_or(0),
                backlinks: item.backlinks.unwrap_or(0),
                spam_score: item.backlinks_spam_score.unwrap_or(0),
                first_seen: item.first_seen,
            })
        })
        .collect()
}

pub fn normalize_backlinks(
    domain: &str,
    result: Option<ItemsResult<BacklinkItem>>,
) -> BacklinksListOutput {
    let (total_count, items) = match result {
        Some(result) => (result.total_count, result.items.unwrap_or_default()),
        None => (None, Vec::new()),
    };

    let backlinks: Vec<BacklinkRecord> = items
        .into_iter()
        .map(|item| BacklinkRecord {
            url_from: item.url_from.unwrap_or_default(),
            url_to: item.url_to.unwrap_or_default(),
            domain_from: item.domain_from,
            anchor: item.anchor,
            dofollow: item.dofollow.unwrap_or(false),
            rank: item.rank.unwrap_or(0),
            domain_from_rank: item.domain_from_rank.unwrap_or(0),
            page_from_rank: item.page_from_rank.unwrap_or(0),
            first_seen: item.first_seen,
            last_seen: item.last_seen,
            is_lost: item.is_lost.unwrap_or(false),
            is_broken: item.is_broken.unwrap_or(false),
        })
        .collect();

    BacklinksListOutput {
        domain: domain.to_string(),
        total_count: total_count.unwrap_or(backlinks.len() as u64),
        backlinks,
    }
}

pub fn normalize_top_pages(items: Vec<DomainPageItem>) -> Vec<TopPageRecord> {
    items
        .into_iter()
        .filter_map(|item| {
            let summary = item.page_summary.unwrap_or_default();
            Some(TopPageRecord {
                url: item.page?,
                title: item.meta.and_then(|meta| meta.title),
                rank: summary.rank.unwrap_or(0),
                backlinks: summary.backlinks.unwrap_or(0),
                referring_domains: summary.referring_domains.unwrap_or(0),
            })
        })
        .collect()
}

pub fn normalize_competitor_domains(
    items: Vec<CompetitorDomainItem>,
) -> Vec<CompetitorDomainRecord> {
    items
        .into_iter()
        .filter_map(|item| {
            let organic = item
                .full_domain_metrics
                .and_then(|metrics| metrics.organic)
                .unwrap_or_default();
            Some(CompetitorDomainRecord {
                domain: item.domain?,
                avg_position: item.avg_position,
                intersections: item.intersections.unwrap_or(0),
                organic_traffic: organic.etv,
                organic_keywords: organic.count,
            })
        })
        .collect()
}
