//! Domain metrics report assembly
//!
//! Combines independently fetched sub-results into the flat domain metrics
//! contracts. A missing sub-result degrades to `null`, `[]` or `{}`.

use serde::Serialize;

use crate::backlinks::{
    AnchorRecord, BacklinksHistoryPoint, BacklinksSummaryRecord, CompetitorDomainRecord,
    ReferringDomainRecord, TopPageRecord,
};
use crate::moz::SiteMetrics;
use crate::scoring::{compute_popularity_score, compute_trust_score};

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetricsSummary {
    pub domain_authority: f64,
    pub page_authority: f64,
    pub spam_score: f64,
    pub referring_domains: u64,
    pub indirect_referring_domains: u64,
    pub external_pages: u64,
    pub popularity_score: u8,
    pub trust_score: u8,
}

impl From<&SiteMetrics> for SiteMetricsSummary {
    fn from(metrics: &SiteMetrics) -> Self {
        Self {
            domain_authority: metrics.domain_authority,
            page_authority: metrics.page_authority,
            spam_score: metrics.spam_score,
            referring_domains: metrics.root_domains_to_root_domain,
            indirect_referring_domains: metrics.indirect_root_domains_to_root_domain,
            external_pages: metrics.external_pages_to_root_domain,
            popularity_score: compute_popularity_score(metrics),
            trust_score: compute_trust_score(metrics),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainMetricsOutput {
    pub domain: String,
    pub site_metrics: Option<SiteMetricsSummary>,
    pub metrics_distributions: serde_json::Value,
    pub top_referring_domains: Vec<ReferringDomainRecord>,
    pub backlinks_summary: Option<BacklinksSummaryRecord>,
    pub backlinks_history: Option<Vec<BacklinksHistoryPoint>>,
    pub anchors: Vec<AnchorRecord>,
}

/// Sub-results for [`assemble_domain_metrics`]; `None` marks a failed fetch.
#[derive(Debug, Default)]
pub struct DomainMetricsParts {
    pub site_metrics: Option<SiteMetrics>,
    pub metrics_distributions: Option<serde_json::Value>,
    pub top_referring_domains: Option<Vec<ReferringDomainRecord>>,
    pub backlinks_summary: Option<BacklinksSummaryRecord>,
    pub backlinks_history: Option<Vec<BacklinksHistoryPoint>>,
    pub anchors: Option<Vec<AnchorRecord>>,
}

pub fn assemble_domain_metrics(domain: &str, parts: DomainMetricsParts) -> DomainMetricsOutput {
    let metrics_distributions = match parts.metrics_distributions {
        Some(value @ serde_json::Value::Object(_)) => value,
        _ => serde_json::Value::Object(serde_json::Map::new()),
    };

    DomainMetricsOutput {
        domain: domain.to_string(),
        site_metrics: parts.site_metrics.as_ref().map(SiteMetricsSummary::from),
        metrics_distributions,
        top_referring_domains: parts.top_referring_domains.unwrap_or_default(),
        backlinks_summary: parts.backlinks_summary,
        backlinks_history: parts.backlinks_history,
        anchors: parts.anchors.unwrap_or_default(),
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryCosts {
    pub top_pages: Option<f64>,
    pub competitors: Option<f64>,
}

impl QueryCosts {
    pub fn total(&self) -> f64 {
        [self.top_pages, self.competitors].iter().flatten().sum()
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DomainMetricsAdvancedOutput {
    pub domain: String,
    pub top_pages: Vec<TopPageRecord>,
    pub competitors: Vec<CompetitorDomainRecord>,
    pub costs: QueryCosts,
    pub total_cost: f64,
}

/// A costed sub-result; `None` marks a failed fetch.
pub type Costed<T> = Option<(Vec<T>, f64)>;

pub fn assemble_domain_metrics_advanced(
    domain: &str,
    top_pages: Costed<TopPageRecord>,
    competitors: Costed<CompetitorDomainRecord>,
) -> DomainMetricsAdvancedOutput {
    let (top_pages, top_pages_cost) = split_costed(top_pages);
    let (competitors, competitors_cost) = split_costed(competitors);

    let costs = QueryCosts {
        top_pages: top_pages_cost,
        competitors: competitors_cost,
    };

    DomainMetricsAdvancedOutput {
        domain: domain.to_string(),
        top_pages,
        competitors,
        total_cost: costs.total(),
        costs,
    }
}

fn split_costed<T>(costed: Costed<T>) -> (Vec<T>, Option<f64>) {
    match costed {
        Some((rows, cost)) => (rows, Some(cost)),
        None => (Vec::new(), None),
    }
}
