use serde::{Deserialize, Serialize};

pub use seolens_core::backlinks::BacklinksListOutput;
pub use seolens_core::report::{DomainMetricsAdvancedOutput, DomainMetricsOutput};

// Import domain models and pure functions from core crate
use seolens_core::backlinks::{
    history_window, normalize_anchors, normalize_backlinks, normalize_competitor_domains,
    normalize_history, normalize_referring_domains, normalize_summary, normalize_top_pages,
    ItemsResult, TargetTask,
};
use seolens_core::domain::normalize_domain;
use seolens_core::report::{
    assemble_domain_metrics, assemble_domain_metrics_advanced, DomainMetricsParts,
};

use super::soft;
use crate::prelude::{println, *};
use crate::providers::Providers;

const TOP_REFERRING_DOMAINS: u32 = 10;
const TOP_ANCHORS: u32 = 20;
const TOP_PAGES: u32 = 10;
const TOP_COMPETITORS: u32 = 10;
const COMPETITORS_LOCATION_CODE: u32 = 2840;
const COMPETITORS_LANGUAGE_CODE: &str = "en";

pub const DEFAULT_BACKLINKS_LIMIT: u32 = 25;
pub const MAX_BACKLINKS_LIMIT: u32 = 1000;
pub const DEFAULT_BACKLINKS_SORT: &str = "rank,desc";

/// Options for the domain command
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct DomainOptions {
    /// Domain or URL to report on
    pub domain: String,

    /// Report top pages and organic competitors instead of link metrics
    #[arg(long)]
    pub advanced: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for the backlinks command
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct BacklinksOptions {
    /// Domain or URL whose backlinks to list
    pub domain: String,

    /// Number of backlinks to return (max 1000)
    #[arg(short, long, default_value_t = DEFAULT_BACKLINKS_LIMIT)]
    pub limit: u32,

    /// Number of backlinks to skip
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Vendor sort expression
    #[arg(long, default_value = DEFAULT_BACKLINKS_SORT)]
    pub sort: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Normalize a domain, rejecting input that reduces to nothing
pub fn require_domain(input: &str) -> SeoResult<String> {
    let domain = normalize_domain(input);
    if domain.is_empty() {
        return Err(Error::InvalidInput(
            "domain is required and must contain a host name".to_string(),
        ));
    }
    Ok(domain)
}

/// Public data function - used by both CLI and HTTP API
/// Link and authority overview for a domain
///
/// Every sub-fetch is soft: a failure is logged and its field degrades
/// instead of failing the whole report.
pub async fn domain_metrics_data(
    providers: &Providers,
    domain: &str,
) -> SeoResult<DomainMetricsOutput> {
    let domain = require_domain(domain)?;
    log::info!("domain metrics: domain={domain}");

    let moz = &providers.moz;
    let dataforseo = &providers.dataforseo;

    let site_metrics = soft(moz.site_metrics(&domain).await);
    let metrics_distributions = soft(moz.metrics_distributions(&domain).await);

    let referring_task = TargetTask::new(&domain)
        .limit(TOP_REFERRING_DOMAINS)
        .order_by("rank,desc");
    let top_referring_domains = soft(dataforseo.referring_domains(referring_task).await)
        .map(|(result, _)| normalize_referring_domains(items(result)));

    let summary_task = TargetTask::new(&domain);
    let backlinks_summary = soft(dataforseo.backlinks_summary(summary_task).await)
        .flatten()
        .map(normalize_summary);

    let window = history_window(chrono::Utc::now().date_naive());
    let history_task = TargetTask::new(&domain).window(window);
    let backlinks_history = soft(dataforseo.backlinks_history(history_task).await)
        .map(|(result, _)| normalize_history(items(result)));

    let anchors_task = TargetTask::new(&domain)
        .limit(TOP_ANCHORS)
        .order_by("backlinks,desc");
    let anchors = soft(dataforseo.anchors(anchors_task).await)
        .map(|(result, _)| normalize_anchors(items(result)));

    Ok(assemble_domain_metrics(
        &domain,
        DomainMetricsParts {
            site_metrics,
            metrics_distributions,
            top_referring_domains,
            backlinks_summary,
            backlinks_history,
            anchors,
        },
    ))
}

/// Public data function - used by both CLI and HTTP API
/// Top pages and organic competitors for a domain, with per-call costs
pub async fn domain_metrics_advanced_data(
    providers: &Providers,
    domain: &str,
) -> SeoResult<DomainMetricsAdvancedOutput> {
    let domain = require_domain(domain)?;
    log::info!("domain metrics advanced: domain={domain}");

    let dataforseo = &providers.dataforseo;

    let pages_task = TargetTask::new(&domain)
        .limit(TOP_PAGES)
        .order_by("page_summary.referring_domains,desc");
    let top_pages = soft(dataforseo.domain_pages(pages_task).await)
        .map(|(result, cost)| (normalize_top_pages(items(result)), cost));

    let competitors_task = TargetTask::new(&domain)
        .limit(TOP_COMPETITORS)
        .locale(COMPETITORS_LOCATION_CODE, COMPETITORS_LANGUAGE_CODE);
    let competitors = soft(dataforseo.competitors_domain(competitors_task).await)
        .map(|(result, cost)| (normalize_competitor_domains(items(result)), cost));

    Ok(assemble_domain_metrics_advanced(&domain, top_pages, competitors))
}

/// Items of a vendor result, or none when the vendor returned no result
fn items<T>(result: Option<ItemsResult<T>>) -> Vec<T> {
    result.and_then(|r| r.items).unwrap_or_default()
}

/// Public data function - used by both CLI and HTTP API
/// One page of backlinks pointing at a domain
pub async fn backlinks_data(
    providers: &Providers,
    domain: &str,
    limit: Option<u32>,
    offset: Option<u32>,
    sort: Option<String>,
) -> SeoResult<BacklinksListOutput> {
    let domain = require_domain(domain)?;
    let limit = limit
        .unwrap_or(DEFAULT_BACKLINKS_LIMIT)
        .clamp(1, MAX_BACKLINKS_LIMIT);
    let offset = offset.unwrap_or(0);
    let sort = sort
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKLINKS_SORT.to_string());

    log::info!("backlinks: domain={domain} limit={limit} offset={offset} sort={sort}");

    let task = TargetTask::new(&domain)
        .mode("as_is")
        .limit(limit)
        .offset(offset)
        .order_by(&sort);
    let (result, _) = providers.dataforseo.backlinks(task).await?;

    Ok(normalize_backlinks(&domain, result))
}

/// Handle the domain command
pub async fn domain_handler(options: DomainOptions, providers: &Providers) -> Result<()> {
    if options.advanced {
        let data = domain_metrics_advanced_data(providers, &options.domain).await?;
        if options.json {
            println!("{}", serde_json::to_string_pretty(&data)?);
            return Ok(());
        }
        print_advanced(&data);
        return Ok(());
    }

    let data = domain_metrics_data(providers, &options.domain).await?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["Metric", "Value"]);
    table.add_row(prettytable::row!["Domain", data.domain]);
    match &data.site_metrics {
        Some(metrics) => {
            table.add_row(prettytable::row!["Domain Authority", metrics.domain_authority]);
            table.add_row(prettytable::row!["Page Authority", metrics.page_authority]);
            table.add_row(prettytable::row!["Spam Score", metrics.spam_score]);
            table.add_row(prettytable::row!["Referring Domains", metrics.referring_domains]);
            table.add_row(prettytable::row!["Popularity", metrics.popularity_score]);
            table.add_row(prettytable::row!["Trust", metrics.trust_score]);
        }
        None => {
            table.add_row(prettytable::row!["Site metrics", "unavailable"]);
        }
    }
    if let Some(summary) = &data.backlinks_summary {
        table.add_row(prettytable::row!["Backlinks", summary.backlinks]);
        table.add_row(prettytable::row![
            "Active links",
            f!("{:.1}%", summary.active_links_ratio * 100.0)
        ]);
        table.add_row(prettytable::row![
            "Dofollow links",
            f!("{:.1}%", summary.dofollow_links_ratio * 100.0)
        ]);
    }
    let history = data
        .backlinks_history
        .as_ref()
        .map(|points| f!("{} points", points.len()))
        .unwrap_or_else(|| "unavailable".to_string());
    table.add_row(prettytable::row!["History", history]);
    table.printstd();

    if !data.anchors.is_empty() {
        println!();
        let mut anchors = crate::prelude::new_table();
        anchors.add_row(prettytable::row!["Anchor", "Backlinks", "Share"]);
        for anchor in &data.anchors {
            anchors.add_row(prettytable::row![
                anchor.anchor,
                anchor.backlinks,
                f!("{:.1}%", anchor.share * 100.0)
            ]);
        }
        anchors.printstd();
    }

    Ok(())
}

fn print_advanced(data: &DomainMetricsAdvancedOutput) {
    let mut pages = crate::prelude::new_table();
    pages.add_row(prettytable::row!["Top page", "Referring domains", "Backlinks"]);
    for page in &data.top_pages {
        pages.add_row(prettytable::row![page.url, page.referring_domains, page.backlinks]);
    }
    pages.printstd();

    println!();
    let mut competitors = crate::prelude::new_table();
    competitors.add_row(prettytable::row!["Competitor", "Avg position", "Intersections"]);
    for competitor in &data.competitors {
        let position = competitor
            .avg_position
            .map(|p| f!("{p:.1}"))
            .unwrap_or_default();
        competitors.add_row(prettytable::row![
            competitor.domain,
            position,
            competitor.intersections
        ]);
    }
    competitors.printstd();

    println!("\nTotal cost: {:.4}", data.total_cost);
}

/// Handle the backlinks command
pub async fn backlinks_handler(options: BacklinksOptions, providers: &Providers) -> Result<()> {
    let data = backlinks_data(
        providers,
        &options.domain,
        Some(options.limit),
        Some(options.offset),
        Some(options.sort),
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} backlinks for {}\n", data.total_count, data.domain);

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["From", "Anchor", "Rank", "Dofollow"]);
    for backlink in &data.backlinks {
        table.add_row(prettytable::row![
            backlink.url_from,
            backlink.anchor.as_deref().unwrap_or(""),
            backlink.rank,
            backlink.dofollow
        ]);
    }
    table.printstd();

    Ok(())
}
