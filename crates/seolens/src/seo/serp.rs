use serde::{Deserialize, Serialize};

pub use seolens_core::serp::SerpCompetitorsOutput;

// Import domain models and pure functions from core crate
use seolens_core::scoring::compute_aggregate_difficulty;
use seolens_core::serp::{
    build_competitors, competitor_urls, difficulty_locales, organic_items, DifficultySource,
};

use super::soft;
use crate::prelude::{println, *};
use crate::providers::Providers;

/// Parameters of a SERP competitor analysis
#[derive(Debug, Clone, PartialEq)]
pub struct SerpCompetitorsParams {
    pub keyword: String,
    pub location_code: u32,
    pub language_code: String,
    pub country_iso_code: Option<String>,
    pub fallback_locale: Option<String>,
}

/// Options for the serp command
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct SerpOptions {
    /// Keyword to analyze
    pub keyword: String,

    /// Google location code (2840 is the United States)
    #[arg(short, long, default_value = "2840")]
    pub location: u32,

    /// Google language code
    #[arg(long, default_value = "en")]
    pub language: String,

    /// ISO country code used to build the difficulty locale (e.g. "US")
    #[arg(long)]
    pub country: Option<String>,

    /// Locale retried when the primary difficulty lookup fails (e.g. "en-US")
    #[arg(long)]
    pub fallback_locale: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Public data function - used by both CLI and HTTP API
/// Ranks the organic competitors for a keyword and estimates its difficulty
///
/// Provider calls run one after the other. Only the SERP lookup itself is
/// fatal: the difficulty lookup and the metrics batch degrade on failure.
pub async fn serp_competitors_data(
    providers: &Providers,
    params: SerpCompetitorsParams,
) -> SeoResult<SerpCompetitorsOutput> {
    let keyword = params.keyword.trim();
    if keyword.is_empty() {
        return Err(Error::InvalidInput("keyword is required".to_string()));
    }
    let language_code = params.language_code.trim();
    if language_code.is_empty() {
        return Err(Error::InvalidInput("languageCode is required".to_string()));
    }

    log::info!(
        "serp competitors: keyword={keyword} location={} language={language_code}",
        params.location_code
    );

    let serp = providers
        .dataforseo
        .serp_organic(keyword, params.location_code, language_code)
        .await?;

    let total_results = serp.results.iter().find_map(|r| r.se_results_count);
    let items = organic_items(serp.results);
    if items.is_empty() {
        return Err(Error::NotFound(f!("No SERP results found for keyword '{keyword}'")));
    }

    let locales = difficulty_locales(
        language_code,
        params.country_iso_code.as_deref(),
        params.fallback_locale.as_deref(),
    );
    let vendor_difficulty = vendor_difficulty(providers, keyword, &locales).await;

    let urls = competitor_urls(&items);
    let metrics = soft(providers.moz.site_metrics_batch(&urls).await).unwrap_or_default();

    let competitors = build_competitors(&items, metrics);

    let (keyword_difficulty, difficulty_source, difficulty_locale) = match vendor_difficulty {
        Some((difficulty, locale)) => (difficulty, DifficultySource::Vendor, Some(locale)),
        None => (
            compute_aggregate_difficulty(&competitors),
            DifficultySource::Computed,
            None,
        ),
    };

    Ok(SerpCompetitorsOutput {
        keyword: keyword.to_string(),
        location_code: params.location_code,
        language_code: language_code.to_string(),
        total_results,
        keyword_difficulty,
        difficulty_source,
        difficulty_locale,
        competitors,
    })
}

/// Try each locale in turn; the first one with a reported difficulty wins.
async fn vendor_difficulty(
    providers: &Providers,
    keyword: &str,
    locales: &[String],
) -> Option<(u8, String)> {
    for locale in locales {
        match providers.moz.keyword_difficulty(keyword, locale).await {
            Ok(Some(difficulty)) => return Some((difficulty, locale.clone())),
            Ok(None) => log::warn!("no keyword difficulty reported for locale {locale}"),
            Err(err) => log::warn!("{err}"),
        }
    }
    None
}

/// Handle the serp command
pub async fn serp_handler(options: SerpOptions, providers: &Providers) -> Result<()> {
    let data = serp_competitors_data(
        providers,
        SerpCompetitorsParams {
            keyword: options.keyword,
            location_code: options.location,
            language_code: options.language,
            country_iso_code: options.country,
            fallback_locale: options.fallback_locale,
        },
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    let source = match data.difficulty_source {
        DifficultySource::Vendor => "vendor",
        DifficultySource::Computed => "computed",
    };
    println!(
        "Keyword difficulty for '{}': {} ({source})\n",
        data.keyword, data.keyword_difficulty
    );

    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["#", "Domain", "DA", "PA", "Spam", "Pop", "Trust"]);
    for competitor in &data.competitors {
        table.add_row(prettytable::row![
            competitor.rank,
            competitor.domain,
            competitor.metrics.domain_authority,
            competitor.metrics.page_authority,
            competitor.metrics.spam_score,
            competitor.popularity_score,
            competitor.trust_score
        ]);
    }
    table.printstd();

    Ok(())
}
