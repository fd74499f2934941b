use serde::{Deserialize, Serialize};

// Import domain models and pure functions from core crate
use seolens_core::keywords::{
    parse_seed_keywords, rank_keywords, rank_non_brand_keywords, KeywordsTask,
};
pub use seolens_core::keywords::{KeywordRecord, KeywordVolumeOutput, OpportunityOutput};
use seolens_core::prompt::{build_opportunity_prompt, OpportunityRequest};

use crate::prelude::{println, *};
use crate::providers::Providers;

/// Message attached to an opportunity result with no keywords.
pub const NO_KEYWORDS_MESSAGE: &str = "No valid non-brand keywords found";

/// Upper bound on caller-supplied keywords for a volume lookup.
pub const MAX_VOLUME_KEYWORDS: usize = 1000;

/// Parameters of an opportunity search
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityParams {
    pub niche: String,
    pub sub_niche: Option<String>,
    pub business_model: Option<String>,
    pub language_code: String,
    pub location_code: u32,
    pub language_name: String,
}

/// Options for the opportunities command
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct OpportunityOptions {
    /// Niche to find keywords for
    pub niche: String,

    /// Narrower sub-niche
    #[arg(long)]
    pub sub_niche: Option<String>,

    /// Business model (e.g. "affiliate", "ecommerce")
    #[arg(long)]
    pub business_model: Option<String>,

    /// Google language code
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Language name used in the generation prompt
    #[arg(long, default_value = "English")]
    pub language_name: String,

    /// Google location code
    #[arg(short, long, default_value = "2840")]
    pub location: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Options for the volume command
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct VolumeOptions {
    /// Keywords to look up
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Google language code
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Google location code
    #[arg(short, long, default_value = "2840")]
    pub location: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn required(field: &str, value: &str) -> SeoResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Public data function - used by both CLI and HTTP API
/// Generate seed keywords for a niche and keep the non-brand ideas
///
/// Text generation and the keyword ideas call are both fatal on failure. An
/// empty result is returned as is.
pub async fn opportunity_finder_data(
    providers: &Providers,
    params: OpportunityParams,
) -> SeoResult<OpportunityOutput> {
    let niche = required("niche", &params.niche)?;
    let language_code = required("googleLanguageCode", &params.language_code)?;
    let language_name = required("googleLanguageName", &params.language_name)?;
    let sub_niche = optional(params.sub_niche);
    let business_model = optional(params.business_model);

    log::info!(
        "opportunity finder: niche={niche} location={} language={language_code}",
        params.location_code
    );

    let prompt = build_opportunity_prompt(&OpportunityRequest {
        niche: niche.clone(),
        sub_niche: sub_niche.clone(),
        business_model: business_model.clone(),
        language_name,
    });

    let text = providers
        .openai
        .complete_system_prompt(&prompt)
        .await?
        .ok_or_else(|| Error::Generic("Text generation returned no keywords".to_string()))?;

    let seed_keywords = parse_seed_keywords(&text);
    if seed_keywords.is_empty() {
        return Err(Error::Generic("Text generation returned no usable keywords".to_string()));
    }
    log::debug!("seed keywords: {}", seed_keywords.join(", "));

    let ideas = providers
        .dataforseo
        .keywords_for_keywords(KeywordsTask {
            keywords: seed_keywords.clone(),
            location_code: params.location_code,
            language_code,
        })
        .await?;

    let keywords = rank_non_brand_keywords(ideas.results);
    if keywords.is_empty() {
        log::info!("opportunity finder: {NO_KEYWORDS_MESSAGE}");
    }

    Ok(OpportunityOutput {
        niche,
        sub_niche,
        business_model,
        seed_keywords,
        keywords,
        cost: ideas.cost,
    })
}

/// Public data function - used by both CLI and HTTP API
/// Search volume and trend for exactly the given keywords
pub async fn keyword_volume_data(
    providers: &Providers,
    keywords: Vec<String>,
    language_code: &str,
    location_code: u32,
) -> SeoResult<KeywordVolumeOutput> {
    let language_code = required("googleLanguageCode", language_code)?;
    let keywords: Vec<String> = keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(Error::InvalidInput("keywords must contain at least one keyword".to_string()));
    }
    if keywords.len() > MAX_VOLUME_KEYWORDS {
        return Err(Error::InvalidInput(format!(
            "keywords accepts at most {MAX_VOLUME_KEYWORDS} entries"
        )));
    }

    log::info!(
        "keyword volume: {} keywords location={location_code} language={language_code}",
        keywords.len()
    );

    let volumes = providers
        .dataforseo
        .search_volume(KeywordsTask {
            keywords,
            location_code,
            language_code,
        })
        .await?;

    Ok(KeywordVolumeOutput {
        keywords: rank_keywords(volumes.results),
        cost: volumes.cost,
    })
}

fn print_keywords(keywords: &[KeywordRecord]) {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["Keyword", "Volume", "CPC", "Competition"]);
    for keyword in keywords {
        table.add_row(prettytable::row![
            keyword.keyword,
            keyword.search_volume,
            keyword.cpc.map(|cpc| f!("{cpc:.2}")).unwrap_or_default(),
            keyword.competition.as_deref().unwrap_or("")
        ]);
    }
    table.printstd();
}

/// Handle the opportunities command
pub async fn opportunity_handler(options: OpportunityOptions, providers: &Providers) -> Result<()> {
    let data = opportunity_finder_data(
        providers,
        OpportunityParams {
            niche: options.niche,
            sub_niche: options.sub_niche,
            business_model: options.business_model,
            language_code: options.language,
            location_code: options.location,
            language_name: options.language_name,
        },
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("Seed keywords: {}\n", data.seed_keywords.join(", "));
    if data.keywords.is_empty() {
        println!("{NO_KEYWORDS_MESSAGE}");
        return Ok(());
    }
    print_keywords(&data.keywords);

    Ok(())
}

/// Handle the volume command
pub async fn volume_handler(options: VolumeOptions, providers: &Providers) -> Result<()> {
    let data = keyword_volume_data(
        providers,
        options.keywords,
        &options.language,
        options.location,
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    print_keywords(&data.keywords);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::providers;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn params() -> OpportunityParams {
        OpportunityParams {
            niche: "running".to_string(),
            sub_niche: Some("trail".to_string()),
            business_model: None,
            language_code: "en".to_string(),
            location_code: 2840,
            language_name: "English".to_string(),
        }
    }

    async fn mount_completion(server: &MockServer, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })))
            .mount(server)
            .await;
    }

    fn non_brand() -> serde_json::Value {
        serde_json::json!({
            "concepts": [{
                "name": "shoes",
                "concept_group": {"name": "Non-Brands", "type": "NON_BRAND"}
            }]
        })
    }

    #[tokio::test]
    async fn test_keeps_non_brand_keywords_sorted_by_volume() {
        let server = MockServer::start().await;
        mount_completion(&server, "trail shoes, hydration vest").await;
        Mock::given(method("POST"))
            .and(path("/v3/keywords_data/google_ads/keywords_for_keywords/live"))
            .and(body_partial_json(serde_json::json!([{
                "keywords": ["trail shoes", "hydration vest"],
                "location_code": 2840,
                "language_code": "en"
            }])))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status_code": 20000,
                "cost": 0.075,
                "tasks": [{"status_code": 20000, "result": [
                    {
                        "keyword": "hydration vest",
                        "search_volume": 900,
                        "keyword_annotations": non_brand()
                    },
                    {
                        "keyword": "brandname shoes",
                        "search_volume": 5000,
                        "keyword_annotations": {"concepts": [{
                            "name": "brandname",
                            "concept_group": {"name": "Brands", "type": "BRAND"}
                        }]}
                    },
                    {
                        "keyword": "trail shoes",
                        "search_volume": 2400,
                        "keyword_annotations": non_brand(),
                        "monthly_searches": [{"year": 2024, "month": 1, "search_volume": 2000}]
                    },
                    {"keyword": "no annotations", "search_volume": 9999}
                ]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let output = opportunity_finder_data(&providers(&server.uri()), params())
            .await
            .unwrap();

        assert_eq!(output.seed_keywords, vec!["trail shoes", "hydration vest"]);
        let keywords: Vec<_> = output.keywords.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["trail shoes", "hydration vest"]);
        assert_eq!(output.keywords[0].month_years, vec!["January 2024"]);
        assert_eq!(output.cost, 0.075);
    }

    #[tokio::test]
    async fn test_no_annotations_is_empty_not_error() {
        let server = MockServer::start().await;
        mount_completion(&server, "shoes, boots, sandals").await;
        Mock::given(method("POST"))
            .and(path("/v3/keywords_data/google_ads/keywords_for_keywords/live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status_code": 20000,
                "tasks": [{"status_code": 20000, "result": [
                    {"keyword": "shoes", "search_volume": 100},
                    {"keyword": "boots", "search_volume": 50}
                ]}]
            })))
            .mount(&server)
            .await;

        let output = opportunity_finder_data(&providers(&server.uri()), params())
            .await
            .unwrap();

        assert_eq!(output.seed_keywords, vec!["shoes", "boots", "sandals"]);
        assert!(output.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_blank_generation_fails() {
        let server = MockServer::start().await;
        mount_completion(&server, "  ").await;

        let err = opportunity_finder_data(&providers(&server.uri()), params())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Generic(_)));
        assert_eq!(err.to_string(), "Text generation returned no keywords");
    }

    #[tokio::test]
    async fn test_keyword_ideas_failure_is_fatal() {
        let server = MockServer::start().await;
        mount_completion(&server, "trail shoes").await;
        Mock::given(method("POST"))
            .and(path("/v3/keywords_data/google_ads/keywords_for_keywords/live"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = opportunity_finder_data(&providers(&server.uri()), params())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Provider(_)));
    }

    #[tokio::test]
    async fn test_missing_niche_is_invalid_input() {
        let server = MockServer::start().await;
        let mut input = params();
        input.niche = " ".to_string();

        let err = opportunity_finder_data(&providers(&server.uri()), input)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "niche is required");
    }

    #[tokio::test]
    async fn test_keyword_volume_skips_brand_filter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v3/keywords_data/google_ads/search_volume/live"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status_code": 20000,
                "cost": 0.05,
                "tasks": [{"status_code": 20000, "result": [
                    {"keyword": "nike shoes", "search_volume": 10},
                    {"keyword": "trail shoes", "search_volume": 20}
                ]}]
            })))
            .mount(&server)
            .await;

        let output = keyword_volume_data(
            &providers(&server.uri()),
            vec!["nike shoes".to_string(), "trail shoes".to_string()],
            "en",
            2840,
        )
        .await
        .unwrap();

        let keywords: Vec<_> = output.keywords.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["trail shoes", "nike shoes"]);
        assert_eq!(output.cost, 0.05);
    }

    #[tokio::test]
    async fn test_keyword_volume_requires_keywords() {
        let server = MockServer::start().await;

        let keywords = vec!["  ".to_string()];
        let err = keyword_volume_data(&providers(&server.uri()), keywords, "en", 2840)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
