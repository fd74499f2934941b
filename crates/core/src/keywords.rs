//! Keyword opportunity transformations
//!
//! Seed keyword parsing, brand filtering, ranking and the monthly trend
//! expansion shared by the opportunity finder and the volume lookup.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Upper bound on seed keywords taken from generated text.
pub const MAX_SEED_KEYWORDS: usize = 10;

/// Upper bound on keyword records returned by a ranking.
pub const MAX_KEYWORD_RESULTS: usize = 100;

pub const NON_BRAND_CONCEPT_TYPE: &str = "NON_BRAND";
pub const NON_BRAND_CONCEPT_NAME: &str = "Non-Brands";

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*").unwrap());

// ============================================================================
// Domain Models (Input from API)
// ============================================================================

#[derive(Debug, Serialize, Clone)]
pub struct KeywordsTask {
    pub keywords: Vec<String>,
    pub location_code: u32,
    pub language_code: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct KeywordItem {
    pub keyword: String,
    #[serde(default)]
    pub search_volume: Option<u64>,
    #[serde(default)]
    pub cpc: Option<f64>,
    #[serde(default)]
    pub competition: Option<String>,
    #[serde(default)]
    pub competition_index: Option<u32>,
    #[serde(default)]
    pub low_top_of_page_bid: Option<f64>,
    #[serde(default)]
    pub high_top_of_page_bid: Option<f64>,
    #[serde(default)]
    pub monthly_searches: Option<Vec<MonthlySearch>>,
    #[serde(default)]
    pub keyword_annotations: Option<KeywordAnnotations>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MonthlySearch {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub search_volume: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct KeywordAnnotations {
    #[serde(default)]
    pub concepts: Option<Vec<Concept>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Concept {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub concept_group: Option<ConceptGroup>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ConceptGroup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub group_type: Option<String>,
}

// ============================================================================
// Output Models (Domain Model)
// ============================================================================

/// A ranked keyword with its monthly trend as two parallel arrays.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    pub keyword: String,
    pub search_volume: u64,
    pub cpc: Option<f64>,
    pub competition: Option<String>,
    pub competition_index: Option<u32>,
    pub low_top_of_page_bid: Option<f64>,
    pub high_top_of_page_bid: Option<f64>,
    pub month_years: Vec<String>,
    pub monthly_search_volumes: Vec<u64>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityOutput {
    pub niche: String,
    pub sub_niche: Option<String>,
    pub business_model: Option<String>,
    pub seed_keywords: Vec<String>,
    pub keywords: Vec<KeywordRecord>,
    pub cost: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordVolumeOutput {
    pub keywords: Vec<KeywordRecord>,
    pub cost: f64,
}

// ============================================================================
// Pure Transformation Functions
// ============================================================================

/// Split generated text into seed keywords.
///
/// Splits on commas and newlines, trims whitespace, list markers and quotes,
/// drops empties and case-insensitive duplicates, and keeps at most
/// [`MAX_SEED_KEYWORDS`].
pub fn parse_seed_keywords(text: &str) -> Vec<String> {
    let mut seeds: Vec<String> = Vec::new();

    for raw in text.split([',', '\n']) {
        let unmarked = LIST_MARKER.replace(raw, "");
        let cleaned = unmarked
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '.')
            .trim();

        if cleaned.is_empty() || seeds.iter().any(|s| s.eq_ignore_ascii_case(cleaned)) {
            continue;
        }

        seeds.push(cleaned.to_string());
        if seeds.len() == MAX_SEED_KEYWORDS {
            break;
        }
    }

    seeds
}

/// Whether the vendor annotated this keyword as a non-brand term.
///
/// Keywords without annotations are not considered non-brand.
pub fn is_non_brand(item: &KeywordItem) -> bool {
    item.keyword_annotations
        .as_ref()
        .and_then(|a| a.concepts.as_ref())
        .map(|concepts| {
            concepts.iter().any(|concept| {
                concept.concept_group.as_ref().is_some_and(|group| {
                    group
                        .group_type
                        .as_deref()
                        .is_some_and(|t| t.eq_ignore_ascii_case(NON_BRAND_CONCEPT_TYPE))
                        || group.name.as_deref() == Some(NON_BRAND_CONCEPT_NAME)
                })
            })
        })
        .unwrap_or(false)
}

/// "January 2024" style label, or `None` for an impossible month.
pub fn month_label(year: i32, month: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.format("%B %Y").to_string())
}

/// Expand monthly searches into parallel label/volume arrays, keeping vendor order.
///
/// Entries with an invalid month are skipped from both arrays, so the two
/// arrays always have the same length.
pub fn monthly_trend(searches: &[MonthlySearch]) -> (Vec<String>, Vec<u64>) {
    searches
        .iter()
        .filter_map(|search| {
            month_label(search.year, search.month)
                .map(|label| (label, search.search_volume.unwrap_or(0)))
        })
        .unzip()
}

impl From<KeywordItem> for KeywordRecord {
    fn from(item: KeywordItem) -> Self {
        let (month_years, monthly_search_volumes) =
            monthly_trend(item.monthly_searches.as_deref().unwrap_or_default());

        Self {
            keyword: item.keyword,
            search_volume: item.search_volume.unwrap_or(0),
            cpc: item.cpc,
            competition: item.competition,
            competition_index: item.competition_index,
            low_top_of_page_bid: item.low_top_of_page_bid,
            high_top_of_page_bid: item.high_top_of_page_bid,
            month_years,
            monthly_search_volumes,
        }
    }
}

/// Sort by descending search volume (stable), truncate and convert.
pub fn rank_keywords(mut items: Vec<KeywordItem>) -> Vec<KeywordRecord> {
    items.sort_by(|a, b| {
        b.search_volume
            .unwrap_or(0)
            .cmp(&a.search_volume.unwrap_or(0))
    });
    items
        .into_iter()
        .take(MAX_KEYWORD_RESULTS)
        .map(KeywordRecord::from)
        .collect()
}

/// Keep only non-brand keywords, then rank them.
pub fn rank_non_brand_keywords(items: Vec<KeywordItem>) -> Vec<KeywordRecord> {
    rank_keywords(items.into_iter().filter(is_non_brand).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyword(name: &str, volume: Option<u64>, non_brand: bool) -> KeywordItem {
        KeywordItem {
            keyword: name.to_string(),
            search_volume: volume,
            keyword_annotations: non_brand.then(|| KeywordAnnotations {
                concepts: Some(vec![Concept {
                    name: Some("Non-Brands".to_string()),
                    concept_group: Some(ConceptGroup {
                        name: Some("Non-Brands".to_string()),
                        group_type: Some("NON_BRAND".to_string()),
                    }),
                }]),
            }),
            ..Default::default()
        }
    }

    fn month(year: i32, month: u32, search_volume: Option<u64>) -> MonthlySearch {
        MonthlySearch {
            year,
            month,
            search_volume,
        }
    }

    // ============================================================================
    // parse_seed_keywords tests
    // ============================================================================

    #[test]
    fn test_parse_seed_keywords_basic() {
        assert_eq!(
            parse_seed_keywords("shoes, boots, sandals"),
            vec!["shoes", "boots", "sandals"]
        );
    }

    #[test]
    fn test_parse_seed_keywords_drops_empties_and_duplicates() {
        assert_eq!(
            parse_seed_keywords(" shoes,, Shoes ,\"boots\", ,"),
            vec!["shoes", "boots"]
        );
    }

    #[test]
    fn test_parse_seed_keywords_strips_list_markers() {
        assert_eq!(
            parse_seed_keywords("1. trail shoes\n2) hiking boots\n- sandals"),
            vec!["trail shoes", "hiking boots", "sandals"]
        );
    }

    #[test]
    fn test_parse_seed_keywords_caps_at_ten() {
        let text = (1..=15)
            .map(|i| format!("kw{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let seeds = parse_seed_keywords(&text);

        assert_eq!(seeds.len(), MAX_SEED_KEYWORDS);
        assert_eq!(seeds[0], "kw1");
        assert_eq!(seeds[9], "kw10");
    }

    #[test]
    fn test_parse_seed_keywords_blank() {
        assert!(parse_seed_keywords("  , ,\n").is_empty());
    }

    // ============================================================================
    // brand filter and ranking tests
    // ============================================================================

    #[test]
    fn test_unannotated_keywords_are_dropped() {
        let items = vec![
            keyword("shoes", Some(1000), false),
            keyword("boots", Some(500), false),
            keyword("sandals", Some(200), false),
        ];

        assert!(rank_non_brand_keywords(items).is_empty());
    }

    #[test]
    fn test_brand_concepts_are_dropped() {
        let mut brand = keyword("nike shoes", Some(9000), false);
        brand.keyword_annotations = Some(KeywordAnnotations {
            concepts: Some(vec![Concept {
                name: Some("Nike".to_string()),
                concept_group: Some(ConceptGroup {
                    name: Some("Brand".to_string()),
                    group_type: Some("BRAND".to_string()),
                }),
            }]),
        });

        let ranked = rank_non_brand_keywords(vec![brand, keyword("running shoes", Some(10), true)]);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].keyword, "running shoes");
    }

    #[test]
    fn test_rank_sorts_by_volume_descending() {
        let ranked = rank_non_brand_keywords(vec![
            keyword("a", Some(10), true),
            keyword("b", None, true),
            keyword("c", Some(300), true),
            keyword("d", Some(20), true),
        ]);

        let names: Vec<_> = ranked.iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(names, vec!["c", "d", "a", "b"]);
        assert_eq!(ranked[3].search_volume, 0);
    }

    #[test]
    fn test_rank_truncates_to_one_hundred() {
        let items = (0..150)
            .map(|i| keyword(&format!("kw{i}"), Some(i), false))
            .collect();

        let ranked = rank_keywords(items);

        assert_eq!(ranked.len(), MAX_KEYWORD_RESULTS);
        assert_eq!(ranked[0].search_volume, 149);
        assert_eq!(ranked[99].search_volume, 50);
    }

    // ============================================================================
    // monthly trend tests
    // ============================================================================

    #[test]
    fn test_monthly_trend_preserves_vendor_order() {
        let searches = vec![
            month(2024, 3, Some(30)),
            month(2024, 1, Some(10)),
            month(2023, 12, None),
        ];

        let (labels, volumes) = monthly_trend(&searches);

        assert_eq!(labels, vec!["March 2024", "January 2024", "December 2023"]);
        assert_eq!(volumes, vec![30, 10, 0]);
    }

    #[test]
    fn test_monthly_trend_skips_invalid_months_from_both_arrays() {
        let searches = vec![month(2024, 13, Some(1)), month(2024, 2, Some(2))];

        let (labels, volumes) = monthly_trend(&searches);

        assert_eq!(labels.len(), volumes.len());
        assert_eq!(labels, vec!["February 2024"]);
    }

    #[test]
    fn test_record_without_monthly_searches() {
        let record = KeywordRecord::from(keyword("shoes", Some(5), true));

        assert!(record.month_years.is_empty());
        assert!(record.monthly_search_volumes.is_empty());
    }
}
