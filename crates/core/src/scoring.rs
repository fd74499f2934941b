//! Authority and difficulty scoring
//!
//! Pure heuristics that turn vendor site metrics into two 0-100 authority
//! proxies (popularity and trust) and a keyword difficulty estimate built from
//! the competitors ranking for that keyword.
//!
//! Every logarithm uses `ln_1p` so zero-valued metrics never hit a domain error.

use crate::moz::SiteMetrics;
use crate::serp::CompetitorRecord;

/// Maximum number of competitors considered by [`compute_aggregate_difficulty`].
pub const DIFFICULTY_TOP_N: usize = 10;

/// Vendor spam scores run from 0 to 17.
pub const MAX_SPAM_SCORE: f64 = 17.0;

/// Tuning constants for the scoring heuristics.
///
/// There is exactly one canonical set, returned by [`ScoringConstants::default`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConstants {
    pub popularity_base: f64,
    pub link_volume_weight: f64,
    pub depth_boost_weight: f64,
    pub referring_domains_weight: f64,
    pub popularity_page_authority_weight: f64,

    pub trust_base: f64,
    pub trust_log_weight: f64,
    pub trust_domain_authority_weight: f64,
    pub trust_page_authority_weight: f64,
    pub spam_penalty_factor: f64,
    pub spam_penalty_exponent: f64,

    pub difficulty_trust_weight: f64,
    pub difficulty_domain_authority_weight: f64,
    pub difficulty_popularity_weight: f64,
    pub difficulty_page_authority_weight: f64,
    pub difficulty_referring_domains_weight: f64,
    /// Referring-domain count that maps to a factor of 100.
    pub referring_domains_ceiling: f64,
    pub sigmoid_midpoint: f64,
    pub sigmoid_steepness: f64,
}

impl Default for ScoringConstants {
    fn default() -> Self {
        Self {
            popularity_base: 5.0,
            link_volume_weight: 3.0,
            depth_boost_weight: 1.5,
            referring_domains_weight: 2.5,
            popularity_page_authority_weight: 0.15,

            trust_base: 5.0,
            trust_log_weight: 19.0,
            trust_domain_authority_weight: 1.0,
            trust_page_authority_weight: 0.1,
            spam_penalty_factor: 2.5,
            spam_penalty_exponent: 0.8,

            difficulty_trust_weight: 0.30,
            difficulty_domain_authority_weight: 0.25,
            difficulty_popularity_weight: 0.20,
            difficulty_page_authority_weight: 0.15,
            difficulty_referring_domains_weight: 0.10,
            referring_domains_ceiling: 100_000.0,
            sigmoid_midpoint: 50.0,
            sigmoid_steepness: 12.0,
        }
    }
}

/// Round and clamp a raw score into `[0, 100]`.
fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Popularity: log-compressed inbound link volume plus referring-domain depth.
pub fn compute_popularity_score(metrics: &SiteMetrics) -> u8 {
    compute_popularity_score_with(metrics, &ScoringConstants::default())
}

pub fn compute_popularity_score_with(metrics: &SiteMetrics, c: &ScoringConstants) -> u8 {
    let propensity = metrics.link_propensity.clamp(0.0, 1.0);
    let weighted_links = metrics.external_pages_to_root_domain as f64 * (0.5 + 0.5 * propensity);

    let raw = c.popularity_base
        + c.link_volume_weight * weighted_links.ln_1p()
        + c.depth_boost_weight * (metrics.indirect_root_domains_to_root_domain as f64).ln_1p()
        + c.referring_domains_weight * (metrics.root_domains_to_root_domain as f64).ln_1p()
        + c.popularity_page_authority_weight * metrics.page_authority.clamp(0.0, 100.0);

    clamp_score(raw)
}

/// Trust: log of an authority-weighted seed, scaled down by a spam penalty.
pub fn compute_trust_score(metrics: &SiteMetrics) -> u8 {
    compute_trust_score_with(metrics, &ScoringConstants::default())
}

pub fn compute_trust_score_with(metrics: &SiteMetrics, c: &ScoringConstants) -> u8 {
    let seed = c.trust_domain_authority_weight * metrics.domain_authority.clamp(0.0, 100.0)
        + c.trust_page_authority_weight * metrics.page_authority.clamp(0.0, 100.0);

    let raw =
        (c.trust_base + c.trust_log_weight * seed.ln_1p()) * spam_penalty(metrics.spam_score, c);

    clamp_score(raw)
}

/// `1 - k * (spam / 100)^p`, kept inside `[0, 1]`.
///
/// Negative spam scores (the vendor's "unknown") count as zero.
pub fn spam_penalty(spam_score: f64, c: &ScoringConstants) -> f64 {
    let fraction = spam_score.clamp(0.0, MAX_SPAM_SCORE) / 100.0;
    (1.0 - c.spam_penalty_factor * fraction.powf(c.spam_penalty_exponent)).clamp(0.0, 1.0)
}

/// Referring domains, log-normalized into `[0, 100]`.
fn referring_domains_factor(referring_domains: u64, c: &ScoringConstants) -> f64 {
    let ceiling = c.referring_domains_ceiling.ln_1p();
    if ceiling <= 0.0 {
        return 0.0;
    }
    (100.0 * (referring_domains as f64).ln_1p() / ceiling).min(100.0)
}

/// Weighted blend of one competitor's strength signals.
fn competitor_blend(competitor: &CompetitorRecord, c: &ScoringConstants) -> f64 {
    let metrics = &competitor.metrics;

    c.difficulty_trust_weight * f64::from(competitor.trust_score)
        + c.difficulty_domain_authority_weight * metrics.domain_authority.clamp(0.0, 100.0)
        + c.difficulty_popularity_weight * f64::from(competitor.popularity_score)
        + c.difficulty_page_authority_weight * metrics.page_authority.clamp(0.0, 100.0)
        + c.difficulty_referring_domains_weight
            * referring_domains_factor(metrics.root_domains_to_root_domain, c)
}

/// Keyword difficulty estimated from the top-ranked competitors.
///
/// Only the first [`DIFFICULTY_TOP_N`] records are considered, in the order
/// given. The average blend goes through a logistic curve centred on
/// `sigmoid_midpoint`, which keeps the result monotonic in the average.
pub fn compute_aggregate_difficulty(competitors: &[CompetitorRecord]) -> u8 {
    compute_aggregate_difficulty_with(competitors, &ScoringConstants::default())
}

pub fn compute_aggregate_difficulty_with(
    competitors: &[CompetitorRecord],
    c: &ScoringConstants,
) -> u8 {
    let considered = &competitors[..competitors.len().min(DIFFICULTY_TOP_N)];
    if considered.is_empty() {
        return 0;
    }

    let average = considered
        .iter()
        .map(|competitor| competitor_blend(competitor, c))
        .sum::<f64>()
        / considered.len() as f64;

    let scaled = 100.0 / (1.0 + (-(average - c.sigmoid_midpoint) / c.sigmoid_steepness).exp());

    clamp_score(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(da: f64, pa: f64, spam: f64, rd: u64, ext: u64) -> SiteMetrics {
        SiteMetrics {
            domain_authority: da,
            page_authority: pa,
            spam_score: spam,
            root_domains_to_root_domain: rd,
            indirect_root_domains_to_root_domain: rd * 2,
            external_pages_to_root_domain: ext,
            link_propensity: 0.5,
            ..Default::default()
        }
    }

    fn competitor(rank: u32, m: SiteMetrics) -> CompetitorRecord {
        CompetitorRecord::new(
            rank,
            format!("https://site{rank}.com/"),
            format!("site{rank}.com"),
            None,
            None,
            m,
        )
    }

    // ============================================================================
    // popularity / trust
    // ============================================================================

    #[test]
    fn test_zero_metrics_yield_floor_values() {
        let zero = SiteMetrics::default();

        assert_eq!(compute_popularity_score(&zero), 5);
        assert_eq!(compute_trust_score(&zero), 5);
    }

    #[test]
    fn test_scores_are_clamped_to_100() {
        let huge = metrics(100.0, 100.0, 0.0, u64::MAX / 4, u64::MAX / 4);

        assert_eq!(compute_popularity_score(&huge), 100);
        assert!(compute_trust_score(&huge) <= 100);
    }

    #[test]
    fn test_popularity_grows_with_link_volume() {
        let small = metrics(10.0, 10.0, 1.0, 20, 500);
        let large = metrics(10.0, 10.0, 1.0, 20_000, 5_000_000);

        assert!(compute_popularity_score(&large) > compute_popularity_score(&small));
    }

    #[test]
    fn test_spam_penalizes_trust() {
        let clean = metrics(60.0, 50.0, 0.0, 1_000, 10_000);
        let spammy = metrics(60.0, 50.0, 17.0, 1_000, 10_000);

        assert!(compute_trust_score(&spammy) < compute_trust_score(&clean));
    }

    #[test]
    fn test_unknown_spam_score_counts_as_zero() {
        let unknown = metrics(40.0, 30.0, -1.0, 100, 1_000);
        let zero = metrics(40.0, 30.0, 0.0, 100, 1_000);

        assert_eq!(compute_trust_score(&unknown), compute_trust_score(&zero));
    }

    #[test]
    fn test_spam_penalty_bounds() {
        let c = ScoringConstants::default();

        assert_eq!(spam_penalty(0.0, &c), 1.0);
        let worst = spam_penalty(MAX_SPAM_SCORE, &c);
        assert!(worst > 0.0 && worst < 1.0);
        assert_eq!(spam_penalty(500.0, &c), worst);
    }

    // ============================================================================
    // aggregate difficulty
    // ============================================================================

    #[test]
    fn test_aggregate_difficulty_empty_is_zero() {
        assert_eq!(compute_aggregate_difficulty(&[]), 0);
    }

    #[test]
    fn test_aggregate_difficulty_is_monotonic() {
        let mut previous = 0;
        for step in 1..=10u32 {
            let strength = f64::from(step) * 10.0;
            let rd = 10u64.pow(step / 2 + 1);
            let ext = rd * 10;
            let competitors: Vec<_> = (1..=step)
                .map(|rank| competitor(rank, metrics(strength, strength, 0.0, rd, ext)))
                .collect();

            let difficulty = compute_aggregate_difficulty(&competitors);
            assert!(
                difficulty >= previous,
                "difficulty dropped from {previous} to {difficulty} at step {step}"
            );
            assert!(difficulty <= 100);
            previous = difficulty;
        }
    }

    #[test]
    fn test_aggregate_difficulty_ignores_competitors_past_ten() {
        let strong: Vec<_> = (1..=10)
            .map(|rank| competitor(rank, metrics(90.0, 80.0, 0.0, 50_000, 1_000_000)))
            .collect();
        let mut with_weak_tail = strong.clone();
        with_weak_tail.extend((11..=20).map(|rank| competitor(rank, SiteMetrics::default())));

        assert_eq!(
            compute_aggregate_difficulty(&strong),
            compute_aggregate_difficulty(&with_weak_tail)
        );
    }

    #[test]
    fn test_aggregate_difficulty_weak_serp_is_easy() {
        let weak: Vec<_> = (1..=10)
            .map(|rank| competitor(rank, SiteMetrics::default()))
            .collect();

        assert!(compute_aggregate_difficulty(&weak) < 20);
    }

    #[test]
    fn test_difficulty_weights_sum_to_one() {
        let c = ScoringConstants::default();
        let sum = c.difficulty_trust_weight
            + c.difficulty_domain_authority_weight
            + c.difficulty_popularity_weight
            + c.difficulty_page_authority_weight
            + c.difficulty_referring_domains_weight;

        assert!((sum - 1.0).abs() < 1e-9);
    }
}
