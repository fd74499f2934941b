//! SERP vendor task envelope
//!
//! Every endpoint takes an array of task objects and answers with the same
//! envelope: a top-level status, a cost, and one task per submitted object,
//! each carrying its own status and a `result` array.

use serde::{Deserialize, Serialize};

pub const PATH_SERP_ORGANIC: &str = "v3/serp/google/organic/live/advanced";
pub const PATH_KEYWORDS_FOR_KEYWORDS: &str =
    "v3/keywords_data/google_ads/keywords_for_keywords/live";
pub const PATH_SEARCH_VOLUME: &str = "v3/keywords_data/google_ads/search_volume/live";
pub const PATH_BACKLINKS_SUMMARY: &str = "v3/backlinks/summary/live";
pub const PATH_BACKLINKS_HISTORY: &str = "v3/backlinks/history/live";
pub const PATH_BACKLINKS_ANCHORS: &str = "v3/backlinks/anchors/live";
pub const PATH_BACKLINKS_LIST: &str = "v3/backlinks/backlinks/live";
pub const PATH_REFERRING_DOMAINS: &str = "v3/backlinks/referring_domains/live";
pub const PATH_DOMAIN_PAGES: &str = "v3/backlinks/domain_pages/live";
pub const PATH_COMPETITORS_DOMAIN: &str = "v3/dataforseo_labs/google/competitors_domain/live";

/// Vendor success codes live in the 20000 range.
pub fn is_success_code(code: u32) -> bool {
    (20000..30000).contains(&code)
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaskResponse<T> {
    #[serde(default)]
    pub status_code: u32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default = "Vec::new")]
    pub tasks: Vec<Task<T>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Task<T> {
    #[serde(default)]
    pub status_code: u32,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub cost: f64,
    pub result: Option<Vec<T>>,
}

/// Results of every task, flattened, with the reported cost.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResults<T> {
    pub cost: f64,
    pub results: Vec<T>,
}

impl<T> TaskResults<T> {
    /// The first result, for endpoints that answer with a single result object.
    pub fn into_first(self) -> Option<T> {
        self.results.into_iter().next()
    }
}

impl<T> TaskResponse<T> {
    /// Check the top-level and per-task status codes and flatten all results.
    pub fn into_results(self) -> Result<TaskResults<T>, String> {
        if !is_success_code(self.status_code) {
            return Err(format!("status {}: {}", self.status_code, self.status_message));
        }

        let mut results = Vec::new();
        for task in self.tasks {
            if !is_success_code(task.status_code) {
                return Err(format!("task status {}: {}", task.status_code, task.status_message));
            }
            results.extend(task.result.unwrap_or_default());
        }

        Ok(TaskResults {
            cost: self.cost,
            results,
        })
    }
}
