//! Aggregation pipelines.
//!
//! Each pipeline is a public "data function" that takes the shared
//! [`Providers`](crate::providers::Providers) and returns a typed output. The
//! CLI handlers and the HTTP handlers both call these functions.

use crate::error::ProviderRequestError;

pub mod domain;
pub mod opportunity;
pub mod serp;

/// Turn a soft provider failure into `None`, logging it.
pub(crate) fn soft<T>(result: Result<T, ProviderRequestError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("{err}; continuing without it");
            None
        }
    }
}
