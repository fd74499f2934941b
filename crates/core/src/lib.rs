//! Core library for seolens
//!
//! This crate implements the **Functional Core** of the seolens application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`seolens_core`** (this crate): vendor data models, scoring heuristics and
//!   pure transformations, with zero I/O
//! - **`seolens`**: provider clients, pipelines, the HTTP API and the CLI (the
//!   Imperative Shell)
//!
//! The shell fetches vendor payloads, hands them to the functions in this crate
//! and serializes whatever comes back. Nothing here knows where the data came
//! from, so every transformation is tested with fixture data and no mocking.
//!
//! # Module Organization
//!
//! - [`moz`]: site-authority vendor JSON-RPC models and site metrics
//! - [`dataforseo`]: SERP vendor task envelope and endpoint paths
//! - [`scoring`]: popularity, trust and aggregate keyword difficulty
//! - [`serp`]: organic item extraction and competitor construction
//! - [`keywords`]: seed parsing, brand filtering, ranking and monthly trends
//! - [`backlinks`]: summary/history normalizers and backlink list flattening
//! - [`report`]: domain metrics response assembly
//! - [`prompt`]: the opportunity-finder prompt
//! - [`domain`]: domain input normalization
//!
//! # Example Usage
//!
//! ```rust
//! use seolens_core::moz::SiteMetrics;
//! use seolens_core::scoring::{compute_popularity_score, compute_trust_score};
//!
//! let metrics = SiteMetrics::default();
//!
//! assert_eq!(compute_popularity_score(&metrics), 5);
//! assert_eq!(compute_trust_score(&metrics), 5);
//! ```

pub mod backlinks;
pub mod dataforseo;
pub mod domain;
pub mod keywords;
pub mod moz;
pub mod prompt;
pub mod report;
pub mod scoring;
pub mod serp;
