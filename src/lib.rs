//! Uni Match - university shortlist matching engine
//!
//! This library matches a pool of universities against a parent/student
//! questionnaire under a market-specific rubric. It implements a multi-stage
//! pipeline: hard filters, a fallback ladder when filtering starves the
//! result set, weighted scoring, deterministic ranking and per-result
//! explanations.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod rubric;
pub mod services;

// Re-export commonly used types
pub use core::{CancelFlag, Matcher, MatcherOptions};
pub use error::{ConfigError, ExplainError, MatchError};
pub use models::{FindMatchesRequest, FindMatchesResponse, MatchOutcome, MatchResult, PreferenceProfile, University};
pub use rubric::RubricRegistry;
pub use services::{CandidateProvider, JsonCorpus, ProviderError};
