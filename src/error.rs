use crate::models::Market;
use crate::services::ProviderError;
use thiserror::Error;

/// Fatal configuration problems; never recovered by falling back to a default
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("no target market declared")]
    MissingMarket,

    #[error("unknown target market: {0}")]
    UnknownMarket(String),

    #[error("rubric for {market} is malformed: {reason}")]
    MalformedRubric { market: Market, reason: String },
}

/// Errors surfaced by a matching run
#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no candidates exist for market {market}")]
    EmptyMarket { market: Market },

    #[error("matching cancelled during {stage}")]
    Cancelled { stage: &'static str },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Per-candidate explanation failure; degrades that candidate only
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),

    #[error("failed to render explanation: {0}")]
    Format(#[from] std::fmt::Error),
}
