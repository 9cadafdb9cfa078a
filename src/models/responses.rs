use crate::models::domain::Market;
use crate::models::results::{ApplicationPlan, FallbackReport, MatchResult};
use serde::{Deserialize, Serialize};

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindMatchesResponse {
    pub market: Market,
    pub rubric_version: String,
    pub matches: Vec<MatchResult>,
    pub fallback: FallbackReport,
    pub pool_size: usize,
    pub total_results: usize,
    pub plan: ApplicationPlan,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// One market the service can match against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub market: Market,
    pub code: String,
    pub rubric_version: String,
    pub candidates: usize,
}

/// Response for the markets endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketsResponse {
    pub markets: Vec<MarketSummary>,
}
