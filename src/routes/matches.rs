use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::{dispatch, Matcher};
use crate::error::MatchError;
use crate::models::{
    ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse, MarketSummary,
    MarketsResponse,
};
use crate::services::CandidateProvider;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub provider: Arc<dyn CandidateProvider>,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/markets", web::get().to(list_markets))
        .route("/matches/find", web::post().to(find_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Markets with their rubric version and candidate count
async fn list_markets(state: web::Data<AppState>) -> impl Responder {
    let registry = state.matcher.registry();
    let mut markets: Vec<MarketSummary> = Vec::new();

    for market in crate::models::Market::ALL {
        let Ok(rubric) = registry.get(market) else {
            continue;
        };
        let candidates = match state.provider.candidates(market) {
            Ok(candidates) => candidates.len(),
            Err(e) => return error_response(&MatchError::Provider(e)),
        };
        markets.push(MarketSummary {
            market,
            code: market.code().to_string(),
            rubric_version: rubric.version.to_string(),
            candidates,
        });
    }

    HttpResponse::Ok().json(MarketsResponse { markets })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "profile": { "target_market": "au", "interests": ["engineering"] },
///   "limit": 10
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request = req.into_inner();
    let limit = state.matching.effective_limit(request.limit);

    let market = match dispatch(state.matcher.registry(), request.profile.target_market.as_deref()) {
        Ok(rubric) => rubric.market,
        Err(e) => return error_response(&MatchError::Config(e)),
    };

    let candidates = match state.provider.candidates(market) {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to load candidates for {}: {}", market, e);
            return error_response(&MatchError::Provider(e));
        }
    };

    tracing::info!("Finding matches in {} among {} candidates, limit: {:?}", market, candidates.len(), limit);

    // Scoring is CPU-bound; keep it off the async workers
    let matcher = state.matcher.clone();
    let result = web::block(move || matcher.find_matches(&request.profile, &candidates, limit)).await;

    match result {
        Ok(Ok(outcome)) => HttpResponse::Ok().json(FindMatchesResponse {
            market: outcome.market,
            rubric_version: outcome.rubric_version,
            total_results: outcome.results.len(),
            matches: outcome.results,
            fallback: outcome.fallback,
            pool_size: outcome.pool_size,
            plan: outcome.plan,
        }),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            tracing::error!("Matching task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matching failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Map an engine error to its JSON error response
fn error_response(err: &MatchError) -> HttpResponse {
    let (status, error) = match err {
        MatchError::Config(_) => (StatusCode::BAD_REQUEST, "Invalid configuration"),
        MatchError::EmptyMarket { .. } => (StatusCode::NOT_FOUND, "No candidates"),
        MatchError::Cancelled { .. } => (StatusCode::SERVICE_UNAVAILABLE, "Matching cancelled"),
        MatchError::Provider(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load candidates"),
    };

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status.as_u16(),
    })
}
