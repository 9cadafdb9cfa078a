// Integration tests for Uni Match

use actix_web::{web, App};
use std::sync::Arc;
use uni_match::config::MatchingSettings;
use uni_match::core::{CancelFlag, Matcher, MatcherOptions};
use uni_match::models::{
    AcademicBand, FindMatchesResponse, MarketFields, MarketsResponse, PreferenceProfile,
    Requirement, UnitedKingdomFields, University, Verdict,
};
use uni_match::routes::{self, AppState};
use uni_match::rubric::{generic, FilterKey, Relaxation, RelaxationKind, RubricRegistry};
use uni_match::{JsonCorpus, MatchError};

fn create_university(
    id: &str,
    country: &str,
    rank: Option<u32>,
    tuition: Option<u32>,
    strengths: &[&str],
) -> University {
    University {
        id: id.to_string(),
        name: format!("University {}", id.to_uppercase()),
        country: country.to_string(),
        city: None,
        rank,
        tuition_usd: tuition,
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        tags: vec![],
        intl_rate: None,
        scholarship_available: None,
        website: None,
        metadata: Default::default(),
        fields: MarketFields::None,
    }
}

fn create_profile(market: &str) -> PreferenceProfile {
    PreferenceProfile {
        target_market: Some(market.to_string()),
        academic_band: AcademicBand::Top,
        interests: vec!["engineering".to_string()],
        budget_usd: Some(40000),
        ..Default::default()
    }
}

#[test]
fn test_integration_scenario_both_pass() {
    let matcher = Matcher::with_defaults().unwrap();
    let profile = create_profile("au");

    let candidates = vec![
        create_university("b", "Australia", Some(90), Some(60000), &["law"]),
        create_university("a", "Australia", Some(40), Some(38000), &["engineering", "business"]),
    ];

    let outcome = matcher.find_matches(&profile, &candidates, Some(10)).unwrap();

    assert!(!outcome.fallback.applied);
    assert!(outcome.fallback.steps.is_empty());
    let ids: Vec<&str> = outcome.results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let (a, b) = (&outcome.results[0], &outcome.results[1]);
    use uni_match::rubric::DimensionKind::{Academic, Budget, Interests};
    for kind in [Academic, Budget, Interests] {
        assert!(a.points(kind).unwrap() > b.points(kind).unwrap(), "{:?}", kind);
    }
}

#[test]
fn test_integration_scenario_tag_filter_fallback() {
    let matcher = Matcher::with_defaults().unwrap();
    let mut profile = create_profile("generic");
    profile.generic.hard_interest_match = true;

    let candidates = vec![create_university(
        "b",
        "United States",
        Some(90),
        Some(60000),
        &["law"],
    )];

    let outcome = matcher.find_matches(&profile, &candidates, Some(10)).unwrap();

    assert!(outcome.fallback.applied);
    assert_eq!(outcome.fallback.steps, vec!["Relaxed the subject match requirement"]);
    assert_eq!(outcome.strict_survivors, 0);
    assert_eq!(outcome.results.len(), 1);

    let annotation = outcome.results[0].explanations.last().unwrap();
    assert!(annotation.dimension.is_none());
    assert!(annotation.text.contains("Relaxed the subject match requirement"));
}

#[test]
fn test_integration_rungs_fire_in_ladder_order() {
    let matcher = Matcher::with_defaults().unwrap();
    let mut profile = create_profile("uk");
    profile.region_preference = Some("London".to_string());
    profile.united_kingdom.placement_year_pref = Requirement::Required;
    profile.united_kingdom.foundation_need = Requirement::Required;

    let mut candidate = create_university("m", "United Kingdom", Some(30), Some(35000), &["engineering"]);
    candidate.city = Some("Manchester".to_string());
    candidate.fields = MarketFields::UnitedKingdom(UnitedKingdomFields {
        placement_year_available: Some(false),
        foundation_available: Some(false),
        ..Default::default()
    });

    let outcome = matcher.find_matches(&profile, &[candidate], Some(10)).unwrap();

    assert_eq!(
        outcome.fallback.kinds,
        vec![
            RelaxationKind::Dropped(FilterKey::Locality),
            RelaxationKind::Dropped(FilterKey::PlacementYear),
            RelaxationKind::Dropped(FilterKey::Foundation),
        ]
    );
    assert_eq!(outcome.results.len(), 1);
}

#[test]
fn test_integration_last_resort_guarantee() {
    let mut rubric = generic::rubric();
    rubric
        .ladder
        .retain(|rung| !matches!(rung.relax, Relaxation::Pool { .. }));
    let matcher = Matcher::new(
        RubricRegistry::from_rubrics(vec![rubric]).unwrap(),
        MatcherOptions::default(),
    );

    let mut profile = create_profile("us");
    profile.hard_rank_within_band = true;

    // Nothing is ranked, so the band filter can never pass
    let candidates: Vec<University> = (0..15)
        .map(|i| create_university(&format!("u{:02}", i), "United States", None, Some(20000), &[]))
        .collect();

    let outcome = matcher.find_matches(&profile, &candidates, Some(20)).unwrap();

    assert_eq!(outcome.results.len(), 10);
    assert_eq!(outcome.fallback.kinds.last(), Some(&RelaxationKind::LastResort));
}

#[test]
fn test_integration_pool_rung_never_starves() {
    let matcher = Matcher::with_defaults().unwrap();
    let mut profile = create_profile("sg");
    profile.hard_rank_within_band = true;
    profile.singapore.tg_must = true;

    let candidates: Vec<University> = (0..12)
        .map(|i| create_university(&format!("s{:02}", i), "Singapore", Some(400 + i), Some(15000 + i * 100), &[]))
        .collect();

    let outcome = matcher.find_matches(&profile, &candidates, Some(20)).unwrap();

    assert_eq!(outcome.results.len(), 8);
    assert_eq!(outcome.fallback.kinds.last(), Some(&RelaxationKind::Pool));
    for result in &outcome.results {
        let note = result.explanations.last().unwrap();
        assert!(note.dimension.is_none());
        assert_eq!(note.verdict, Verdict::NotApplicable);
    }
}

#[test]
fn test_integration_repeatable() {
    let matcher = Matcher::with_defaults().unwrap();
    let profile = create_profile("generic");
    let candidates: Vec<University> = (0..40)
        .map(|i| {
            create_university(
                &format!("u{:02}", 39 - i),
                "United States",
                if i % 4 == 0 { None } else { Some(10 + (i % 7) * 20) },
                if i % 5 == 0 { None } else { Some(30000 + (i % 3) * 5000) },
                &["Engineering"],
            )
        })
        .collect();

    let first = matcher.find_matches(&profile, &candidates, Some(40)).unwrap();
    let second = matcher.find_matches(&profile, &candidates, Some(40)).unwrap();

    let ids = |o: &uni_match::MatchOutcome| -> Vec<String> {
        o.results.iter().map(|r| r.id.clone()).collect()
    };
    assert_eq!(ids(&first), ids(&second));
    for pair in first.results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn test_integration_cancellation() {
    let matcher = Matcher::with_defaults().unwrap();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let err = matcher
        .run(&create_profile("au"), &[], Some(10), &cancel)
        .unwrap_err();
    assert!(matches!(err, MatchError::Cancelled { .. }));
}

fn create_state() -> AppState {
    let corpus = JsonCorpus::from_universities(vec![
        create_university("a", "Australia", Some(40), Some(38000), &["engineering", "business"]),
        create_university("b", "Australia", Some(90), Some(60000), &["law"]),
        create_university("u", "United States", Some(20), Some(55000), &["engineering"]),
    ]);

    AppState {
        matcher: Matcher::with_defaults().unwrap(),
        provider: Arc::new(corpus),
        matching: MatchingSettings::default(),
    }
}

#[actix_web::test]
async fn test_http_health() {
    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::Data::new(create_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_web::test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}

#[actix_web::test]
async fn test_http_find_matches() {
    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::Data::new(create_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_web::test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(serde_json::json!({
            "profile": {
                "target_market": "au",
                "academic_band": "top",
                "interests": ["engineering"],
                "budget_usd": 40000
            },
            "limit": 5
        }))
        .to_request();

    let body: FindMatchesResponse = actix_web::test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.total_results, 2);
    assert_eq!(body.pool_size, 2);
    assert_eq!(body.matches[0].id, "a");
    assert!(!body.fallback.applied);
    assert_eq!(body.plan.early_decision.as_deref(), Some("a"));
    assert_eq!(body.plan.early_action, vec!["b"]);
    assert!(body.plan.regular_decision.is_empty());
}

#[actix_web::test]
async fn test_http_find_matches_without_limit_uses_configured_default() {
    let matching = MatchingSettings {
        default_limit: 1,
        ..MatchingSettings::default()
    };
    let mut state = create_state();
    state.matcher = Matcher::new(RubricRegistry::builtin().unwrap(), matching.matcher_options());
    state.matching = matching;

    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_web::test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(serde_json::json!({ "profile": { "target_market": "au" } }))
        .to_request();

    let body: FindMatchesResponse = actix_web::test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.pool_size, 2);
    assert_eq!(body.total_results, 1);
}

#[actix_web::test]
async fn test_http_error_statuses() {
    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::Data::new(create_state()))
            .configure(routes::configure_routes),
    )
    .await;

    // unknown market
    let req = actix_web::test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(serde_json::json!({ "profile": { "target_market": "mars" } }))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    // no candidates in the market
    let req = actix_web::test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(serde_json::json!({ "profile": { "target_market": "sg" } }))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);

    // missing market fails validation
    let req = actix_web::test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(serde_json::json!({ "profile": { "interests": ["law"] } }))
        .to_request();
    let resp = actix_web::test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_http_markets() {
    let app = actix_web::test::init_service(
        App::new()
            .app_data(web::Data::new(create_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = actix_web::test::TestRequest::get().uri("/api/v1/markets").to_request();
    let body: MarketsResponse = actix_web::test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.markets.len(), 4);
    let au = body.markets.iter().find(|m| m.code == "au").unwrap();
    assert_eq!(au.candidates, 2);
    assert_eq!(au.rubric_version, "au-2024.3");
}

#[test]
fn test_integration_shipped_corpus_loads() {
    let corpus = JsonCorpus::load_blocking("data/universities.json").unwrap();
    let matcher = Matcher::with_defaults().unwrap();

    for (market, size) in corpus.market_sizes() {
        assert!(size > 0, "{} has no candidates", market);
    }

    let profile = create_profile("sg");
    let candidates = uni_match::CandidateProvider::candidates(&corpus, uni_match::models::Market::Singapore).unwrap();
    let outcome = matcher.find_matches(&profile, &candidates, Some(3)).unwrap();
    assert_eq!(outcome.results.len(), 3);
    assert!(outcome
        .results
        .iter()
        .all(|r| r.explanation_status == uni_match::models::ExplanationStatus::Complete));
}
