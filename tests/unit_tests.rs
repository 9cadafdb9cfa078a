// Unit tests for Uni Match

use uni_match::core::{
    explain::explain,
    fallback::Admission,
    mapping::{coverage_score, threshold_score},
    ranking::rank_top,
    scoring::{round2, score_candidate},
};
use uni_match::models::{
    AustraliaFields, GenericFields, Market, MarketFields, PreferenceProfile, SchoolType,
    SingaporeFields, UnitedKingdomFields, University,
};
use uni_match::rubric::RubricRegistry;

fn create_university(id: &str, fields: MarketFields) -> University {
    let country = fields.market().unwrap_or(Market::Generic).country();
    University {
        id: id.to_string(),
        name: format!("University {}", id),
        country: country.to_string(),
        city: Some("Capital City".to_string()),
        rank: Some(75),
        tuition_usd: Some(42000),
        strengths: vec!["Computer Science".to_string(), "Economics".to_string()],
        tags: vec!["double degree".to_string()],
        intl_rate: Some(0.3),
        scholarship_available: Some(true),
        website: Some("https://example.edu".to_string()),
        metadata: Default::default(),
        fields,
    }
}

fn fully_populated(market: Market) -> MarketFields {
    match market {
        Market::Generic => MarketFields::Generic(GenericFields {
            state: Some("California".to_string()),
            school_type: Some(SchoolType::Private),
            has_internship_program: Some(true),
            has_research_program: Some(true),
            supports_early_decision: Some(true),
            supports_early_action: Some(false),
            acceptance_rate: Some(0.12),
        }),
        Market::Australia => MarketFields::Australia(AustraliaFields {
            group_of_eight: Some(true),
            work_integrated_learning: Some(true),
            placement_rate: Some(0.4),
            post_study_visa_years: Some(3.0),
            requires_english_test: Some(true),
            english_requirements: Some("IELTS 6.5".to_string()),
            study_length_years: Some(3.0),
            intakes: Some("Feb, Jul".to_string()),
        }),
        Market::UnitedKingdom => MarketFields::UnitedKingdom(UnitedKingdomFields {
            russell_group: Some(true),
            placement_year_available: Some(true),
            foundation_available: Some(false),
            ucas_deadline: Some(uni_match::models::UcasDeadline::Main),
            admissions_tests: Some("TMUA".to_string()),
            personal_statement_weight: Some(7),
            interview_required: Some(false),
            study_length_years: Some(3.0),
        }),
        Market::Singapore => MarketFields::Singapore(SingaporeFields {
            tuition_grant_available: Some(true),
            tuition_grant_bond_years: Some(3.0),
            interview_required: Some(true),
            essay_or_portfolio_required: Some(false),
            coop_or_internship_required: Some(true),
            industry_links_score: Some(8),
            exchange_opportunities_score: Some(9),
            safety_score: Some(9.5),
        }),
    }
}

fn create_profile() -> PreferenceProfile {
    PreferenceProfile {
        interests: vec!["cs".to_string(), "economics".to_string(), "law".to_string()],
        budget_usd: Some(45000),
        region_preference: Some("California".to_string()),
        ..Default::default()
    }
}

#[test]
fn test_score_bounds_every_market() {
    let registry = RubricRegistry::builtin().unwrap();
    let profile = create_profile();

    for market in Market::ALL {
        let rubric = registry.get(market).unwrap();
        for fields in [fully_populated(market), MarketFields::None] {
            let candidate = create_university("u1", fields);
            let scored = score_candidate(rubric, &candidate, &profile);

            assert!(scored.total >= 0.0 && scored.total <= 100.0, "{}", market);
            let sum: f64 = scored.breakdown.iter().map(|d| d.points).sum();
            assert_eq!(round2(sum), scored.total, "{}", market);
        }
    }
}

#[test]
fn test_explanations_cover_every_dimension() {
    let registry = RubricRegistry::builtin().unwrap();
    let profile = create_profile();

    for market in Market::ALL {
        let rubric = registry.get(market).unwrap();
        let candidate = create_university("u1", fully_populated(market));
        let scored = score_candidate(rubric, &candidate, &profile);

        let entries = explain(rubric, &scored, &profile, &Admission::Strict).unwrap();
        assert_eq!(entries.len(), rubric.dimensions.len(), "{}", market);
        assert!(entries.iter().all(|e| e.dimension.is_some()));
    }
}

#[test]
fn test_coverage_is_monotonic_in_hits() {
    for selected in 1..=5 {
        let mut previous = coverage_score(0, selected, 25.0);
        for hits in 1..=selected {
            let current = coverage_score(hits, selected, 25.0);
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(previous, 25.0);
    }
}

#[test]
fn test_threshold_max_at_limit_and_less_one_unit_over() {
    for limit in [1000.0, 25000.0, 80000.0] {
        assert_eq!(threshold_score(Some(limit), Some(limit), 15.0), 15.0);
        assert!(threshold_score(Some(limit + 1.0), Some(limit), 15.0) < 15.0);
        assert_eq!(threshold_score(Some(limit - 1.0), Some(limit), 15.0), 15.0);
    }
}

#[test]
fn test_ranking_is_strict_total_order() {
    let registry = RubricRegistry::builtin().unwrap();
    let rubric = registry.get(Market::Generic).unwrap();
    let profile = PreferenceProfile::default();

    // identical scores; tuition, rank and id must separate them
    let mut candidates = Vec::new();
    for (id, rank, tuition) in [
        ("d", None, Some(30000)),
        ("c", Some(10), None),
        ("b", Some(10), Some(30000)),
        ("a", Some(20), Some(30000)),
    ] {
        let mut candidate = create_university(id, MarketFields::None);
        candidate.rank = rank;
        candidate.tuition_usd = tuition;
        candidates.push(candidate);
    }

    let scored: Vec<_> = candidates
        .iter()
        .map(|c| {
            let mut s = score_candidate(rubric, c, &profile);
            s.total = 50.0;
            s
        })
        .collect();

    let ids: Vec<&str> = rank_top(scored, 10)
        .iter()
        .map(|s| s.candidate.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b", "a", "d", "c"]);
}
