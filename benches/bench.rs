// Criterion benchmarks for Uni Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use uni_match::core::{scoring::score_candidate, Matcher, MatcherOptions};
use uni_match::models::{AustraliaFields, Market, MarketFields, PreferenceProfile, University};
use uni_match::rubric::RubricRegistry;

const STRENGTHS: [&str; 6] = [
    "Engineering",
    "Computer Science",
    "Business",
    "Medicine",
    "Law",
    "Education",
];

fn create_candidate(id: usize) -> University {
    University {
        id: format!("au-{:05}", id),
        name: format!("University {}", id),
        country: "Australia".to_string(),
        city: Some(["Sydney", "Melbourne", "Brisbane", "Perth"][id % 4].to_string()),
        rank: if id % 9 == 0 { None } else { Some(1 + (id % 400) as u32) },
        tuition_usd: Some(25000 + (id % 30) as u32 * 1000),
        strengths: vec![
            STRENGTHS[id % STRENGTHS.len()].to_string(),
            STRENGTHS[(id / 3) % STRENGTHS.len()].to_string(),
        ],
        tags: vec![],
        intl_rate: Some((id % 40) as f64 / 100.0),
        scholarship_available: Some(id % 2 == 0),
        website: None,
        metadata: Default::default(),
        fields: MarketFields::Australia(AustraliaFields {
            group_of_eight: Some(id % 8 == 0),
            work_integrated_learning: Some(id % 3 == 0),
            placement_rate: Some((id % 60) as f64 / 100.0),
            post_study_visa_years: Some(2.0 + (id % 3) as f64),
            requires_english_test: Some(id % 5 != 0),
            english_requirements: Some("IELTS 6.5".to_string()),
            study_length_years: Some(3.0 + (id % 2) as f64),
            intakes: Some("Feb, Jul".to_string()),
        }),
    }
}

fn create_profile() -> PreferenceProfile {
    let mut profile = PreferenceProfile {
        target_market: Some("au".to_string()),
        interests: vec!["engineering".to_string(), "computer science".to_string()],
        budget_usd: Some(40000),
        ..Default::default()
    };
    profile.australia.city_preferences = vec!["Sydney".to_string(), "Melbourne".to_string()];
    profile
}

fn bench_score_candidate(c: &mut Criterion) {
    let registry = RubricRegistry::builtin().unwrap();
    let rubric = registry.get(Market::Australia).unwrap();
    let candidate = create_candidate(7);
    let profile = create_profile();

    c.bench_function("score_candidate_au", |b| {
        b.iter(|| score_candidate(black_box(rubric), black_box(&candidate), black_box(&profile)));
    });
}

fn bench_matching(c: &mut Criterion) {
    let sequential = Matcher::new(
        RubricRegistry::builtin().unwrap(),
        MatcherOptions {
            workers: 0,
            ..MatcherOptions::default()
        },
    );
    let parallel = Matcher::with_defaults().unwrap();
    let profile = create_profile();

    let mut group = c.benchmark_group("matching");

    for candidate_count in [10, 100, 500, 1000, 5000].iter() {
        let candidates: Vec<University> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("find_matches_sequential", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    sequential.find_matches(black_box(&profile), black_box(&candidates), black_box(Some(20)))
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("find_matches_parallel", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    parallel.find_matches(black_box(&profile), black_box(&candidates), black_box(Some(20)))
                });
            },
        );
    }

    group.finish();
}

fn bench_fallback_ladder(c: &mut Criterion) {
    let matcher = Matcher::with_defaults().unwrap();
    let mut profile = create_profile();
    // no candidate is in Adelaide, so the ladder runs
    profile.australia.city_preferences = vec!["Adelaide".to_string()];
    profile.australia.wil_preference = uni_match::models::Requirement::Required;
    let candidates: Vec<University> = (0..500).map(create_candidate).collect();

    c.bench_function("fallback_ladder_500_candidates", |b| {
        b.iter(|| matcher.find_matches(black_box(&profile), black_box(&candidates), black_box(Some(20))));
    });
}

criterion_group!(
    benches,
    bench_score_candidate,
    bench_matching,
    bench_fallback_ladder
);

criterion_main!(benches);
