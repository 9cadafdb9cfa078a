//! Australian rubric

use super::*;
use crate::core::synonyms::EXTENDED_SYNONYMS;

pub const VERSION: &str = "au-2024.3";

pub const BANDS: BandTable = BandTable {
    top: (1, 60),
    strong: (1, 100),
    solid: (60, 200),
    developing: (100, 300),
};

/// Cities with recognised aliases; other names compare verbatim
pub const CITY_ALIASES: &[(&str, &[&str])] = &[
    ("sydney", &["sydney", "悉尼"]),
    ("melbourne", &["melbourne", "墨尔本"]),
    ("brisbane", &["brisbane", "布里斯班"]),
    ("adelaide", &["adelaide", "阿德莱德"]),
    ("perth", &["perth", "珀斯"]),
];

pub fn rubric() -> Rubric {
    use Outcome::Points;

    let english = Outcome::flag(
        Outcome::lookup(
            Selector::Choice,
            vec![
                ("ready", Points(6.0)),
                ("within_three_months", Points(3.6)),
                (
                    "needs_longer",
                    Outcome::lookup(Selector::Secondary, vec![("accepts", Points(1.2))], Points(0.0)),
                ),
            ],
            Points(0.0),
        ),
        Points(4.8),
    );

    Rubric {
        market: Market::Australia,
        version: VERSION,
        filters: vec![
            FilterSpec {
                key: FilterKey::Market,
                predicate: Predicate::InMarket,
                activation: Activation::Always,
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::Budget,
                predicate: Predicate::WithinBudget,
                activation: Activation::Toggle(Toggle::HardBudget),
                on_missing: NullPolicy::Pass,
            },
            FilterSpec {
                key: FilterKey::WorkIntegratedLearning,
                predicate: Predicate::FlagRequired(Flag::WorkIntegratedLearning),
                activation: Activation::Required(RequirementField::WorkIntegratedLearning),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::Locality,
                predicate: Predicate::Locality(LocalityRule::AustraliaCity),
                activation: Activation::CitiesStated,
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::EnglishTest,
                predicate: Predicate::EnglishReadiness,
                activation: Activation::All(vec![
                    Activation::Toggle(Toggle::HardEnglishExclude),
                    Activation::NeedsLongerForEnglish,
                ]),
                on_missing: NullPolicy::Pass,
            },
        ],
        dimensions: vec![
            DimensionSpec {
                kind: DimensionKind::Academic,
                weight: 10.0,
                mapping: Mapping::Band {
                    tiers: BANDS,
                    step: 50,
                    penalty: 0.5,
                },
            },
            DimensionSpec {
                kind: DimensionKind::Interests,
                weight: 20.0,
                mapping: Mapping::Coverage,
            },
            DimensionSpec {
                kind: DimensionKind::Budget,
                weight: 10.0,
                mapping: Mapping::Threshold,
            },
            DimensionSpec {
                kind: DimensionKind::WorkIntegratedLearning,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        (
                            "required",
                            Outcome::flag(
                                Outcome::Sum(vec![
                                    Points(7.0),
                                    Outcome::linear(Span::new(0.0, 1.0), Span::new(0.0, 3.0), 0.0),
                                ]),
                                Points(0.0),
                            ),
                        ),
                        (
                            "bonus",
                            Outcome::flag(
                                Outcome::Sum(vec![
                                    Points(5.0),
                                    Outcome::linear(Span::new(0.0, 1.0), Span::new(0.0, 2.0), 0.0),
                                ]),
                                Points(4.0),
                            ),
                        ),
                    ],
                    Points(3.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::GroupOfEight,
                weight: 8.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("high", Outcome::flag(Points(8.0), Points(3.0))),
                        ("medium", Outcome::flag(Points(6.0), Points(5.0))),
                    ],
                    Points(5.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::City,
                weight: 6.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![("any", Points(4.2))],
                    Outcome::flag(Points(6.0), Points(3.0)),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::PostStudyVisa,
                weight: 8.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        (
                            "high",
                            Outcome::linear(Span::new(2.0, 4.0), Span::new(0.0, 8.0), 2.0),
                        ),
                        ("medium", Points(4.8)),
                    ],
                    Points(3.2),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::English,
                weight: 6.0,
                mapping: Mapping::Table(english),
            },
            DimensionSpec {
                kind: DimensionKind::InternationalCommunity,
                weight: 6.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        (
                            "high",
                            Outcome::linear(Span::new(0.1, 0.6), Span::new(0.0, 6.0), 0.0),
                        ),
                        ("medium", Points(3.6)),
                    ],
                    Points(2.4),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::Scholarship,
                weight: 6.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("high", Outcome::flag(Points(6.0), Points(1.8))),
                        ("medium", Outcome::flag(Points(4.2), Points(3.0))),
                    ],
                    Points(3.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::StudyLength,
                weight: 5.0,
                mapping: Mapping::Table(Outcome::if_missing(
                    3.0,
                    Outcome::lookup(
                        Selector::Choice,
                        vec![
                            (
                                "shorter",
                                Outcome::linear(Span::new(3.5, 5.0), Span::new(5.0, 2.0), 3.5),
                            ),
                            (
                                "standard",
                                Outcome::Window {
                                    within: Span::new(3.0, 4.0),
                                    inside: 5.0,
                                    outside: 3.0,
                                },
                            ),
                        ],
                        Points(3.0),
                    ),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::Intakes,
                weight: 5.0,
                mapping: Mapping::Table(Outcome::if_missing(
                    3.0,
                    Outcome::lookup(
                        Selector::Choice,
                        vec![
                            ("asap", Outcome::flag(Points(5.0), Points(3.0))),
                            ("within_two_years", Outcome::flag(Points(4.0), Points(3.0))),
                        ],
                        Points(3.0),
                    ),
                )),
            },
        ],
        modulation: Some(Modulation {
            dimension: DimensionKind::Academic,
            reputation: 1.2,
            balanced: 1.0,
            value: 0.8,
        }),
        ladder: vec![
            Rung {
                label: "Relaxed the city preference",
                relax: Relaxation::Drop(FilterKey::Locality),
                guard: None,
            },
            Rung {
                label: "Widened the budget ceiling",
                relax: Relaxation::WidenBudget {
                    default_tolerance: 0.1,
                    honour_profile: false,
                },
                guard: None,
            },
            Rung {
                label: "Relaxed the English test exclusion",
                relax: Relaxation::Drop(FilterKey::EnglishTest),
                guard: None,
            },
            Rung {
                label: "Relaxed the work-integrated learning requirement",
                relax: Relaxation::Drop(FilterKey::WorkIntegratedLearning),
                guard: None,
            },
            Rung {
                label: "Broadened to the top 200 by tuition",
                relax: Relaxation::Pool {
                    rank_ceiling: 200,
                    take: 10,
                },
                guard: None,
            },
        ],
        synonyms: EXTENDED_SYNONYMS,
    }
}

/// Canonical city for a free-text name
pub fn canonical_city(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    CITY_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&lower.as_str()))
        .map(|(city, _)| city.to_string())
        .unwrap_or(lower)
}
