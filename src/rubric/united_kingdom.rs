//! United Kingdom rubric

use super::*;
use crate::core::synonyms::BASIC_SYNONYMS;

pub const VERSION: &str = "uk-2024.3";

pub const BANDS: BandTable = BandTable {
    top: (1, 50),
    strong: (1, 100),
    solid: (50, 200),
    developing: (100, 300),
};

pub const REGION_ALIASES: &[(&str, &[&str])] = &[
    ("london", &["london", "伦敦"]),
    ("england", &["england", "英格兰"]),
    ("scotland", &["scotland", "苏格兰"]),
    ("wales", &["wales", "威尔士"]),
    ("northern ireland", &["northern ireland", "北爱尔兰"]),
];

pub fn rubric() -> Rubric {
    use Outcome::Points;

    let ucas = Outcome::Sum(vec![
        Outcome::lookup(
            Selector::Choice,
            vec![
                ("oxbridge_medicine", Outcome::flag(Points(10.0), Points(0.0))),
                ("regular", Outcome::secondary_flag(Points(10.0), Points(5.0))),
            ],
            Points(6.0),
        ),
        // intake bonus only counts when the deadline is known
        Outcome::lookup(
            Selector::Secondary,
            vec![
                ("asap", Outcome::if_missing(0.0, Points(2.0))),
                ("within_two_years", Outcome::if_missing(0.0, Points(1.0))),
            ],
            Points(0.0),
        ),
    ]);

    Rubric {
        market: Market::UnitedKingdom,
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
                key: FilterKey::OxbridgeMedicine,
                predicate: Predicate::FlagRequired(Flag::OxbridgeMedicineDeadline),
                activation: Activation::Toggle(Toggle::OxbridgeMustCover),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::Foundation,
                predicate: Predicate::FlagRequired(Flag::Foundation),
                activation: Activation::Required(RequirementField::Foundation),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::PlacementYear,
                predicate: Predicate::FlagRequired(Flag::PlacementYear),
                activation: Activation::Required(RequirementField::PlacementYear),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::Locality,
                predicate: Predicate::Locality(LocalityRule::UnitedKingdomRegion),
                activation: Activation::RegionStated,
                on_missing: NullPolicy::Fail,
            },
        ],
        dimensions: vec![
            DimensionSpec {
                kind: DimensionKind::Academic,
                weight: 10.0,
                mapping: Mapping::Band {
                    tiers: BANDS,
                    step: 50,
                    penalty: 0.3,
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
                kind: DimensionKind::UcasRoute,
                weight: 10.0,
                mapping: Mapping::Table(ucas),
            },
            DimensionSpec {
                kind: DimensionKind::PlacementYear,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("required", Outcome::flag(Points(10.0), Points(0.0))),
                        ("bonus", Outcome::flag(Points(7.0), Points(4.0))),
                    ],
                    Points(5.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::RussellGroup,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("high", Outcome::flag(Points(10.0), Points(4.0))),
                        ("medium", Outcome::flag(Points(8.0), Points(6.0))),
                    ],
                    Points(5.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::PersonalStatement,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::Sum(vec![
                    Points(4.0),
                    Outcome::linear(Span::new(1.0, 10.0), Span::new(0.0, 6.0), 1.0),
                ])),
            },
            DimensionSpec {
                kind: DimensionKind::AdmissionsTests,
                weight: 5.0,
                mapping: Mapping::Table(Outcome::flag(
                    Outcome::lookup(
                        Selector::Choice,
                        vec![("high", Points(5.0)), ("medium", Points(3.0))],
                        Points(0.0),
                    ),
                    Points(3.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::Region,
                weight: 7.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![("any", Points(7.0))],
                    Outcome::flag(Points(7.0), Points(3.5)),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::InternationalCommunity,
                weight: 8.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        (
                            "high",
                            Outcome::linear(Span::new(0.1, 0.35), Span::new(0.0, 8.0), 0.0),
                        ),
                        ("medium", Points(4.8)),
                    ],
                    Points(3.2),
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
                label: "Relaxed the region restriction",
                relax: Relaxation::Drop(FilterKey::Locality),
                guard: Some(Guard::Concern(MainConcern::Region)),
            },
            Rung {
                label: "Widened the budget ceiling",
                relax: Relaxation::WidenBudget {
                    default_tolerance: 0.1,
                    honour_profile: true,
                },
                guard: None,
            },
            Rung {
                label: "Relaxed the placement year requirement",
                relax: Relaxation::Drop(FilterKey::PlacementYear),
                guard: None,
            },
            Rung {
                label: "Relaxed the Oxbridge/medicine deadline requirement",
                relax: Relaxation::Drop(FilterKey::OxbridgeMedicine),
                guard: None,
            },
            Rung {
                label: "Relaxed the foundation year requirement",
                relax: Relaxation::Drop(FilterKey::Foundation),
                guard: None,
            },
            Rung {
                label: "Broadened to the top 250 by tuition",
                relax: Relaxation::Pool {
                    rank_ceiling: 250,
                    take: 10,
                },
                guard: None,
            },
        ],
        synonyms: BASIC_SYNONYMS,
    }
}

/// Canonical region for a free-text name
pub fn canonical_region(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    REGION_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&lower.as_str()))
        .map(|(region, _)| region.to_string())
        .unwrap_or(lower)
}
