//! Generic (United States) rubric

use super::*;
use crate::core::synonyms::BASIC_SYNONYMS;

pub const VERSION: &str = "generic-2024.2";

pub const BANDS: BandTable = BandTable {
    top: (1, 50),
    strong: (1, 100),
    solid: (50, 200),
    developing: (100, 300),
};

pub fn rubric() -> Rubric {
    use Outcome::Points;

    Rubric {
        market: Market::Generic,
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
                key: FilterKey::Interests,
                predicate: Predicate::InterestOverlap,
                activation: Activation::All(vec![
                    Activation::Toggle(Toggle::HardInterestMatch),
                    Activation::InterestsStated,
                ]),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::SchoolType,
                predicate: Predicate::SchoolTypeMatch,
                activation: Activation::All(vec![
                    Activation::Toggle(Toggle::HardSchoolType),
                    Activation::SchoolTypeStated,
                ]),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::Locality,
                predicate: Predicate::Locality(LocalityRule::GenericRegion),
                activation: Activation::All(vec![
                    Activation::Toggle(Toggle::HardRegion),
                    Activation::RegionStated,
                ]),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::AcademicBand,
                predicate: Predicate::RankWithinBand(BANDS),
                activation: Activation::Toggle(Toggle::HardRankBand),
                on_missing: NullPolicy::Fail,
            },
        ],
        dimensions: vec![
            DimensionSpec {
                kind: DimensionKind::Academic,
                weight: 15.0,
                mapping: Mapping::Band {
                    tiers: BANDS,
                    step: 50,
                    penalty: 0.3,
                },
            },
            DimensionSpec {
                kind: DimensionKind::Interests,
                weight: 25.0,
                mapping: Mapping::Coverage,
            },
            DimensionSpec {
                kind: DimensionKind::Budget,
                weight: 15.0,
                mapping: Mapping::Threshold,
            },
            DimensionSpec {
                kind: DimensionKind::Internship,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("high", Outcome::flag(Points(10.0), Points(3.0))),
                        ("medium", Outcome::flag(Points(8.0), Points(5.0))),
                    ],
                    Points(5.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::SchoolType,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![("any", Points(7.0))],
                    Outcome::flag(Points(10.0), Points(4.0)),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::Region,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![("any", Points(7.0))],
                    Outcome::flag(Points(10.0), Points(5.0)),
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
                            Outcome::linear(Span::new(0.05, 0.35), Span::new(0.0, 8.0), 0.0),
                        ),
                        ("medium", Points(4.8)),
                    ],
                    Points(3.2),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::ApplicationRound,
                weight: 7.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("early_decision", Outcome::flag(Points(7.0), Points(2.0))),
                        (
                            "early_action",
                            Outcome::secondary_flag(Points(7.0), Points(3.0)),
                        ),
                    ],
                    Points(5.0),
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
                guard: None,
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
                label: "Relaxed the subject match requirement",
                relax: Relaxation::Drop(FilterKey::Interests),
                guard: None,
            },
            Rung {
                label: "Relaxed the school type restriction",
                relax: Relaxation::Drop(FilterKey::SchoolType),
                guard: None,
            },
            Rung {
                label: "Widened the academic band by one step",
                relax: Relaxation::WidenBand { ranks: 50 },
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
        synonyms: BASIC_SYNONYMS,
    }
}
