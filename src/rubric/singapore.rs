//! Singapore rubric

use super::*;
use crate::core::synonyms::BASIC_SYNONYMS;

pub const VERSION: &str = "sg-2024.3";

pub const BANDS: BandTable = BandTable {
    top: (1, 50),
    strong: (1, 100),
    solid: (50, 200),
    developing: (100, 300),
};

/// Tag keywords that signal double-degree programmes
pub const DOUBLE_DEGREE_TAGS: &[&str] = &["double degree", "dsa", "interdisciplinary", "dual", "joint"];

pub fn rubric() -> Rubric {
    use Outcome::Points;

    let links = |max: f64| Outcome::linear(Span::new(1.0, 10.0), Span::new(0.0, max), 1.0);

    Rubric {
        market: Market::Singapore,
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
                key: FilterKey::TuitionGrant,
                predicate: Predicate::FlagRequired(Flag::TuitionGrant),
                activation: Activation::Toggle(Toggle::TuitionGrantMust),
                on_missing: NullPolicy::Fail,
            },
            FilterSpec {
                key: FilterKey::Bond,
                predicate: Predicate::BondFree,
                activation: Activation::Toggle(Toggle::RefuseBond),
                on_missing: NullPolicy::Pass,
            },
            FilterSpec {
                key: FilterKey::InterviewPortfolio,
                predicate: Predicate::FlagsExcluded(vec![
                    Flag::InterviewRequired,
                    Flag::EssayOrPortfolioRequired,
                ]),
                activation: Activation::Toggle(Toggle::RefuseInterviewOrPortfolio),
                on_missing: NullPolicy::Pass,
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
                weight: 15.0,
                mapping: Mapping::Threshold,
            },
            DimensionSpec {
                kind: DimensionKind::Orientation,
                weight: 15.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        (
                            "industry",
                            Outcome::Sum(vec![links(15.0), Outcome::flag(Points(5.0), Points(0.0))]),
                        ),
                        (
                            "research",
                            Outcome::Window {
                                within: Span::new(8.0, 10.0),
                                inside: 12.0,
                                outside: 10.0,
                            },
                        ),
                    ],
                    Outcome::Sum(vec![links(12.0), Outcome::flag(Points(3.0), Points(0.0))]),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::TuitionGrant,
                weight: 5.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("willing", Outcome::flag(Points(5.0), Points(3.0))),
                        ("avoid", Outcome::secondary_flag(Points(5.0), Points(0.0))),
                        ("refuse", Outcome::secondary_flag(Points(5.0), Points(0.0))),
                    ],
                    Points(3.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::InterviewPortfolio,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::flag(
                    Outcome::lookup(
                        Selector::Choice,
                        vec![("high", Points(10.0)), ("medium", Points(6.0))],
                        Points(0.0),
                    ),
                    Points(7.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::DoubleDegree,
                weight: 5.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![("wanted", Outcome::flag(Points(5.0), Points(3.0)))],
                    Points(5.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::Exchange,
                weight: 5.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![(
                        "wanted",
                        Outcome::linear(Span::new(0.0, 10.0), Span::new(0.0, 5.0), 0.0),
                    )],
                    Points(2.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::Safety,
                weight: 5.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        (
                            "high",
                            Outcome::linear(Span::new(0.0, 10.0), Span::new(0.0, 5.0), 3.0),
                        ),
                        ("medium", Points(3.0)),
                    ],
                    Points(2.0),
                )),
            },
            DimensionSpec {
                kind: DimensionKind::Scholarship,
                weight: 10.0,
                mapping: Mapping::Table(Outcome::lookup(
                    Selector::Choice,
                    vec![
                        ("high", Outcome::flag(Points(10.0), Points(3.0))),
                        ("medium", Outcome::flag(Points(7.0), Points(5.0))),
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
                label: "Widened the budget ceiling",
                relax: Relaxation::WidenBudget {
                    default_tolerance: 0.1,
                    honour_profile: true,
                },
                guard: Some(Guard::Concern(MainConcern::OverBudget)),
            },
            Rung {
                label: "Relaxed the interview/portfolio refusal",
                relax: Relaxation::Drop(FilterKey::InterviewPortfolio),
                guard: Some(Guard::Concern(MainConcern::Interview)),
            },
            Rung {
                label: "Relaxed the bond refusal",
                relax: Relaxation::Drop(FilterKey::Bond),
                guard: Some(Guard::Concern(MainConcern::Bond)),
            },
            Rung {
                label: "Relaxed the tuition grant requirement",
                relax: Relaxation::Drop(FilterKey::TuitionGrant),
                guard: Some(Guard::RefusesBond),
            },
            Rung {
                label: "Widened the academic band by one step",
                relax: Relaxation::WidenBand { ranks: 50 },
                guard: None,
            },
            Rung {
                label: "Broadened to the top 300 by tuition",
                relax: Relaxation::Pool {
                    rank_ceiling: 300,
                    take: 8,
                },
                guard: None,
            },
        ],
        synonyms: BASIC_SYNONYMS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singapore_rubric_valid() {
        let rubric = rubric();
        assert!(rubric.validate().is_ok());
        assert_eq!(rubric.dimensions.len(), 10);
        assert_eq!(rubric.ladder.len(), 6);
    }
}
