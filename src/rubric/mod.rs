//! Per-market rubric configuration
//!
//! A rubric is static data: which hard filters exist and when they switch on,
//! which scoring dimensions contribute how many points and through which
//! mapping family, and the order in which constraints are relaxed when the
//! hard filters starve the result set. One engine evaluates every rubric.

pub mod australia;
pub mod generic;
pub mod registry;
pub mod singapore;
pub mod united_kingdom;

use crate::error::ConfigError;
use crate::models::{AcademicBand, MainConcern, Market};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use registry::RubricRegistry;

/// Upper bound for any weight modulation factor (±20%)
pub const MODULATION_BOUND: f64 = 0.2;

/// Total points a rubric distributes over its dimensions
pub const TOTAL_WEIGHT: f64 = 100.0;

/// Complete configuration for one market
#[derive(Debug, Clone)]
pub struct Rubric {
    pub market: Market,
    pub version: &'static str,
    pub filters: Vec<FilterSpec>,
    pub dimensions: Vec<DimensionSpec>,
    pub modulation: Option<Modulation>,
    pub ladder: Vec<Rung>,
    pub synonyms: &'static SynonymTable,
}

/// Canonical token → synonyms, checked in order
pub type SynonymTable = [(&'static str, &'static [&'static str])];

impl Rubric {
    pub fn filter(&self, key: FilterKey) -> Option<&FilterSpec> {
        self.filters.iter().find(|f| f.key == key)
    }

    pub fn dimension(&self, kind: DimensionKind) -> Option<&DimensionSpec> {
        self.dimensions.iter().find(|d| d.kind == kind)
    }

    /// Check the rubric is well-formed before it is ever used
    pub fn validate(&self) -> Result<(), ConfigError> {
        let malformed = |reason: String| ConfigError::MalformedRubric {
            market: self.market,
            reason,
        };

        if self.dimensions.is_empty() {
            return Err(malformed("no scoring dimensions".to_string()));
        }

        let mut seen = HashSet::new();
        for dim in &self.dimensions {
            if !seen.insert(dim.kind) {
                return Err(malformed(format!("dimension {:?} declared twice", dim.kind)));
            }
            if !dim.weight.is_finite() || dim.weight <= 0.0 {
                return Err(malformed(format!(
                    "dimension {:?} has invalid weight {}",
                    dim.kind, dim.weight
                )));
            }
            dim.mapping
                .validate()
                .map_err(|reason| malformed(format!("dimension {:?}: {}", dim.kind, reason)))?;
        }

        let total: f64 = self.dimensions.iter().map(|d| d.weight).sum();
        if (total - TOTAL_WEIGHT).abs() > 1e-6 {
            return Err(malformed(format!("weights sum to {} instead of 100", total)));
        }

        if let Some(modulation) = &self.modulation {
            if self.dimension(modulation.dimension).is_none() {
                return Err(malformed(format!(
                    "modulation targets missing dimension {:?}",
                    modulation.dimension
                )));
            }
            for factor in [modulation.reputation, modulation.balanced, modulation.value] {
                if !(1.0 - MODULATION_BOUND..=1.0 + MODULATION_BOUND).contains(&factor) {
                    return Err(malformed(format!(
                        "modulation factor {} outside ±{}%",
                        factor,
                        MODULATION_BOUND * 100.0
                    )));
                }
            }
        }

        let mut keys = HashSet::new();
        for filter in &self.filters {
            if !keys.insert(filter.key) {
                return Err(malformed(format!("filter {:?} declared twice", filter.key)));
            }
        }
        if self.filter(FilterKey::Market).is_none() {
            return Err(malformed("market filter is missing".to_string()));
        }

        for rung in &self.ladder {
            if rung.label.trim().is_empty() {
                return Err(malformed("fallback rung without label".to_string()));
            }
            match rung.relax {
                Relaxation::Drop(FilterKey::Market) => {
                    return Err(malformed("the market filter cannot be relaxed".to_string()));
                }
                Relaxation::Drop(key) if self.filter(key).is_none() => {
                    return Err(malformed(format!("rung drops undeclared filter {:?}", key)));
                }
                Relaxation::WidenBudget { default_tolerance, .. }
                    if !(default_tolerance > 0.0 && default_tolerance <= 1.0) =>
                {
                    return Err(malformed(format!(
                        "budget tolerance {} out of range",
                        default_tolerance
                    )));
                }
                Relaxation::WidenBand { ranks: 0 } => {
                    return Err(malformed("band widening of zero steps".to_string()));
                }
                Relaxation::Pool { take: 0, .. } => {
                    return Err(malformed("pool rung takes no candidates".to_string()));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Identifies a hard filter so rungs can relax it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Market,
    Budget,
    AcademicBand,
    Interests,
    Locality,
    SchoolType,
    WorkIntegratedLearning,
    EnglishTest,
    OxbridgeMedicine,
    Foundation,
    PlacementYear,
    TuitionGrant,
    Bond,
    InterviewPortfolio,
}

/// One hard-filter predicate descriptor
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub key: FilterKey,
    pub predicate: Predicate,
    pub activation: Activation,
    /// What a missing candidate field means for this predicate
    pub on_missing: NullPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullPolicy {
    /// Must-have: missing data fails
    Fail,
    /// Absence-tolerant: missing data passes
    Pass,
}

/// Predicate families shared by all markets
#[derive(Debug, Clone)]
pub enum Predicate {
    InMarket,
    WithinBudget,
    RankWithinBand(BandTable),
    InterestOverlap,
    Locality(LocalityRule),
    SchoolTypeMatch,
    FlagRequired(Flag),
    /// Every listed flag must be false
    FlagsExcluded(Vec<Flag>),
    /// Excludes test-requiring schools only for users who need longer to prepare
    EnglishReadiness,
    BondFree,
}

/// How a locality preference is compared to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalityRule {
    /// City aliases, exact match against any preferred city
    AustraliaCity,
    /// London must match exactly, other regions by containment
    UnitedKingdomRegion,
    /// State or city containment
    GenericRegion,
}

/// When a filter is enforced for a given profile
#[derive(Debug, Clone)]
pub enum Activation {
    Always,
    Toggle(Toggle),
    Required(RequirementField),
    RegionStated,
    CitiesStated,
    InterestsStated,
    SchoolTypeStated,
    NeedsLongerForEnglish,
    All(Vec<Activation>),
}

/// Boolean strictness switches on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    HardBudget,
    HardRankBand,
    HardInterestMatch,
    HardSchoolType,
    HardRegion,
    HardEnglishExclude,
    OxbridgeMustCover,
    TuitionGrantMust,
    RefuseBond,
    RefuseInterviewOrPortfolio,
}

/// Required/bonus/not-important answers that can turn into a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementField {
    WorkIntegratedLearning,
    Foundation,
    PlacementYear,
}

/// Candidate boolean facts referenced by filters and scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Scholarship,
    InternshipProgram,
    EarlyDecision,
    EarlyAction,
    GroupOfEight,
    WorkIntegratedLearning,
    RequiresEnglishTest,
    RussellGroup,
    PlacementYear,
    Foundation,
    OxbridgeMedicineDeadline,
    TuitionGrant,
    InterviewRequired,
    EssayOrPortfolioRequired,
    CoopRequired,
}

/// Academic tier → inclusive rank band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandTable {
    pub top: (u32, u32),
    pub strong: (u32, u32),
    pub solid: (u32, u32),
    pub developing: (u32, u32),
}

impl BandTable {
    pub fn band(&self, tier: AcademicBand) -> (u32, u32) {
        match tier {
            AcademicBand::Top => self.top,
            AcademicBand::Strong => self.strong,
            AcademicBand::Solid => self.solid,
            AcademicBand::Developing => self.developing,
        }
    }
}

/// One weighted scoring dimension
#[derive(Debug, Clone)]
pub struct DimensionSpec {
    pub kind: DimensionKind,
    /// Maximum points; the dimension is clamped to this cap
    pub weight: f64,
    pub mapping: Mapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    Academic,
    Interests,
    Budget,
    Internship,
    SchoolType,
    Region,
    InternationalCommunity,
    ApplicationRound,
    WorkIntegratedLearning,
    GroupOfEight,
    City,
    PostStudyVisa,
    English,
    Scholarship,
    StudyLength,
    Intakes,
    UcasRoute,
    PlacementYear,
    RussellGroup,
    PersonalStatement,
    AdmissionsTests,
    Orientation,
    TuitionGrant,
    InterviewPortfolio,
    DoubleDegree,
    Exchange,
    Safety,
}

impl DimensionKind {
    pub fn title(&self) -> &'static str {
        match self {
            DimensionKind::Academic => "Academic level",
            DimensionKind::Interests => "Subject match",
            DimensionKind::Budget => "Budget",
            DimensionKind::Internship => "Internships",
            DimensionKind::SchoolType => "School type",
            DimensionKind::Region => "Region",
            DimensionKind::InternationalCommunity => "International community",
            DimensionKind::ApplicationRound => "Application round",
            DimensionKind::WorkIntegratedLearning => "Work-integrated learning",
            DimensionKind::GroupOfEight => "Group of Eight",
            DimensionKind::City => "City",
            DimensionKind::PostStudyVisa => "Post-study work visa",
            DimensionKind::English => "English requirement",
            DimensionKind::Scholarship => "Scholarships",
            DimensionKind::StudyLength => "Study length",
            DimensionKind::Intakes => "Intakes",
            DimensionKind::UcasRoute => "UCAS route",
            DimensionKind::PlacementYear => "Placement year",
            DimensionKind::RussellGroup => "Russell Group",
            DimensionKind::PersonalStatement => "Personal statement",
            DimensionKind::AdmissionsTests => "Admissions tests",
            DimensionKind::Orientation => "Industry vs research",
            DimensionKind::TuitionGrant => "Tuition grant and bond",
            DimensionKind::InterviewPortfolio => "Interview and portfolio",
            DimensionKind::DoubleDegree => "Double degree",
            DimensionKind::Exchange => "Exchange",
            DimensionKind::Safety => "Safety and comfort",
        }
    }
}

/// Mapping-function family used by a dimension
#[derive(Debug, Clone)]
pub enum Mapping {
    /// Full score inside the tier's rank band, linear decay per started step outside
    Band {
        tiers: BandTable,
        step: u32,
        /// Fraction of the cap lost per step
        penalty: f64,
    },
    /// Fraction of selected interests found among the candidate's strengths
    Coverage,
    /// Full score within the profile limit, linear penalty by overage ratio
    Threshold,
    /// Profile-conditioned categorical lookup
    Table(Outcome),
}

impl Mapping {
    fn validate(&self) -> Result<(), String> {
        match self {
            Mapping::Band { step, penalty, .. } => {
                if *step == 0 {
                    return Err("band step must be positive".to_string());
                }
                if !(0.0..=1.0).contains(penalty) {
                    return Err(format!("band penalty {} outside [0, 1]", penalty));
                }
                Ok(())
            }
            Mapping::Coverage | Mapping::Threshold => Ok(()),
            Mapping::Table(outcome) => outcome.validate(),
        }
    }
}

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }
}

/// Which resolved choice a lookup reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Choice,
    Secondary,
}

/// Which resolved candidate flag a split reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSlot {
    Primary,
    Secondary,
}

/// Points produced by a table dimension
#[derive(Debug, Clone)]
pub enum Outcome {
    Points(f64),
    /// Choose a branch by a profile choice key
    Lookup {
        on: Selector,
        arms: Vec<(&'static str, Outcome)>,
        otherwise: Box<Outcome>,
    },
    /// Split on a candidate flag; missing counts as false
    Flag {
        on: FlagSlot,
        yes: Box<Outcome>,
        no: Box<Outcome>,
    },
    /// Clamp the candidate value to `input`, map linearly onto `output`
    Linear {
        input: Span,
        output: Span,
        /// Value used when the candidate has none
        missing: f64,
    },
    /// Fixed points depending on whether the candidate value falls in `within`
    Window {
        within: Span,
        inside: f64,
        outside: f64,
    },
    Sum(Vec<Outcome>),
    /// Neutral points when the candidate value is missing
    IfMissing {
        absent: f64,
        present: Box<Outcome>,
    },
}

impl Outcome {
    pub fn lookup(on: Selector, arms: Vec<(&'static str, Outcome)>, otherwise: Outcome) -> Self {
        Outcome::Lookup {
            on,
            arms,
            otherwise: Box::new(otherwise),
        }
    }

    pub fn flag(yes: Outcome, no: Outcome) -> Self {
        Outcome::Flag {
            on: FlagSlot::Primary,
            yes: Box::new(yes),
            no: Box::new(no),
        }
    }

    pub fn secondary_flag(yes: Outcome, no: Outcome) -> Self {
        Outcome::Flag {
            on: FlagSlot::Secondary,
            yes: Box::new(yes),
            no: Box::new(no),
        }
    }

    pub fn linear(input: Span, output: Span, missing: f64) -> Self {
        Outcome::Linear {
            input,
            output,
            missing,
        }
    }

    pub fn if_missing(absent: f64, present: Outcome) -> Self {
        Outcome::IfMissing {
            absent,
            present: Box::new(present),
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Outcome::Points(p) if !p.is_finite() || *p < 0.0 => {
                Err(format!("invalid fixed points {}", p))
            }
            Outcome::Points(_) => Ok(()),
            Outcome::Lookup { arms, otherwise, .. } => {
                for (_, arm) in arms {
                    arm.validate()?;
                }
                otherwise.validate()
            }
            Outcome::Flag { yes, no, .. } => {
                yes.validate()?;
                no.validate()
            }
            Outcome::Linear { input, output, .. } => {
                if input.hi <= input.lo {
                    return Err(format!("degenerate input span {:?}", input));
                }
                if output.lo < 0.0 || output.hi < 0.0 {
                    return Err(format!("negative output span {:?}", output));
                }
                Ok(())
            }
            Outcome::Window { within, .. } if within.hi < within.lo => {
                Err(format!("inverted window {:?}", within))
            }
            Outcome::Window { .. } => Ok(()),
            Outcome::Sum(parts) => parts.iter().try_for_each(Outcome::validate),
            Outcome::IfMissing { present, .. } => present.validate(),
        }
    }
}

/// Profile choice that scales one dimension within ±20%
#[derive(Debug, Clone, Copy)]
pub struct Modulation {
    pub dimension: DimensionKind,
    pub reputation: f64,
    pub balanced: f64,
    pub value: f64,
}

/// One step of the fallback ladder
#[derive(Debug, Clone)]
pub struct Rung {
    pub label: &'static str,
    pub relax: Relaxation,
    /// Skip this rung when the guard holds for the profile
    pub guard: Option<Guard>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Relaxation {
    Drop(FilterKey),
    WidenBudget {
        default_tolerance: f64,
        /// Use the profile's own tolerance when it is non-zero
        honour_profile: bool,
    },
    /// Extend both ends of the rank band
    WidenBand {
        ranks: u32,
    },
    /// In-market candidates ranked within the ceiling, cheapest first
    Pool {
        rank_ceiling: u32,
        take: usize,
    },
}

/// Machine-readable tag of a relaxation that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "filter")]
pub enum RelaxationKind {
    Dropped(FilterKey),
    WidenedBudget,
    WidenedBand,
    Pool,
    LastResort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Concern(MainConcern),
    RefusesBond,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> Rubric {
        Rubric {
            market: Market::Generic,
            version: "test",
            filters: vec![FilterSpec {
                key: FilterKey::Market,
                predicate: Predicate::InMarket,
                activation: Activation::Always,
                on_missing: NullPolicy::Fail,
            }],
            dimensions: vec![DimensionSpec {
                kind: DimensionKind::Budget,
                weight: 100.0,
                mapping: Mapping::Threshold,
            }],
            modulation: None,
            ladder: vec![],
            synonyms: &[],
        }
    }

    #[test]
    fn test_minimal_rubric_is_valid() {
        assert!(minimal().validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let mut rubric = minimal();
        rubric.dimensions[0].weight = 90.0;
        assert!(matches!(
            rubric.validate(),
            Err(ConfigError::MalformedRubric { .. })
        ));
    }

    #[test]
    fn test_modulation_bounded() {
        let mut rubric = minimal();
        rubric.modulation = Some(Modulation {
            dimension: DimensionKind::Budget,
            reputation: 1.5,
            balanced: 1.0,
            value: 0.8,
        });
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_market_filter_cannot_be_dropped() {
        let mut rubric = minimal();
        rubric.ladder.push(Rung {
            label: "drop market",
            relax: Relaxation::Drop(FilterKey::Market),
            guard: None,
        });
        assert!(rubric.validate().is_err());
    }

    #[test]
    fn test_degenerate_linear_rejected() {
        let mut rubric = minimal();
        rubric.dimensions[0].mapping = Mapping::Table(Outcome::linear(
            Span::new(1.0, 1.0),
            Span::new(0.0, 100.0),
            0.0,
        ));
        assert!(rubric.validate().is_err());
    }
}
