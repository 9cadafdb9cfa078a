use crate::core::inputs::{bond_free, candidate_flag, locality_matches, school_type_matches};
use crate::core::synonyms::{matched_interests, selected_count};
use crate::models::{
    EnglishReadiness, PreferenceProfile, Requirement, SchoolTypePreference, University,
};
use crate::rubric::{
    Activation, FilterKey, FilterSpec, NullPolicy, Predicate, RequirementField, Rubric, Toggle,
};

/// Constraint loosening accumulated by the fallback ladder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relaxations {
    pub dropped: Vec<FilterKey>,
    /// Fraction above the budget still accepted
    pub budget_tolerance: f64,
    /// Ranks added to both ends of the academic band
    pub band_widening: u32,
}

impl Relaxations {
    /// No relaxation at all
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn is_dropped(&self, key: FilterKey) -> bool {
        self.dropped.contains(&key)
    }
}

/// Whether a filter is enforced for this profile
pub fn is_active(activation: &Activation, profile: &PreferenceProfile) -> bool {
    match activation {
        Activation::Always => true,
        Activation::Toggle(toggle) => toggle_set(*toggle, profile),
        Activation::Required(field) => {
            let answer = match field {
                RequirementField::WorkIntegratedLearning => profile.australia.wil_preference,
                RequirementField::Foundation => profile.united_kingdom.foundation_need,
                RequirementField::PlacementYear => profile.united_kingdom.placement_year_pref,
            };
            answer == Requirement::Required
        }
        Activation::RegionStated => profile.region().is_some(),
        Activation::CitiesStated => !profile.australia.cities().is_empty(),
        Activation::InterestsStated => selected_count(&profile.interests) > 0,
        Activation::SchoolTypeStated => {
            profile.generic.school_type_preference != SchoolTypePreference::Any
        }
        Activation::NeedsLongerForEnglish => {
            profile.australia.english_readiness == EnglishReadiness::NeedsLonger
        }
        Activation::All(parts) => parts.iter().all(|part| is_active(part, profile)),
    }
}

#[inline]
fn toggle_set(toggle: Toggle, profile: &PreferenceProfile) -> bool {
    match toggle {
        Toggle::HardBudget => profile.hard_budget_must_within,
        Toggle::HardRankBand => profile.hard_rank_within_band,
        Toggle::HardInterestMatch => profile.generic.hard_interest_match,
        Toggle::HardSchoolType => profile.generic.hard_school_type,
        Toggle::HardRegion => profile.generic.hard_region_must_match,
        Toggle::HardEnglishExclude => profile.australia.hard_english_required_exclude,
        Toggle::OxbridgeMustCover => profile.united_kingdom.oxbridge_must_cover,
        Toggle::TuitionGrantMust => profile.singapore.tg_must,
        Toggle::RefuseBond => profile.singapore.hard_refuse_bond,
        Toggle::RefuseInterviewOrPortfolio => profile.singapore.hard_refuse_interview_or_portfolio,
    }
}

/// Whether the filter with `key` exists and is enforced for this profile
pub fn filter_active(rubric: &Rubric, key: FilterKey, profile: &PreferenceProfile) -> bool {
    rubric
        .filter(key)
        .is_some_and(|spec| is_active(&spec.activation, profile))
}

/// Evaluate one predicate; `None` means the candidate lacks the data
fn evaluate(
    rubric: &Rubric,
    predicate: &Predicate,
    candidate: &University,
    profile: &PreferenceProfile,
    relax: &Relaxations,
) -> Option<bool> {
    match predicate {
        Predicate::InMarket => Some(candidate.in_market(rubric.market)),
        Predicate::WithinBudget => {
            let Some(budget) = profile.budget() else {
                return Some(true);
            };
            let ceiling = f64::from(budget) * (1.0 + relax.budget_tolerance);
            candidate.tuition_usd.map(|t| f64::from(t) <= ceiling)
        }
        Predicate::RankWithinBand(tiers) => {
            let (lo, hi) = tiers.band(profile.academic_band);
            let lo = lo.saturating_sub(relax.band_widening).max(1);
            let hi = hi.saturating_add(relax.band_widening);
            candidate.rank.map(|rank| (lo..=hi).contains(&rank))
        }
        Predicate::InterestOverlap => {
            if candidate.strengths.is_empty() {
                return None;
            }
            Some(
                !matched_interests(&profile.interests, &candidate.strengths, rubric.synonyms)
                    .is_empty(),
            )
        }
        Predicate::Locality(rule) => locality_matches(*rule, candidate, profile),
        Predicate::SchoolTypeMatch => {
            let preference = profile.generic.school_type_preference;
            if preference == SchoolTypePreference::Any {
                return Some(true);
            }
            let actual = candidate.generic().and_then(|g| g.school_type)?;
            Some(school_type_matches(preference, actual))
        }
        Predicate::FlagRequired(flag) => candidate_flag(candidate, *flag),
        Predicate::FlagsExcluded(flags) => {
            let values: Vec<Option<bool>> =
                flags.iter().map(|f| candidate_flag(candidate, *f)).collect();
            if values.contains(&Some(true)) {
                Some(false)
            } else if values.iter().all(Option::is_none) {
                None
            } else {
                Some(true)
            }
        }
        Predicate::EnglishReadiness => candidate
            .australia()
            .and_then(|a| a.requires_english_test)
            .map(|required| !required),
        Predicate::BondFree => candidate
            .singapore()?
            .tuition_grant_bond_years
            .map(|years| bond_free(Some(years))),
    }
}

/// Whether a candidate passes one filter under the given relaxations
pub fn passes(
    rubric: &Rubric,
    spec: &FilterSpec,
    candidate: &University,
    profile: &PreferenceProfile,
    relax: &Relaxations,
) -> bool {
    if relax.is_dropped(spec.key) || !is_active(&spec.activation, profile) {
        return true;
    }

    match evaluate(rubric, &spec.predicate, candidate, profile, relax) {
        Some(result) => result,
        None => spec.on_missing == NullPolicy::Pass,
    }
}

/// Check a candidate against every active hard filter
///
/// This is Stage 1 of the matching pipeline. Pure and order-independent.
#[inline]
pub fn passes_all(
    rubric: &Rubric,
    candidate: &University,
    profile: &PreferenceProfile,
    relax: &Relaxations,
) -> bool {
    rubric
        .filters
        .iter()
        .all(|spec| passes(rubric, spec, candidate, profile, relax))
}

/// Whether the candidate fails the strict form of an active filter
pub fn violates(
    rubric: &Rubric,
    key: FilterKey,
    candidate: &University,
    profile: &PreferenceProfile,
) -> bool {
    rubric
        .filter(key)
        .is_some_and(|spec| !passes(rubric, spec, candidate, profile, &Relaxations::strict()))
}
