use crate::core::inputs::{resolve_inputs, Inputs};
use crate::core::mapping::apply;
use crate::models::{DimensionScore, PreferenceProfile, ReputationPreference, University};
use crate::rubric::{Modulation, Rubric};

/// Score of one candidate with the inputs each dimension read
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a University,
    /// 0-100, two decimals
    pub total: f64,
    pub breakdown: Vec<DimensionScore>,
    /// Parallel to `breakdown`
    pub inputs: Vec<Inputs>,
}

/// Calculate a match score (0-100) for a candidate under a rubric
///
/// Each dimension resolves its inputs, applies its mapping family, applies
/// the rubric modulation when it targets this dimension, and is clamped to
/// `[0, weight]`. Weights sum to 100 so the total needs no normalisation.
pub fn score_candidate<'a>(
    rubric: &Rubric,
    candidate: &'a University,
    profile: &PreferenceProfile,
) -> ScoredCandidate<'a> {
    let mut total = 0.0;
    let mut breakdown = Vec::with_capacity(rubric.dimensions.len());
    let mut resolved = Vec::with_capacity(rubric.dimensions.len());

    for spec in &rubric.dimensions {
        let inputs = resolve_inputs(rubric, spec, candidate, profile);
        let mut points = apply(&spec.mapping, &inputs, spec.weight);

        if let Some(modulation) = rubric.modulation.filter(|m| m.dimension == spec.kind) {
            points *= modulation_factor(&modulation, profile);
        }

        // the published breakdown must sum to the published total
        let points = if points.is_finite() {
            round2(points.clamp(0.0, spec.weight))
        } else {
            0.0
        };
        total += points;

        breakdown.push(DimensionScore {
            dimension: spec.kind,
            points,
            cap: spec.weight,
        });
        resolved.push(inputs);
    }

    ScoredCandidate {
        candidate,
        total: round2(total.clamp(0.0, 100.0)),
        breakdown,
        inputs: resolved,
    }
}

/// Multiplier a reputation/value answer applies to the modulated dimension
#[inline]
pub fn modulation_factor(modulation: &Modulation, profile: &PreferenceProfile) -> f64 {
    match profile.reputation_vs_value {
        ReputationPreference::Reputation => modulation.reputation,
        ReputationPreference::Balanced => modulation.balanced,
        ReputationPreference::Value => modulation.value,
    }
}

#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
