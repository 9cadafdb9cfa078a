use crate::core::inputs::Inputs;
use crate::models::RANK_SENTINEL;
use crate::rubric::{FlagSlot, Mapping, Outcome, Selector, Span};

/// Raw points for one dimension, before modulation and clamping
pub fn apply(mapping: &Mapping, inputs: &Inputs, cap: f64) -> f64 {
    match mapping {
        Mapping::Band { step, penalty, .. } => {
            let (lo, hi) = inputs.band.unwrap_or((1, 1));
            let rank = inputs.value.unwrap_or(f64::from(RANK_SENTINEL));
            band_score(rank, lo, hi, *step, *penalty, cap)
        }
        Mapping::Coverage => coverage_score(inputs.matched.len(), inputs.selected, cap),
        Mapping::Threshold => threshold_score(inputs.value, inputs.limit, cap),
        Mapping::Table(outcome) => evaluate(outcome, inputs),
    }
}

/// Full points inside the band, minus `penalty` x cap per started step outside
#[inline]
pub fn band_score(rank: f64, lo: u32, hi: u32, step: u32, penalty: f64, cap: f64) -> f64 {
    let (lo, hi) = (f64::from(lo), f64::from(hi));
    if rank >= lo && rank <= hi {
        return cap;
    }
    let distance = if rank < lo { lo - rank } else { rank - hi };
    let steps = (distance / f64::from(step.max(1))).ceil();
    (cap - penalty * cap * steps).max(0.0)
}

/// Share of selected interests the candidate covers
#[inline]
pub fn coverage_score(hits: usize, selected: usize, cap: f64) -> f64 {
    if selected == 0 {
        return 0.0;
    }
    cap * (hits.min(selected) as f64 / selected as f64)
}

/// Full points within the limit, linear penalty by overage ratio
///
/// No stated limit scores 0; an unknown candidate value scores half the cap.
#[inline]
pub fn threshold_score(value: Option<f64>, limit: Option<f64>, cap: f64) -> f64 {
    let Some(limit) = limit.filter(|l| *l > 0.0) else {
        return 0.0;
    };
    let Some(value) = value else {
        return cap / 2.0;
    };
    if value <= limit {
        return cap;
    }
    let over_ratio = (value - limit) / limit;
    (cap * (1.0 - over_ratio)).max(0.0)
}

/// Clamp `value` into `input` and map it linearly onto `output`
#[inline]
pub fn interpolate(value: f64, input: Span, output: Span, gain: f64) -> f64 {
    let clamped = value.clamp(input.lo, input.hi);
    let fraction = (clamped - input.lo) / (input.hi - input.lo);
    let raw = output.lo + fraction * (output.hi - output.lo) * gain;
    raw.clamp(output.lo.min(output.hi), output.lo.max(output.hi))
}

fn evaluate(outcome: &Outcome, inputs: &Inputs) -> f64 {
    match outcome {
        Outcome::Points(points) => *points,
        Outcome::Lookup {
            on,
            arms,
            otherwise,
        } => {
            let key = match on {
                Selector::Choice => inputs.choice,
                Selector::Secondary => inputs.secondary,
            };
            let branch = arms
                .iter()
                .find(|(arm, _)| *arm == key)
                .map(|(_, outcome)| outcome)
                .unwrap_or(otherwise.as_ref());
            evaluate(branch, inputs)
        }
        Outcome::Flag { on, yes, no } => {
            let flag = match on {
                FlagSlot::Primary => inputs.flag,
                FlagSlot::Secondary => inputs.secondary_flag,
            };
            if flag.unwrap_or(false) {
                evaluate(yes, inputs)
            } else {
                evaluate(no, inputs)
            }
        }
        Outcome::Linear {
            input,
            output,
            missing,
        } => interpolate(inputs.value.unwrap_or(*missing), *input, *output, inputs.gain),
        Outcome::Window {
            within,
            inside,
            outside,
        } => match inputs.value {
            Some(v) if v >= within.lo && v <= within.hi => *inside,
            _ => *outside,
        },
        Outcome::Sum(parts) => parts.iter().map(|part| evaluate(part, inputs)).sum(),
        Outcome::IfMissing { absent, present } => match inputs.value {
            None => *absent,
            Some(_) => evaluate(present, inputs),
        },
    }
}
