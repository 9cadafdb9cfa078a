use crate::core::filters::{filter_active, passes_all, Relaxations};
use crate::core::inputs::refuses_bond;
use crate::models::{FallbackReport, PreferenceProfile, University};
use crate::rubric::{FilterKey, Guard, Relaxation, RelaxationKind, Rubric, Rung};
use std::cmp::Ordering;
use tracing::debug;

/// Unconditional last-resort size
pub const LAST_RESORT_TAKE: usize = 10;

/// How the surviving candidates were admitted
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    Strict,
    /// Through relaxed filters; fired rungs in order
    Relaxed(Vec<FiredRung>),
    /// Through the unconditional pool rung
    Pool(Vec<FiredRung>),
    LastResort(Vec<FiredRung>),
}

impl Admission {
    pub fn fired(&self) -> &[FiredRung] {
        match self {
            Admission::Strict => &[],
            Admission::Relaxed(fired) | Admission::Pool(fired) | Admission::LastResort(fired) => {
                fired
            }
        }
    }
}

/// A rung that took effect, with its rendered label
#[derive(Debug, Clone, PartialEq)]
pub struct FiredRung {
    pub label: String,
    pub kind: RelaxationKind,
}

/// Candidates admitted by the filter stage or the ladder
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub survivors: Vec<&'a University>,
    pub admission: Admission,
    pub report: FallbackReport,
}

/// Run the hard filters, then the fallback ladder if nothing survives
///
/// Relaxations accumulate: rung k filters the original pool with rungs
/// 1..=k applied. Rungs with no effect or blocked by a guard are skipped and
/// not recorded. `pool` holds the in-market candidates; the selection is
/// never empty when the pool is not.
pub fn select<'a>(
    rubric: &Rubric,
    pool: &[&'a University],
    profile: &PreferenceProfile,
) -> Selection<'a> {
    let strict = Relaxations::strict();
    let survivors = filter(rubric, pool, profile, &strict);
    if !survivors.is_empty() {
        return Selection {
            survivors,
            admission: Admission::Strict,
            report: FallbackReport::default(),
        };
    }

    let mut relax = Relaxations::strict();
    let mut fired = Vec::new();
    let mut report = FallbackReport::default();

    for rung in &rubric.ladder {
        if guarded(rung, profile) {
            debug!(rung = rung.label, "fallback rung skipped by guard");
            continue;
        }

        match rung.relax {
            Relaxation::Pool { rank_ceiling, take } => {
                let label = rung.label.to_string();
                report.record(label.clone(), RelaxationKind::Pool);
                fired.push(FiredRung {
                    label,
                    kind: RelaxationKind::Pool,
                });
                let survivors = pool_rung(pool, rank_ceiling, take);
                debug!(rung = rung.label, survivors = survivors.len(), "pool rung applied");
                if !survivors.is_empty() {
                    return Selection {
                        survivors,
                        admission: Admission::Pool(fired),
                        report,
                    };
                }
                continue;
            }
            _ => {
                let Some(step) = apply_rung(rubric, rung, profile, &mut relax) else {
                    debug!(rung = rung.label, "fallback rung has no effect");
                    continue;
                };
                report.record(step.label.clone(), step.kind);
                fired.push(step);
            }
        }

        let survivors = filter(rubric, pool, profile, &relax);
        debug!(rung = rung.label, survivors = survivors.len(), "fallback rung applied");
        if !survivors.is_empty() {
            return Selection {
                survivors,
                admission: Admission::Relaxed(fired),
                report,
            };
        }
    }

    let label = format!("Showing the {} best-ranked universities in this market", LAST_RESORT_TAKE);
    report.record(label.clone(), RelaxationKind::LastResort);
    fired.push(FiredRung {
        label,
        kind: RelaxationKind::LastResort,
    });

    let mut survivors: Vec<&University> = pool.to_vec();
    survivors.sort_by(|a, b| by_rank(a, b));
    survivors.truncate(LAST_RESORT_TAKE);

    Selection {
        survivors,
        admission: Admission::LastResort(fired),
        report,
    }
}

fn filter<'a>(
    rubric: &Rubric,
    pool: &[&'a University],
    profile: &PreferenceProfile,
    relax: &Relaxations,
) -> Vec<&'a University> {
    pool.iter()
        .copied()
        .filter(|candidate| passes_all(rubric, candidate, profile, relax))
        .collect()
}

/// Whether the profile protects this rung's constraint
fn guarded(rung: &Rung, profile: &PreferenceProfile) -> bool {
    match rung.guard {
        Some(Guard::Concern(concern)) => profile.concerned_about(concern),
        Some(Guard::RefusesBond) => refuses_bond(profile),
        None => false,
    }
}

/// Fold a rung into the accumulated relaxations; `None` when it changes nothing
fn apply_rung(
    rubric: &Rubric,
    rung: &Rung,
    profile: &PreferenceProfile,
    relax: &mut Relaxations,
) -> Option<FiredRung> {
    match rung.relax {
        Relaxation::Drop(key) => {
            if !filter_active(rubric, key, profile) || relax.is_dropped(key) {
                return None;
            }
            relax.dropped.push(key);
            Some(FiredRung {
                label: rung.label.to_string(),
                kind: RelaxationKind::Dropped(key),
            })
        }
        Relaxation::WidenBudget {
            default_tolerance,
            honour_profile,
        } => {
            if !filter_active(rubric, FilterKey::Budget, profile)
                || relax.is_dropped(FilterKey::Budget)
                || profile.budget().is_none()
            {
                return None;
            }
            let stated = profile.budget_tolerance.fraction();
            let tolerance = if honour_profile && stated > 0.0 {
                stated
            } else {
                default_tolerance
            };
            if tolerance <= relax.budget_tolerance {
                return None;
            }
            relax.budget_tolerance = tolerance;
            Some(FiredRung {
                label: format!("{} to +{:.0}%", rung.label, tolerance * 100.0),
                kind: RelaxationKind::WidenedBudget,
            })
        }
        Relaxation::WidenBand { ranks } => {
            if !filter_active(rubric, FilterKey::AcademicBand, profile)
                || relax.is_dropped(FilterKey::AcademicBand)
            {
                return None;
            }
            relax.band_widening += ranks;
            Some(FiredRung {
                label: rung.label.to_string(),
                kind: RelaxationKind::WidenedBand,
            })
        }
        Relaxation::Pool { .. } => None,
    }
}

/// In-market candidates ranked within the ceiling, cheapest first
///
/// When none is ranked within the ceiling, the best `ceiling` by rank stand in.
fn pool_rung<'a>(pool: &[&'a University], rank_ceiling: u32, take: usize) -> Vec<&'a University> {
    let mut eligible: Vec<&University> = pool
        .iter()
        .copied()
        .filter(|c| c.rank.is_some_and(|rank| rank <= rank_ceiling))
        .collect();

    if eligible.is_empty() {
        eligible = pool.to_vec();
        eligible.sort_by(|a, b| by_rank(a, b));
        eligible.truncate(rank_ceiling as usize);
    }

    eligible.sort_by(|a, b| {
        cmp_missing_last(a.tuition_usd, b.tuition_usd).then_with(|| by_rank(a, b))
    });
    eligible.truncate(take);
    eligible
}

#[inline]
fn by_rank(a: &University, b: &University) -> Ordering {
    a.rank_or_sentinel()
        .cmp(&b.rank_or_sentinel())
        .then_with(|| a.id.cmp(&b.id))
}

/// Ascending with `None` after every value
#[inline]
pub fn cmp_missing_last(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
