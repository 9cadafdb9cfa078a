use crate::core::{
    dispatcher::{dispatch, partition},
    explain::explain_or_degrade,
    fallback::{select, Selection},
    ranking::rank_top,
    scoring::{score_candidate, ScoredCandidate},
    strategy::plan,
};
use crate::error::{ConfigError, MatchError};
use crate::models::{MatchOutcome, MatchResult, PreferenceProfile, University};
use crate::rubric::{Rubric, RubricRegistry};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cooperative cancellation, checked between pipeline stages
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    fn check(&self, stage: &'static str) -> Result<(), MatchError> {
        if self.is_cancelled() {
            return Err(MatchError::Cancelled { stage });
        }
        Ok(())
    }
}

/// Tuning for the matcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherOptions {
    /// Results returned when the caller does not ask for a count
    pub default_limit: usize,
    /// Rayon workers for scoring; 0 disables the dedicated pool
    pub workers: usize,
    /// Survivor count at which scoring goes parallel
    pub parallel_threshold: usize,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            default_limit: 20,
            workers: 4,
            parallel_threshold: 256,
        }
    }
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Market dispatch and in-market partition
/// 2. Hard filters, then the fallback ladder when nothing survives
/// 3. Scoring (parallel above the threshold)
/// 4. Ranking with the total-order tie-break
/// 5. Explanations for the returned results
#[derive(Clone)]
pub struct Matcher {
    registry: Arc<RubricRegistry>,
    options: MatcherOptions,
    pool: Option<Arc<ThreadPool>>,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("markets", &self.registry.markets().count())
            .field("options", &self.options)
            .field("parallel", &self.pool.is_some())
            .finish()
    }
}

impl Matcher {
    pub fn new(registry: RubricRegistry, options: MatcherOptions) -> Self {
        let pool = if options.workers > 0 {
            match ThreadPoolBuilder::new()
                .num_threads(options.workers)
                .thread_name(|i| format!("uni-match-score-{}", i))
                .build()
            {
                Ok(pool) => Some(Arc::new(pool)),
                Err(e) => {
                    warn!(error = %e, "scoring pool unavailable, scoring sequentially");
                    None
                }
            }
        } else {
            None
        };

        Self {
            registry: Arc::new(registry),
            options,
            pool,
        }
    }

    /// Matcher over the built-in rubrics
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Ok(Self::new(RubricRegistry::builtin()?, MatcherOptions::default()))
    }

    pub fn options(&self) -> &MatcherOptions {
        &self.options
    }

    pub fn registry(&self) -> &RubricRegistry {
        &self.registry
    }

    /// Find matches for a profile among the candidates
    ///
    /// # Arguments
    /// * `profile` - Questionnaire answers, including the target market
    /// * `candidates` - Candidate pool; other markets are ignored
    /// * `limit` - Maximum number of results to return; `None` uses `default_limit`
    ///
    /// # Returns
    /// MatchOutcome with ranked results and the fallback report
    pub fn find_matches(
        &self,
        profile: &PreferenceProfile,
        candidates: &[University],
        limit: Option<usize>,
    ) -> Result<MatchOutcome, MatchError> {
        self.run(profile, candidates, limit, &CancelFlag::new())
    }

    /// `find_matches` with a cancellation flag checked between stages
    pub fn run(
        &self,
        profile: &PreferenceProfile,
        candidates: &[University],
        limit: Option<usize>,
        cancel: &CancelFlag,
    ) -> Result<MatchOutcome, MatchError> {
        let limit = limit.unwrap_or(self.options.default_limit);

        // Stage 1: dispatch
        cancel.check("dispatch")?;
        let rubric = dispatch(&self.registry, profile.target_market.as_deref())?;
        let market = rubric.market;

        let partition = partition(market, candidates);
        let pool_size = partition.in_market.len();
        if pool_size == 0 {
            return Err(MatchError::EmptyMarket { market });
        }

        // Stage 2: hard filters and fallback ladder
        cancel.check("filter")?;
        let Selection {
            survivors,
            admission,
            report,
        } = select(rubric, &partition.in_market, profile);
        let strict_survivors = if report.applied { 0 } else { survivors.len() };
        debug!(
            market = %market,
            pool = pool_size,
            survivors = survivors.len(),
            fallback = report.applied,
            "filter stage complete"
        );

        // Stage 3: scoring
        cancel.check("score")?;
        let scored = self.score_all(rubric, &survivors, profile);

        // Stage 4: ranking
        cancel.check("rank")?;
        let ranked = rank_top(scored, limit);

        // Stage 5: explanations and round plan
        cancel.check("explain")?;
        let plan = plan(market, profile, &ranked);
        let results: Vec<MatchResult> = ranked
            .iter()
            .map(|scored| {
                let (explanations, status) =
                    explain_or_degrade(rubric, scored, profile, &admission);
                let mut result =
                    MatchResult::new(scored.candidate, scored.total, scored.breakdown.clone());
                result.explanations = explanations;
                result.explanation_status = status;
                result
            })
            .collect();

        info!(
            market = %market,
            rubric = rubric.version,
            results = results.len(),
            fallback_steps = report.steps.len(),
            "matching complete"
        );

        Ok(MatchOutcome {
            market,
            rubric_version: rubric.version.to_string(),
            results,
            fallback: report,
            pool_size,
            strict_survivors,
            plan,
        })
    }

    fn score_all<'a>(
        &self,
        rubric: &Rubric,
        survivors: &[&'a University],
        profile: &PreferenceProfile,
    ) -> Vec<ScoredCandidate<'a>> {
        match &self.pool {
            Some(pool) if survivors.len() >= self.options.parallel_threshold => {
                debug!(candidates = survivors.len(), "scoring in parallel");
                pool.install(|| {
                    survivors
                        .par_iter()
                        .map(|candidate| score_candidate(rubric, candidate, profile))
                        .collect()
                })
            }
            _ => survivors
                .iter()
                .map(|candidate| score_candidate(rubric, candidate, profile))
                .collect(),
        }
    }
}
