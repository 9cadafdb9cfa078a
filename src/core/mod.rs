// Core algorithm exports
pub mod dispatcher;
pub mod explain;
pub mod fallback;
pub mod filters;
pub mod inputs;
pub mod mapping;
pub mod matcher;
pub mod ranking;
pub mod scoring;
pub mod strategy;
pub mod synonyms;

pub use dispatcher::{dispatch, partition};
pub use explain::explain_or_degrade;
pub use fallback::{select, Admission, Selection};
pub use filters::{passes_all, Relaxations};
pub use matcher::{CancelFlag, Matcher, MatcherOptions};
pub use ranking::rank_top;
pub use scoring::{score_candidate, ScoredCandidate};
pub use strategy::plan;
