// Service exports
pub mod corpus;

pub use corpus::{CandidateProvider, JsonCorpus, ProviderError};
