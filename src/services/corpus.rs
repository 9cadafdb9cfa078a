use crate::models::{Market, University};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur when loading or serving candidates
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse corpus {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of candidate universities, injected per call
pub trait CandidateProvider: Send + Sync {
    /// Candidates of one market
    fn candidates(&self, market: Market) -> Result<Vec<University>, ProviderError>;
}

/// Accepted corpus layouts: a bare array or `{"universities": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    List(Vec<University>),
    Wrapped { universities: Vec<University> },
}

impl CorpusFile {
    fn into_universities(self) -> Vec<University> {
        match self {
            CorpusFile::List(universities) => universities,
            CorpusFile::Wrapped { universities } => universities,
        }
    }
}

/// In-memory corpus loaded once from a JSON file
///
/// Universities are bucketed by market on load; countries outside every
/// market are dropped with a warning.
#[derive(Debug, Clone, Default)]
pub struct JsonCorpus {
    by_market: HashMap<Market, Vec<University>>,
}

impl JsonCorpus {
    /// Load a corpus file asynchronously
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| ProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_slice(&bytes, &path.display().to_string())
    }

    /// Load a corpus file on the calling thread
    pub fn load_blocking<P: AsRef<Path>>(path: P) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_slice(&bytes, &path.display().to_string())
    }

    /// Parse corpus JSON; `origin` names the source in errors
    pub fn from_slice(bytes: &[u8], origin: &str) -> Result<Self, ProviderError> {
        let file: CorpusFile =
            serde_json::from_slice(bytes).map_err(|source| ProviderError::Parse {
                path: origin.to_string(),
                source,
            })?;
        let corpus = Self::from_universities(file.into_universities());
        info!(origin, total = corpus.len(), "corpus loaded");
        Ok(corpus)
    }

    pub fn from_universities(universities: Vec<University>) -> Self {
        let mut by_market: HashMap<Market, Vec<University>> = HashMap::new();
        let mut unplaced = 0usize;

        for university in universities {
            match Market::ALL.iter().find(|m| university.in_market(**m)) {
                Some(market) => by_market.entry(*market).or_default().push(university),
                None => {
                    debug!(id = %university.id, country = %university.country, "no market for candidate");
                    unplaced += 1;
                }
            }
        }

        if unplaced > 0 {
            warn!(unplaced, "corpus entries outside every market were dropped");
        }

        Self { by_market }
    }

    pub fn len(&self) -> usize {
        self.by_market.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Candidate count per market
    pub fn market_sizes(&self) -> Vec<(Market, usize)> {
        Market::ALL
            .iter()
            .map(|m| (*m, self.by_market.get(m).map_or(0, Vec::len)))
            .collect()
    }
}

impl CandidateProvider for JsonCorpus {
    fn candidates(&self, market: Market) -> Result<Vec<University>, ProviderError> {
        Ok(self.by_market.get(&market).cloned().unwrap_or_default())
    }
}
