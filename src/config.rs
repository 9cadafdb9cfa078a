use crate::core::MatcherOptions;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub corpus: CorpusSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    /// Scoring threads; 0 scores on the request thread
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            workers: default_workers(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl MatchingSettings {
    pub fn matcher_options(&self) -> MatcherOptions {
        MatcherOptions {
            default_limit: usize::from(self.default_limit.min(self.max_limit)),
            workers: self.workers,
            parallel_threshold: self.parallel_threshold,
        }
    }

    /// Requested limit bounded to `1..=max_limit`; `None` leaves the
    /// matcher's `default_limit` in charge
    pub fn effective_limit(&self, requested: Option<u16>) -> Option<usize> {
        requested.map(|limit| usize::from(limit.max(1).min(self.max_limit)))
    }
}

fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 200 }
fn default_workers() -> usize { 4 }
fn default_parallel_threshold() -> usize { 256 }

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusSettings {
    #[serde(default = "default_corpus_path")]
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: default_corpus_path(),
        }
    }
}

fn default_corpus_path() -> String { "data/universities.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with UNIMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., UNIMATCH__MATCHING__WORKERS -> matching.workers
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("UNIMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.default_limit, 20);
        assert_eq!(matching.max_limit, 200);
        assert_eq!(matching.matcher_options().parallel_threshold, 256);
    }

    #[test]
    fn test_effective_limit_is_bounded() {
        let matching = MatchingSettings {
            max_limit: 50,
            ..MatchingSettings::default()
        };
        assert_eq!(matching.effective_limit(None), None);
        assert_eq!(matching.effective_limit(Some(500)), Some(50));
        assert_eq!(matching.effective_limit(Some(0)), Some(1));
        assert_eq!(matching.matcher_options().default_limit, 20);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file_fills_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[matching]\nworkers = 2\n\n[corpus]\npath = \"fixtures/corpus.json\"").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.matching.workers, 2);
        assert_eq!(settings.matching.default_limit, 20);
        assert_eq!(settings.corpus.path, "fixtures/corpus.json");
        assert_eq!(settings.server.port, 8080);
    }
}
