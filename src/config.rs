//! Configuration for query building and search dispatch.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AskmeError, Result};
use crate::query::term::{DEFAULT_FIELDS, MatchMode};

/// Configuration shared by the builder and the search boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AskmeConfig {
    /// Document fields every term is matched against.
    pub search_fields: Vec<String>,

    /// Name of the index queries are sent to.
    pub index: String,

    /// Number of hits requested per search.
    pub max_results: usize,

    /// Match mode of terms created by the builder.
    pub default_match_mode: MatchMode,
}

impl Default for AskmeConfig {
    fn default() -> Self {
        Self {
            search_fields: DEFAULT_FIELDS.iter().map(|f| f.to_string()).collect(),
            index: "xdd".to_string(),
            max_results: 20,
            default_match_mode: MatchMode::Phrase,
        }
    }
}

impl AskmeConfig {
    /// Load a configuration from a JSON file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AskmeError::config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: AskmeConfig = serde_json::from_str(&content).map_err(|e| {
            AskmeError::config(format!(
                "Failed to parse configuration JSON from '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values no query could work with.
    pub fn validate(&self) -> Result<()> {
        if self.search_fields.is_empty() {
            return Err(AskmeError::config("search_fields must not be empty"));
        }
        if self.search_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(AskmeError::config("search_fields must not contain blank names"));
        }
        if self.max_results == 0 {
            return Err(AskmeError::config("max_results must be positive"));
        }
        Ok(())
    }

    /// Set the searched fields.
    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the target index.
    pub fn with_index<S: Into<String>>(mut self, index: S) -> Self {
        self.index = index.into();
        self
    }

    /// Set the number of hits requested per search.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set the match mode of new terms.
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.default_match_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = AskmeConfig::default();
        assert_eq!(config.search_fields, vec!["title", "abstract", "text"]);
        assert_eq!(config.max_results, 20);
        assert_eq!(config.default_match_mode, MatchMode::Phrase);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"index": "xdd-bio", "default_match_mode": "best_fields"}}"#).unwrap();

        let config = AskmeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.index, "xdd-bio");
        assert_eq!(config.default_match_mode, MatchMode::BestFields);
        assert_eq!(config.search_fields, AskmeConfig::default().search_fields);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"search_fields": []}}"#).unwrap();

        let err = AskmeConfig::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, AskmeError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AskmeConfig::load_from_file("/nonexistent/askme.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration file"));
    }

    #[test]
    fn test_builder_methods() {
        let config = AskmeConfig::default()
            .with_search_fields(["title"])
            .with_index("xdd-geo")
            .with_max_results(5)
            .with_match_mode(MatchMode::BestFields);
        assert_eq!(config.search_fields, vec!["title"]);
        assert_eq!(config.index, "xdd-geo");
        assert_eq!(config.max_results, 5);
        assert!(AskmeConfig::default().with_max_results(0).validate().is_err());
    }
}
