//! Configuration types for citekit.
//!
//! [`CiteConfig`] is loaded from `~/.citekit/config.yaml` (or an explicit path).
//! A missing file is not an error: defaults apply.
//!
//! ```yaml
//! citations:
//!   strategy: position
//!   missingIndexMarker: "???"
//!   logUnresolved: true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CiteError;
use crate::mapper::CitationStrategy;
use crate::render::DEFAULT_MISSING_INDEX_MARKER;

/// Directory name under the home directory.
pub const CITEKIT_HOME_DIR: &str = ".citekit";

/// Configuration file name.
pub const CONFIG_FILENAME: &str = "config.yaml";

// ============================================================================
// CitationsSection
// ============================================================================

/// Citation resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationsSection {
    /// Canonical pipeline for this deployment.
    #[serde(default)]
    pub strategy: CitationStrategy,

    /// Placeholder printed by the prompt renderer for items without an
    /// aggregator index.
    #[serde(default = "default_missing_index_marker")]
    pub missing_index_marker: String,

    /// Debug-log each citation that found no source.
    #[serde(default = "default_log_unresolved")]
    pub log_unresolved: bool,
}

fn default_missing_index_marker() -> String {
    DEFAULT_MISSING_INDEX_MARKER.to_string()
}

fn default_log_unresolved() -> bool {
    true
}

impl Default for CitationsSection {
    fn default() -> Self {
        Self {
            strategy: CitationStrategy::default(),
            missing_index_marker: default_missing_index_marker(),
            log_unresolved: default_log_unresolved(),
        }
    }
}

impl CitationsSection {
    /// Validate the section.
    ///
    /// Returns warnings for suspicious values. A marker that spans lines would
    /// break the prompt layout and is rejected.
    pub fn validate(&self) -> Result<Vec<String>, CiteError> {
        let mut warnings = Vec::new();

        if self.missing_index_marker.contains('\n') || self.missing_index_marker.contains('\r') {
            return Err(CiteError::InvalidConfiguration {
                message: "citations.missingIndexMarker contains a line break".to_string(),
                hint: "Use a single-line marker such as `???`".to_string(),
            });
        }

        if self.missing_index_marker.trim().is_empty() {
            warnings.push(
                "citations.missingIndexMarker is empty; unindexed sources will render as `Source []:`"
                    .to_string(),
            );
        }

        Ok(warnings)
    }
}

// ============================================================================
// CiteConfig
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiteConfig {
    #[serde(default)]
    pub citations: CitationsSection,
}

impl CiteConfig {
    /// Load the configuration from `~/.citekit/config.yaml`.
    ///
    /// # Errors
    ///
    /// See [`CiteConfig::from_path`].
    pub fn load_default() -> Result<Self, CiteError> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load the configuration from `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CiteError::ConfigRead`] or [`CiteError::ConfigParse`] when the
    /// file exists but cannot be used, and [`CiteError::InvalidConfiguration`]
    /// when validation fails.
    pub fn from_path(path: &Path) -> Result<Self, CiteError> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| CiteError::ConfigRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // An empty file parses as YAML null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(&content).map_err(|e| CiteError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        for warning in config.validate()? {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Default config directory (`~/.citekit`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CITEKIT_HOME_DIR))
    }

    /// Default config file path (`~/.citekit/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join(CONFIG_FILENAME))
    }

    /// Validate the whole configuration, returning collected warnings.
    pub fn validate(&self) -> Result<Vec<String>, CiteError> {
        self.citations.validate()
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, CiteError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
