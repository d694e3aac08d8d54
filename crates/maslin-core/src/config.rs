//! # Import Configuration
//!
//! One structured value holding every setting of an import run: the
//! globals files to preload, the model options, and the ingestion limits.
//!
//! The value is assembled once, before ingestion, from defaults, an
//! optional TOML file and command-line options (the binary owns those
//! sources). Deserialization rejects unknown keys.

use crate::MaslinError;
use crate::ingestor::{ErrorPolicy, IngestConfig};
use crate::model::{Model, ModelOption};
use crate::primitives::{DEFAULT_MAX_LINE_LENGTH, MAX_VALUE_LENGTH};
use serde::Deserialize;
use std::path::PathBuf;

/// Settings of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Record streams loaded into the model, in order, before stdin.
    pub globals: Vec<PathBuf>,
    /// Value of the `actiondialect` model option.
    pub action_dialect: Option<String>,
    /// Value of the `projectroot` model option.
    pub project_root: Option<PathBuf>,
    /// Longest accepted input line in bytes.
    pub max_line_length: usize,
    /// Handling of record-level failures.
    pub on_error: ErrorPolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            globals: Vec::new(),
            action_dialect: None,
            project_root: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            on_error: ErrorPolicy::Stop,
        }
    }
}

impl ImportConfig {
    /// Check the settings for consistency.
    ///
    /// The line capacity must at least hold a record carrying one maximal
    /// value, and option values must not be empty.
    pub fn validate(&self) -> Result<(), MaslinError> {
        if self.max_line_length <= MAX_VALUE_LENGTH {
            return Err(MaslinError::Config(format!(
                "max_line_length must exceed {} bytes, got {}",
                MAX_VALUE_LENGTH, self.max_line_length
            )));
        }
        if self.action_dialect.as_deref() == Some("") {
            return Err(MaslinError::Config(
                "action dialect must not be empty".to_string(),
            ));
        }
        if self
            .project_root
            .as_ref()
            .is_some_and(|root| root.as_os_str().is_empty())
        {
            return Err(MaslinError::Config(
                "project root must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Ingestion limits derived from these settings.
    #[must_use]
    pub fn ingest_config(&self) -> IngestConfig {
        IngestConfig {
            max_line_length: self.max_line_length,
            on_error: self.on_error,
        }
    }

    /// Set the model options carried by these settings.
    pub fn apply_to(&self, model: &mut Model) {
        if let Some(dialect) = &self.action_dialect {
            model.set_option(ModelOption::ActionDialect, dialect.as_str());
        }
        if let Some(root) = &self.project_root {
            model.set_option(ModelOption::ProjectRoot, root.to_string_lossy());
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
