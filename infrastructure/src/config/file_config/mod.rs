//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod batch;
mod logging;
mod openrouter;
mod output;
mod session;

pub use batch::FileBatchConfig;
pub use logging::FileLoggingConfig;
pub use openrouter::FileOpenRouterConfig;
pub use output::FileOutputConfig;
pub use session::FileSessionConfig;

use parley_domain::PromptVersion;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How bad a detected configuration issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// A detected issue in the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    /// Dotted path of the offending key, e.g. `session.prompt_version`
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("{field}: {message}")]
    Invalid { field: String, message: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// OpenRouter participant settings
    pub openrouter: FileOpenRouterConfig,
    /// Session loop settings
    pub session: FileSessionConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Batch runner settings
    pub batch: FileBatchConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Err(e) = self.session.prompt_version.parse::<PromptVersion>() {
            issues.push(ConfigIssue::error("session.prompt_version", e.to_string()));
        }
        if let Err(e) = self.session.survey_policy.validate() {
            issues.push(ConfigIssue::error("session.survey_policy", e.to_string()));
        }
        if self.session.max_turns == Some(0) {
            issues.push(ConfigIssue::error(
                "session.max_turns",
                "max_turns = 0 would stop every session before its first turn",
            ));
        }

        for version in &self.batch.prompt_versions {
            if let Err(e) = version.parse::<PromptVersion>() {
                issues.push(ConfigIssue::error("batch.prompt_versions", e.to_string()));
            }
        }
        if self.batch.max_workers == 0 {
            issues.push(ConfigIssue::warning(
                "batch.max_workers",
                "max_workers = 0, running one session at a time",
            ));
        }
        if self.batch.llm_name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                "batch.llm_name",
                "llm_name cannot be empty, it is part of every output file name",
            ));
        }

        if !(0.0..=2.0).contains(&self.openrouter.temperature) {
            issues.push(ConfigIssue::warning(
                "openrouter.temperature",
                format!(
                    "temperature {} is outside the usual 0.0..=2.0 range",
                    self.openrouter.temperature
                ),
            ));
        }
        if self.openrouter.max_retries == 0 {
            issues.push(ConfigIssue::warning(
                "openrouter.max_retries",
                "max_retries = 0, requests are tried once",
            ));
        }

        issues
    }

    /// Fail on the first error-level issue
    pub fn ensure_valid(&self) -> Result<(), ConfigValidationError> {
        match self
            .validate()
            .into_iter()
            .find(|i| i.severity == Severity::Error)
        {
            Some(issue) => Err(ConfigValidationError::Invalid {
                field: issue.field,
                message: issue.message,
            }),
            None => Ok(()),
        }
    }
}
