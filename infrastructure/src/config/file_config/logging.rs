//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for JSONL transcripts, one file per session (disabled when unset)
    pub conversation_log_dir: Option<PathBuf>,
    /// Also write diagnostic logs to this file
    pub log_file: Option<PathBuf>,
}
