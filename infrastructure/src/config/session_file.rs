//! Session file loading
//!
//! A session file is a JSON document describing one experiment: scenario,
//! survey probes, roster, host and end type.

use parley_application::SessionConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SessionFileError {
    #[error("Could not read session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed session file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and parse a session file
///
/// Only the JSON shape is checked here; semantic checks (roster, host,
/// end type) happen when the session is built.
pub fn load_session_config(path: &Path) -> Result<SessionConfig, SessionFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| SessionFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SessionConfig =
        serde_json::from_str(&content).map_err(|source| SessionFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "Loaded session file {} ({} participants)",
        path.display(),
        config.persons.len()
    );
    Ok(config)
}
