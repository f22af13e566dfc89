//! Session persistence port

use parley_domain::SessionSnapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Malformed session file {path}: {message}")]
    Format { path: PathBuf, message: String },
}

/// Saves and loads whole-session snapshots
pub trait SessionStore: Send + Sync {
    fn save(&self, snapshot: &SessionSnapshot, path: &Path) -> Result<(), StoreError>;

    /// Load a snapshot with persona sharing restored
    fn load(&self, path: &Path) -> Result<SessionSnapshot, StoreError>;
}
