//! Batch job port
//!
//! A batch fans many independent sessions out over a worker pool. The
//! runner behind this port knows how to load a job's configuration, run it
//! and write its output artifact.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// One session run inside a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionJob {
    pub config_path: PathBuf,
    pub output_path: PathBuf,
    pub prompt_version: String,
    pub repetition: usize,
}

impl std::fmt::Display for SessionJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}, repetition {})",
            self.config_path.display(),
            self.prompt_version,
            self.repetition
        )
    }
}

#[derive(Error, Debug)]
#[error("{0}")]
pub struct JobError(pub String);

#[async_trait]
pub trait SessionJobRunner: Send + Sync {
    /// Whether the job's output artifact already exists and is non-empty
    fn is_complete(&self, job: &SessionJob) -> bool;

    async fn run_job(&self, job: &SessionJob) -> Result<(), JobError>;
}
