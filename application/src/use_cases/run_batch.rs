//! Run Batch use case
//!
//! Fans a list of [`SessionJob`]s out over a bounded worker pool. Jobs whose
//! output already exists are skipped, so an interrupted batch can simply be
//! started again.

use crate::ports::session_job::{SessionJob, SessionJobRunner};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Default number of sessions running at the same time
pub const DEFAULT_MAX_WORKERS: usize = 20;

/// Result of a single batch job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Skipped,
    Failed(String),
}

/// Summary of a finished batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub completed: Vec<SessionJob>,
    pub skipped: Vec<SessionJob>,
    pub failed: Vec<(SessionJob, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.completed.len() + self.skipped.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, job: SessionJob, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Completed => self.completed.push(job),
            JobOutcome::Skipped => self.skipped.push(job),
            JobOutcome::Failed(reason) => self.failed.push((job, reason)),
        }
    }
}

/// Use case for running many sessions concurrently
pub struct RunBatchUseCase<R: SessionJobRunner + 'static> {
    runner: Arc<R>,
    max_workers: usize,
}

impl<R: SessionJobRunner + 'static> RunBatchUseCase<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self {
            runner,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }

    /// Cap the worker pool; zero is treated as one
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub async fn execute(&self, jobs: Vec<SessionJob>) -> BatchReport {
        let mut report = BatchReport::default();
        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let mut join_set = JoinSet::new();

        let pending = jobs.len();
        let mut spawned = Vec::new();
        for job in jobs {
            if self.runner.is_complete(&job) {
                info!("Skipping {}: output already exists", job);
                report.record(job, JobOutcome::Skipped);
                continue;
            }

            spawned.push(job.clone());
            let runner = Arc::clone(&self.runner);
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => match runner.run_job(&job).await {
                        Ok(()) => JobOutcome::Completed,
                        Err(e) => JobOutcome::Failed(e.to_string()),
                    },
                    Err(e) => JobOutcome::Failed(e.to_string()),
                };
                (job, outcome)
            });
        }

        info!(
            "Running {} of {} jobs with up to {} workers",
            join_set.len(),
            pending,
            self.max_workers
        );

        let mut finished: HashSet<PathBuf> = HashSet::new();
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((job, outcome)) => {
                    match &outcome {
                        JobOutcome::Completed => info!("Finished {}", job),
                        JobOutcome::Failed(reason) => warn!("{} failed: {}", job, reason),
                        JobOutcome::Skipped => {}
                    }
                    finished.insert(job.output_path.clone());
                    report.record(job, outcome);
                }
                Err(e) => warn!("Batch worker panicked: {}", e),
            }
        }

        // A panicked worker never hands its job back
        for job in spawned {
            if !finished.contains(&job.output_path) {
                report.record(job, JobOutcome::Failed("worker panicked".to_string()));
            }
        }

        report
    }
}
