//! Use cases
//!
//! - [`SessionRoom`]: the turn loop of one session
//! - [`RunSessionUseCase`]: build, run and persist a session from a file
//! - [`RunBatchUseCase`]: many sessions over a bounded worker pool

pub mod run_batch;
pub mod run_session;
pub mod session_room;

pub use run_batch::{BatchReport, DEFAULT_MAX_WORKERS, JobOutcome, RunBatchUseCase};
pub use run_session::{RunSessionInput, RunSessionUseCase};
pub use session_room::{RunSessionError, SessionRoom};
