//! Application layer for parley
//!
//! This crate contains the session room, use cases, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::{
    ConfigError, EndTypeConfig, ExperimentConfig, HostConfig, PersonSpec, RunParams,
    SessionConfig,
};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    participant::{Participant, ParticipantError},
    progress::{NoProgress, SessionProgressNotifier},
    session_job::{JobError, SessionJob, SessionJobRunner},
    session_store::{SessionStore, StoreError},
};
pub use registry::{ParticipantFactory, ParticipantRegistry};
pub use use_cases::run_batch::{BatchReport, DEFAULT_MAX_WORKERS, JobOutcome, RunBatchUseCase};
pub use use_cases::run_session::{RunSessionInput, RunSessionUseCase};
pub use use_cases::session_room::{RunSessionError, SessionRoom};
