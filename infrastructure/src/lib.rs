//! Infrastructure layer for parley
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration and session file loading, concrete
//! participants, JSON persistence, batch job discovery and JSONL
//! transcript logging.

pub mod batch;
pub mod config;
pub mod logging;
pub mod participants;
pub mod persistence;

// Re-export commonly used types
pub use batch::{FileSessionJobRunner, discover_jobs};
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, Severity, SessionFileError,
    load_session_config,
};
pub use logging::JsonlConversationLogger;
pub use participants::{DeferredInbox, DeferredParticipant, FakeParticipant, default_registry};
pub use persistence::{JsonSessionStore, OutputWriteError, output_to_json, write_output_json};
