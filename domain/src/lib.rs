//! Domain layer for parley
//!
//! This crate contains the value types and pure policies of a simulated
//! conversation session. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Transcript**: append-only list of [`ChatEntry`] values
//! - **Host**: decides whose turn it is ([`TurnScheduler`])
//! - **End type**: decides when a session is over ([`EndPolicy`])
//! - **Survey**: probes asked to every participant beside the transcript

pub mod chat;
pub mod core;
pub mod end_type;
pub mod host;
pub mod prompt;
pub mod session;
pub mod survey;

// Re-export commonly used types
pub use chat::{ChatEntry, Message, Persona, Role, SYSTEM_NAME, Speaker};
pub use core::{error::DomainError, string::truncate};
pub use end_type::{EndPolicy, EndType};
pub use host::{Host, HostKind, RoundRobinHost, TurnScheduler};
pub use prompt::{PromptTemplate, PromptVersion};
pub use session::{PersonSettings, SessionOutput, SessionSnapshot};
pub use survey::{
    DEFAULT_SURVEY_PERIOD, END_OF_SESSION, ProbeTrigger, SurveyPolicy, SurveyProbe,
    SurveyQuestion,
};
