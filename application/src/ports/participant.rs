//! Participant port
//!
//! Defines the behavioural contract of every conversational entity:
//! scripted fakes, network-backed generators, humans at a terminal, or
//! participants whose answers arrive out of band.

use async_trait::async_trait;
use parley_domain::{ChatEntry, PersonSettings, Persona};
use std::sync::Arc;
use thiserror::Error;

/// Failures a participant cannot recover from on its own
///
/// Retrying is the participant's business; once one of these reaches the
/// session, the session aborts.
#[derive(Error, Debug)]
pub enum ParticipantError {
    #[error("Unknown prompt version: {0}")]
    UnknownPromptVersion(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid participant configuration: {0}")]
    InvalidConfig(String),
}

/// A conversational participant
///
/// `generate_answer` receives the transcript read-only and must not keep
/// it across calls. Returning `Ok(None)` means "no answer this time"; the
/// session moves on without appending anything.
#[async_trait]
pub trait Participant: Send + Sync {
    /// The participant's fixed identity, shared with every entry it produces
    fn persona(&self) -> &Arc<Persona>;

    fn name(&self) -> &str {
        &self.persona().name
    }

    /// Settings that changed while the session ran
    ///
    /// Merged over the configured settings when the session is snapshotted,
    /// so a restored participant continues from its current state.
    fn settings_update(&self) -> Option<PersonSettings> {
        None
    }

    async fn generate_answer(
        &self,
        scenario: &str,
        transcript: &[ChatEntry],
        prompt_version: &str,
        is_questionnaire: bool,
    ) -> Result<Option<ChatEntry>, ParticipantError>;
}
