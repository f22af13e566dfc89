//! Participant whose answers arrive out of band
//!
//! Answers are queued into an inbox by someone else (another task, a
//! message bus, a test). When the session asks and the inbox is empty, the
//! participant declines instead of blocking the turn.

use async_trait::async_trait;
use parley_application::{Participant, ParticipantError, PersonSpec};
use parley_domain::{ChatEntry, PersonSettings, Persona, PromptTemplate, PromptVersion, Speaker};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Registry tag of [`DeferredParticipant`]
pub const DEFERRED_CLASS: &str = "deferred";

/// Shared handle for queueing answers
#[derive(Debug, Clone, Default)]
pub struct DeferredInbox {
    queue: Arc<Mutex<VecDeque<String>>>,
}

impl DeferredInbox {
    pub fn push(&self, answer: impl Into<String>) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(answer.into());
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queued answers, oldest first
    pub fn pending(&self) -> Vec<String> {
        self.queue
            .lock()
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn pop(&self) -> Option<String> {
        self.queue.lock().ok().and_then(|mut q| q.pop_front())
    }
}

pub struct DeferredParticipant {
    persona: Arc<Persona>,
    inbox: DeferredInbox,
}

impl DeferredParticipant {
    pub fn new(persona: Arc<Persona>) -> Self {
        Self {
            persona,
            inbox: DeferredInbox::default(),
        }
    }

    /// Build from a roster entry; an optional `inbox` list pre-fills the queue
    pub fn from_spec(spec: &PersonSpec) -> Result<Self, ParticipantError> {
        let participant = Self::new(Arc::new(spec.persona()));
        if let Some(value) = spec.extra.get("inbox") {
            let queued: Vec<String> = serde_json::from_value(value.clone()).map_err(|e| {
                ParticipantError::InvalidConfig(format!("{}: inbox: {}", spec.name, e))
            })?;
            for answer in queued {
                participant.inbox.push(answer);
            }
        }
        Ok(participant)
    }

    pub fn inbox(&self) -> DeferredInbox {
        self.inbox.clone()
    }
}

#[async_trait]
impl Participant for DeferredParticipant {
    fn persona(&self) -> &Arc<Persona> {
        &self.persona
    }

    /// Whatever is still queued, so a restored participant does not replay
    /// answers it already gave
    fn settings_update(&self) -> Option<PersonSettings> {
        Some(PersonSettings::from([(
            "inbox".to_string(),
            serde_json::json!(self.inbox.pending()),
        )]))
    }

    async fn generate_answer(
        &self,
        scenario: &str,
        transcript: &[ChatEntry],
        prompt_version: &str,
        is_questionnaire: bool,
    ) -> Result<Option<ChatEntry>, ParticipantError> {
        let version: PromptVersion = prompt_version
            .parse()
            .map_err(|_| ParticipantError::UnknownPromptVersion(prompt_version.to_string()))?;

        let Some(answer) = self.inbox.pop() else {
            debug!("{} has nothing queued", self.persona.name);
            return Ok(None);
        };

        let prompt = PromptTemplate::conversation(
            version,
            &self.persona,
            scenario,
            transcript,
            is_questionnaire,
        );
        Ok(Some(ChatEntry::new(
            Speaker::person(Arc::clone(&self.persona)),
            prompt,
            answer,
        )))
    }
}
