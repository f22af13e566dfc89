//! Persisted session state

use crate::chat::{ChatEntry, Persona};
use crate::end_type::{EndPolicy, EndType};
use crate::host::Host;
use crate::survey::{SurveyPolicy, SurveyProbe};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Participant settings beyond the persona (model, script, queued answers)
pub type PersonSettings = BTreeMap<String, Value>;

/// Serializable image of a whole session
///
/// Holds personas rather than live participants. A snapshot can always be
/// inspected; resuming it rebuilds the participants from their personas and
/// the settings stored next to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub scenario: String,
    #[serde(default)]
    pub survey_questions: Vec<SurveyProbe>,
    #[serde(default)]
    pub survey_policy: SurveyPolicy,
    pub persons: Vec<Arc<Persona>>,
    /// Settings of each participant, in roster order
    #[serde(default)]
    pub person_settings: Vec<PersonSettings>,
    pub host: Host,
    pub end_type: EndType,
    #[serde(default)]
    pub chat_room: Vec<ChatEntry>,
    #[serde(default)]
    pub prompt_version: String,
}

impl SessionSnapshot {
    /// Restore persona sharing between the roster and transcript entries
    ///
    /// Call after deserializing; entries whose speaker matches no roster
    /// persona are left untouched.
    pub fn relinked(mut self) -> Self {
        let roster = self.persons.clone();
        for entry in &mut self.chat_room {
            entry.relink(&roster);
        }
        self
    }

    pub fn session_length(&self) -> usize {
        self.chat_room.len()
    }

    pub fn did_end(&self) -> bool {
        self.end_type.did_end(&self.chat_room)
    }

    /// Stored settings of the participant at `index`; empty when none were saved
    pub fn settings_of(&self, index: usize) -> PersonSettings {
        self.person_settings.get(index).cloned().unwrap_or_default()
    }

    /// Transcript entries spoken by the named participant
    pub fn entries_by<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ChatEntry> {
        self.chat_room.iter().filter(move |e| e.is_from(name))
    }
}
