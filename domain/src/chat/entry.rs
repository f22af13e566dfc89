//! Chat entry entity

use super::message::Message;
use super::persona::Persona;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display name of the system pseudo-participant
pub const SYSTEM_NAME: &str = "System";

/// Who produced a [`ChatEntry`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Speaker {
    /// The session itself (survey probes)
    System,
    /// A roster participant, shared by reference
    Person(Arc<Persona>),
}

impl Speaker {
    pub fn person(persona: Arc<Persona>) -> Self {
        Speaker::Person(persona)
    }

    pub fn name(&self) -> &str {
        match self {
            Speaker::System => SYSTEM_NAME,
            Speaker::Person(p) => &p.name,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Speaker::System)
    }

    pub fn persona(&self) -> Option<&Arc<Persona>> {
        match self {
            Speaker::System => None,
            Speaker::Person(p) => Some(p),
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One utterance in a session (Entity)
///
/// Fields are only readable after construction. Cloning an entry copies
/// the prompt and answer but keeps pointing at the same [`Persona`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    entity: Speaker,
    prompt: Vec<Message>,
    answer: String,
}

impl ChatEntry {
    pub fn new(entity: Speaker, prompt: Vec<Message>, answer: impl Into<String>) -> Self {
        Self {
            entity,
            prompt,
            answer: answer.into(),
        }
    }

    /// A survey probe as if asked by the session itself
    pub fn system(answer: impl Into<String>) -> Self {
        Self::new(Speaker::System, Vec::new(), answer)
    }

    pub fn entity(&self) -> &Speaker {
        &self.entity
    }

    pub fn prompt(&self) -> &[Message] {
        &self.prompt
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Whether this entry was spoken by a participant with the given name
    pub fn is_from(&self, name: &str) -> bool {
        !self.entity.is_system() && self.entity.name() == name
    }

    /// Re-point the speaker at an equal persona from `roster`
    ///
    /// Deserialized entries each own a separate persona allocation; this
    /// restores sharing with the roster after a snapshot is loaded.
    pub(crate) fn relink(&mut self, roster: &[Arc<Persona>]) {
        if let Speaker::Person(current) = &self.entity
            && let Some(shared) = roster.iter().find(|p| p.as_ref() == current.as_ref())
        {
            self.entity = Speaker::Person(Arc::clone(shared));
        }
    }
}

impl std::fmt::Display for ChatEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.entity.name(), self.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Arc<Persona> {
        Arc::new(Persona::new("fake", "Alice", "Likes trains"))
    }

    #[test]
    fn test_clone_shares_persona() {
        let persona = alice();
        let entry = ChatEntry::new(Speaker::person(Arc::clone(&persona)), vec![], "Hallo");
        let copy = entry.clone();

        let Speaker::Person(p) = copy.entity() else {
            panic!("expected a person");
        };
        assert!(Arc::ptr_eq(p, &persona));
        assert_eq!(copy, entry);
    }

    #[test]
    fn test_system_entry() {
        let entry = ChatEntry::system("How much do you agree?");
        assert!(entry.entity().is_system());
        assert_eq!(entry.entity().name(), "System");
        assert!(entry.prompt().is_empty());
        assert!(!entry.is_from("System"));
    }

    #[test]
    fn test_speaker_serialization() {
        let json = serde_json::to_value(Speaker::person(alice())).unwrap();
        assert_eq!(json["kind"], "person");
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["person_type"], "fake");

        let json = serde_json::to_value(Speaker::System).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "system"}));
    }

    #[test]
    fn test_relink_restores_sharing() {
        let roster = vec![alice()];
        let mut entry = ChatEntry::new(Speaker::person(alice()), vec![], "Hi");
        entry.relink(&roster);

        let Speaker::Person(p) = entry.entity() else {
            panic!("expected a person");
        };
        assert!(Arc::ptr_eq(p, &roster[0]));
    }

    #[test]
    fn test_display() {
        let entry = ChatEntry::new(Speaker::person(alice()), vec![], "Guten Tag");
        assert_eq!(entry.to_string(), "Alice: Guten Tag");
    }
}
