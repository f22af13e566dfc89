//! Persona value object

use serde::{Deserialize, Serialize};

/// Fixed identity of a conversational participant (Value Object)
///
/// A persona never changes during a session. Participants and every
/// [`ChatEntry`](super::ChatEntry) they produce share it through an `Arc`,
/// so copying a transcript never copies the persona.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Persona {
    /// Registry tag of the participant implementation (e.g. `"fake"`)
    pub person_type: String,
    pub name: String,
    #[serde(default)]
    pub background_story: String,
}

impl Persona {
    pub fn new(
        person_type: impl Into<String>,
        name: impl Into<String>,
        background_story: impl Into<String>,
    ) -> Self {
        Self {
            person_type: person_type.into(),
            name: name.into(),
            background_story: background_story.into(),
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.person_type)
    }
}
