//! Prompt templates for conversational turns and survey answers

use crate::chat::{ChatEntry, Message, Persona};
use crate::core::error::DomainError;

/// Prompt layout selected by the session's `prompt_version` string
///
/// The orchestrator passes the version through untouched; only
/// participants interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PromptVersion {
    /// English, general instructions first
    #[default]
    V0,
    /// English, general instructions last
    V1,
    /// German, general instructions first
    V2,
}

impl PromptVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptVersion::V0 => "v0",
            PromptVersion::V1 => "v1",
            PromptVersion::V2 => "v2",
        }
    }

    pub fn all() -> [PromptVersion; 3] {
        [PromptVersion::V0, PromptVersion::V1, PromptVersion::V2]
    }
}

impl std::fmt::Display for PromptVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PromptVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v0" => Ok(PromptVersion::V0),
            "v1" => Ok(PromptVersion::V1),
            "v2" => Ok(PromptVersion::V2),
            other => Err(DomainError::UnknownPromptVersion(other.to_string())),
        }
    }
}

/// Templates for generating participant prompts
pub struct PromptTemplate;

impl PromptTemplate {
    /// System messages that open every prompt
    pub fn setup(
        version: PromptVersion,
        persona: &Persona,
        scenario: &str,
        is_questionnaire: bool,
    ) -> Vec<Message> {
        let german = version == PromptVersion::V2;

        let name = if german {
            Message::system(format!("Dein Name ist {}.", persona.name))
        } else {
            Message::system(format!("Your name is {}.", persona.name))
        };
        let scenario = if german {
            Message::system(format!("Das Szenario ist das folgende: {}", scenario))
        } else {
            Message::system(format!("The scenario is the following: {}", scenario))
        };
        let background = if german {
            Message::system(format!(
                "Dies ist deine Vorgeschichte: {}",
                persona.background_story
            ))
        } else {
            Message::system(format!(
                "This is your background story: {}",
                persona.background_story
            ))
        };
        let instructions = Message::system(Self::general_instructions(version, is_questionnaire));

        match version {
            PromptVersion::V1 => vec![name, scenario, background, instructions],
            PromptVersion::V0 | PromptVersion::V2 => vec![instructions, name, scenario, background],
        }
    }

    fn general_instructions(version: PromptVersion, is_questionnaire: bool) -> &'static str {
        match (version, is_questionnaire) {
            (PromptVersion::V0, false) => {
                "The following is a debate between you and and another person. Complete your next reply. Try to keep the reply shorter than 30 words and in German.\n\n"
            }
            (PromptVersion::V1, false) => {
                "The following is a conversation between you and and another person. Complete your next reply. Try to keep the reply shorter than 30 words and in German.\n"
            }
            (PromptVersion::V2, false) => {
                "Es folgt ein Gespräch zwischen Ihnen und einem anderen Person. Vervollständigen Sie Ihre nächste Antwort. Versuchen Sie, die Antwort kürzer als 30 Wörter und in Deutsch zu halten.\n\n"
            }
            (PromptVersion::V0 | PromptVersion::V1, true) => {
                "The following is a conversation between you and another person, followed by a survey question. Answer the survey question exactly as requested.\n\n"
            }
            (PromptVersion::V2, true) => {
                "Es folgt ein Gespräch zwischen Ihnen und einer anderen Person und danach eine Umfragefrage. Beantworten Sie die Umfragefrage genau wie verlangt.\n\n"
            }
        }
    }

    /// Full prompt: setup messages followed by the transcript
    ///
    /// Entries spoken by `persona` become assistant turns; everything else,
    /// survey probes included, is presented as user input.
    pub fn conversation(
        version: PromptVersion,
        persona: &Persona,
        scenario: &str,
        transcript: &[ChatEntry],
        is_questionnaire: bool,
    ) -> Vec<Message> {
        let mut messages = Self::setup(version, persona, scenario, is_questionnaire);
        for entry in transcript {
            if entry.entity().is_system() {
                messages.push(Message::user(entry.answer()));
            } else if entry.is_from(&persona.name) {
                messages.push(Message::assistant(format!("{}\n", entry.answer())));
            } else {
                messages.push(Message::user(format!("{}\n", entry.answer())));
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Role, Speaker};
    use std::sync::Arc;

    fn persona(name: &str) -> Persona {
        Persona::new("fake", name, "Grew up in Bremen")
    }

    #[test]
    fn test_parse_prompt_version() {
        assert_eq!("v0".parse::<PromptVersion>().unwrap(), PromptVersion::V0);
        assert_eq!("V2".parse::<PromptVersion>().unwrap(), PromptVersion::V2);
        assert!(matches!(
            "v9".parse::<PromptVersion>(),
            Err(DomainError::UnknownPromptVersion(_))
        ));
    }

    #[test]
    fn test_v0_puts_instructions_first() {
        let msgs = PromptTemplate::setup(PromptVersion::V0, &persona("Anna"), "Tempolimit", false);
        assert_eq!(msgs.len(), 4);
        assert!(msgs[0].content.starts_with("The following is a debate"));
        assert_eq!(msgs[1].content, "Your name is Anna.");
        assert!(msgs.iter().all(|m| m.role == Role::System));
    }

    #[test]
    fn test_v1_puts_instructions_last() {
        let msgs = PromptTemplate::setup(PromptVersion::V1, &persona("Anna"), "Tempolimit", false);
        assert_eq!(msgs[0].content, "Your name is Anna.");
        assert!(msgs[3].content.starts_with("The following is a conversation"));
    }

    #[test]
    fn test_v2_is_german() {
        let msgs = PromptTemplate::setup(PromptVersion::V2, &persona("Anna"), "Tempolimit", false);
        assert_eq!(msgs[1].content, "Dein Name ist Anna.");
        assert_eq!(msgs[2].content, "Das Szenario ist das folgende: Tempolimit");
    }

    #[test]
    fn test_questionnaire_changes_instructions() {
        let chat = PromptTemplate::setup(PromptVersion::V0, &persona("Anna"), "s", false);
        let survey = PromptTemplate::setup(PromptVersion::V0, &persona("Anna"), "s", true);
        assert_ne!(chat[0].content, survey[0].content);
        assert_eq!(chat[1..], survey[1..]);
    }

    #[test]
    fn test_conversation_maps_roles() {
        let anna = Arc::new(persona("Anna"));
        let ben = Arc::new(persona("Ben"));
        let transcript = vec![
            ChatEntry::new(Speaker::person(Arc::clone(&anna)), vec![], "Ich bin dafür."),
            ChatEntry::new(Speaker::person(ben), vec![], "Ich nicht."),
            ChatEntry::system("Wie sehr stimmst du zu?"),
        ];

        let msgs =
            PromptTemplate::conversation(PromptVersion::V0, &anna, "s", &transcript, true);
        assert_eq!(msgs.len(), 7);
        assert_eq!(msgs[4], Message::assistant("Ich bin dafür.\n"));
        assert_eq!(msgs[5], Message::user("Ich nicht.\n"));
        assert_eq!(msgs[6], Message::user("Wie sehr stimmst du zu?"));
    }
}
