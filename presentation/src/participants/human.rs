//! Participant typed by a person at the terminal

use async_trait::async_trait;
use colored::Colorize;
use parley_application::{Participant, ParticipantError, PersonSpec};
use parley_domain::{ChatEntry, Message, Persona, PromptVersion, Speaker};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

/// Registry tag of [`HumanParticipant`]
pub const HUMAN_CLASS: &str = "human";

type Input = Box<dyn AsyncBufRead + Unpin + Send>;

/// Line source shared by every human at the same terminal
///
/// A buffered reader pulls in more than one line at a time, so all
/// participants must read through the same buffer.
#[derive(Clone)]
pub struct TerminalInput {
    reader: Arc<Mutex<Input>>,
}

impl TerminalInput {
    pub fn new(reader: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        Self {
            reader: Arc::new(Mutex::new(Box::new(reader))),
        }
    }

    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    async fn read_line(&self, line: &mut String) -> std::io::Result<usize> {
        self.reader.lock().await.read_line(line).await
    }
}

/// Reads each answer as one line of input
///
/// The latest transcript entry and the question are echoed to stderr
/// before reading. An empty line declines the turn.
pub struct HumanParticipant {
    persona: Arc<Persona>,
    input: TerminalInput,
    echo: bool,
}

impl HumanParticipant {
    pub fn new(persona: Arc<Persona>, input: TerminalInput) -> Self {
        Self {
            persona,
            input,
            echo: true,
        }
    }

    pub fn from_spec(spec: &PersonSpec, input: &TerminalInput) -> Result<Self, ParticipantError> {
        Ok(Self::new(Arc::new(spec.persona()), input.clone()))
    }

    /// Disable echoing the conversation before each question
    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    fn show_context(&self, transcript: &[ChatEntry], is_questionnaire: bool) {
        if !self.echo {
            return;
        }
        if let Some(last) = transcript.last() {
            eprintln!(
                "{} {}",
                format!("{}:", last.entity().name()).yellow().bold(),
                last.answer()
            );
        }
        let cue = if is_questionnaire {
            "survey answer"
        } else {
            "your turn, empty line to pass"
        };
        eprint!("{} ", format!("[{} | {}]>", self.persona.name, cue).cyan());
    }
}

#[async_trait]
impl Participant for HumanParticipant {
    fn persona(&self) -> &Arc<Persona> {
        &self.persona
    }

    async fn generate_answer(
        &self,
        _scenario: &str,
        transcript: &[ChatEntry],
        prompt_version: &str,
        is_questionnaire: bool,
    ) -> Result<Option<ChatEntry>, ParticipantError> {
        prompt_version
            .parse::<PromptVersion>()
            .map_err(|_| ParticipantError::UnknownPromptVersion(prompt_version.to_string()))?;

        self.show_context(transcript, is_questionnaire);

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .await
            .map_err(|e| ParticipantError::Io(e.to_string()))?;
        if read == 0 {
            return Err(ParticipantError::Io(format!(
                "input closed while waiting for {}",
                self.persona.name
            )));
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(None);
        }

        // The person saw the transcript, not a model prompt; record what was asked.
        let prompt = transcript
            .last()
            .map(|e| vec![Message::user(e.answer())])
            .unwrap_or_default();
        Ok(Some(ChatEntry::new(
            Speaker::person(Arc::clone(&self.persona)),
            prompt,
            answer,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn input(text: &str) -> TerminalInput {
        TerminalInput::new(Cursor::new(text.as_bytes().to_vec()))
    }

    fn human(name: &str, input: &TerminalInput) -> HumanParticipant {
        HumanParticipant::new(Arc::new(Persona::new(HUMAN_CLASS, name, "")), input.clone()).quiet()
    }

    #[tokio::test]
    async fn test_reads_one_line_per_answer() {
        let dana = human("Dana", &input("Ich bin dagegen.\n8\n"));
        let transcript = vec![ChatEntry::system("0-10?")];

        let first = dana.generate_answer("s", &[], "v0", false).await.unwrap();
        let second = dana
            .generate_answer("s", &transcript, "v0", true)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.unwrap().answer(), "Ich bin dagegen.");
        assert_eq!(second.answer(), "8");
        assert!(second.is_from("Dana"));
        assert_eq!(second.prompt()[0].content, "0-10?");
    }

    #[tokio::test]
    async fn test_empty_line_declines() {
        let dana = human("Dana", &input("\n"));
        assert!(dana.generate_answer("s", &[], "v0", false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_input_is_error() {
        let dana = human("Dana", &input(""));
        let err = dana.generate_answer("s", &[], "v0", false).await.unwrap_err();
        assert!(matches!(err, ParticipantError::Io(_)));
    }

    #[tokio::test]
    async fn test_humans_share_one_input() {
        let shared = input("Ja\nNein\nVielleicht\n");
        let dana = human("Dana", &shared);
        let eli = human("Eli", &shared);

        let first = dana.generate_answer("s", &[], "v0", false).await.unwrap();
        let second = eli.generate_answer("s", &[], "v0", false).await.unwrap();
        let third = dana.generate_answer("s", &[], "v0", false).await.unwrap();

        assert_eq!(first.unwrap().answer(), "Ja");
        let second = second.unwrap();
        assert_eq!(second.answer(), "Nein");
        assert!(second.is_from("Eli"));
        assert_eq!(third.unwrap().answer(), "Vielleicht");
    }
}
