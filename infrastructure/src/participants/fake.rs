//! Scripted participant for tests and dry runs

use async_trait::async_trait;
use parley_application::{Participant, ParticipantError, PersonSpec};
use parley_domain::{ChatEntry, Persona, PromptTemplate, PromptVersion, Speaker};
use std::sync::Arc;

/// Registry tag of [`FakeParticipant`]
pub const FAKE_CLASS: &str = "fake";

const DEFAULT_SURVEY_ANSWER: &str = "5";

/// Deterministic participant
///
/// Conversation answers come from `answers` in order, cycling when the
/// script runs out; without a script it numbers its own contributions.
/// Survey questions are always answered with `survey_answer`.
///
/// The position in the script is derived from the transcript (how often
/// this persona has spoken so far), so the participant itself is stateless.
pub struct FakeParticipant {
    persona: Arc<Persona>,
    answers: Vec<String>,
    survey_answer: String,
}

impl FakeParticipant {
    pub fn new(persona: Arc<Persona>) -> Self {
        Self {
            persona,
            answers: Vec::new(),
            survey_answer: DEFAULT_SURVEY_ANSWER.to_string(),
        }
    }

    pub fn with_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.answers = answers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_survey_answer(mut self, answer: impl Into<String>) -> Self {
        self.survey_answer = answer.into();
        self
    }

    /// Build from a roster entry; reads the optional `answers` list and
    /// `survey_answer` string
    pub fn from_spec(spec: &PersonSpec) -> Result<Self, ParticipantError> {
        let mut participant = Self::new(Arc::new(spec.persona()));
        if let Some(value) = spec.extra.get("answers") {
            let answers: Vec<String> = serde_json::from_value(value.clone()).map_err(|e| {
                ParticipantError::InvalidConfig(format!("{}: answers: {}", spec.name, e))
            })?;
            participant = participant.with_answers(answers);
        }
        if let Some(answer) = spec.extra_str("survey_answer") {
            participant = participant.with_survey_answer(answer);
        }
        Ok(participant)
    }

    fn scripted(&self, spoken: usize) -> String {
        if self.answers.is_empty() {
            format!("Answer {} from {}", spoken + 1, self.persona.name)
        } else {
            self.answers[spoken % self.answers.len()].clone()
        }
    }
}

#[async_trait]
impl Participant for FakeParticipant {
    fn persona(&self) -> &Arc<Persona> {
        &self.persona
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
        let prompt = PromptTemplate::conversation(
            version,
            &self.persona,
            scenario,
            transcript,
            is_questionnaire,
        );

        let answer = if is_questionnaire {
            self.survey_answer.clone()
        } else {
            let spoken = transcript
                .iter()
                .filter(|e| e.is_from(&self.persona.name))
                .count();
            self.scripted(spoken)
        };

        Ok(Some(ChatEntry::new(
            Speaker::person(Arc::clone(&self.persona)),
            prompt,
            answer,
        )))
    }
}
