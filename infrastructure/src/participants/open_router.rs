//! OpenRouter chat-completions participant
//!
//! Sends the persona's prompt to an OpenAI-compatible endpoint
//! (`{base_url}/chat/completions`) and turns the first choice into a
//! transcript entry.

use crate::config::FileOpenRouterConfig;
use async_trait::async_trait;
use parley_application::{Participant, ParticipantError, PersonSpec};
use parley_domain::{ChatEntry, Message, Persona, PromptTemplate, PromptVersion, Speaker};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Registry tag of [`OpenRouterParticipant`]
pub const OPEN_ROUTER_CLASS: &str = "person_open_router_completion";

/// Connection and sampling settings
#[derive(Debug, Clone)]
pub struct OpenRouterSettings {
    api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl OpenRouterSettings {
    /// Settings from the `[openrouter]` section; fails without an API key
    pub fn from_config(config: &FileOpenRouterConfig) -> Result<Self, ParticipantError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            ParticipantError::InvalidConfig(format!(
                "no OpenRouter API key (set {} or openrouter.api_key)",
                config.api_key_env
            ))
        })?;
        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
            timeout: Duration::from_secs(config.timeout_seconds),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    n: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// One failed attempt
#[derive(Debug)]
enum AttemptError {
    Transport(String),
    Status { status: StatusCode, body: String },
    Parse(String),
}

impl AttemptError {
    fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Transport(_) => true,
            AttemptError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            AttemptError::Parse(_) => false,
        }
    }
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptError::Transport(e) => write!(f, "request failed: {}", e),
            AttemptError::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            AttemptError::Parse(e) => write!(f, "unexpected response: {}", e),
        }
    }
}

pub struct OpenRouterParticipant {
    persona: Arc<Persona>,
    settings: OpenRouterSettings,
    client: Client,
}

impl OpenRouterParticipant {
    pub fn new(persona: Arc<Persona>, settings: OpenRouterSettings) -> Result<Self, ParticipantError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ParticipantError::InvalidConfig(format!("HTTP client: {}", e)))?;
        Ok(Self {
            persona,
            settings,
            client,
        })
    }

    /// Build from a roster entry; an optional `model` key overrides the
    /// configured model
    pub fn from_spec(
        spec: &PersonSpec,
        config: &FileOpenRouterConfig,
    ) -> Result<Self, ParticipantError> {
        let mut settings = OpenRouterSettings::from_config(config)?;
        if let Some(model) = spec.extra_str("model") {
            settings = settings.with_model(model);
        }
        Self::new(Arc::new(spec.persona()), settings)
    }

    async fn attempt(&self, messages: &[Message]) -> Result<String, AttemptError> {
        let request = CompletionRequest {
            model: &self.settings.model,
            messages,
            max_tokens: self.settings.max_tokens,
            n: 1,
            temperature: self.settings.temperature,
        };

        let response = self
            .client
            .post(self.settings.completions_url())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptError::Status { status, body });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::Parse(e.to_string()))?;
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AttemptError::Parse("no choices in response".to_string()))?;
        Ok(choice.message.content.unwrap_or_default())
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ParticipantError> {
        let mut attempt = 0u32;
        loop {
            match self.attempt(messages).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.settings.max_retries => {
                    // Exponential backoff: 1s, 2s, 4s, ...
                    let delay = Duration::from_secs(1 << attempt.min(5));
                    warn!(
                        "{}: {} (retrying in {}s)",
                        self.persona.name,
                        err,
                        delay.as_secs()
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(ParticipantError::GenerationFailed(format!(
                        "{} via {}: {}",
                        self.persona.name, self.settings.model, err
                    )));
                }
            }
        }
    }
}

/// Remove the speaker label models like to echo back
pub fn strip_speaker_prefix<'a>(answer: &'a str, name: &str) -> &'a str {
    let answer = answer.strip_prefix("Me: ").unwrap_or(answer);
    let answer = answer
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(": "))
        .unwrap_or(answer);
    answer.trim()
}

#[async_trait]
impl Participant for OpenRouterParticipant {
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

        debug!(
            "{} asks {} with {} messages",
            self.persona.name,
            self.settings.model,
            prompt.len()
        );
        let raw = self.complete(&prompt).await?;
        let answer = strip_speaker_prefix(&raw, &self.persona.name).to_string();

        Ok(Some(ChatEntry::new(
            Speaker::person(Arc::clone(&self.persona)),
            prompt,
            answer,
        )))
    }
}
