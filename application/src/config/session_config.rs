//! Session configuration, as read from a session file.
//!
//! The layout follows the experiment files the batch tooling generates:
//!
//! ```json
//! {
//!   "experiment": {
//!     "scenario": "Du diskutierst über die Aussage: ...",
//!     "survey_questions": [{"id": "intro", "iterations": "always", "question": "..."}]
//!   },
//!   "host": {"class": "Round Robin Host", "start_person_index": 0},
//!   "persons": [{"class": "fake", "name": "Anna", "background_story": "..."}],
//!   "endType": {"class": "iteration", "max_num_msgs": 20}
//! }
//! ```

use crate::ports::participant::ParticipantError;
use parley_domain::{DomainError, EndType, Host, HostKind, Persona, PersonSettings, SurveyProbe};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while turning a configuration into a runnable session
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Unknown participant class: {0}")]
    UnknownParticipantClass(String),

    #[error("Participant '{name}' could not be created: {source}")]
    ParticipantConstruction {
        name: String,
        #[source]
        source: ParticipantError,
    },

    #[error("Participant at position {0} has no name")]
    UnnamedParticipant(usize),

    #[error("Host is bound to {host} participants but the roster has {roster}")]
    RosterMismatch { host: usize, roster: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub scenario: String,
    #[serde(default)]
    pub survey_questions: Vec<SurveyProbe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    pub class: String,
    #[serde(default)]
    pub start_person_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndTypeConfig {
    pub class: String,
    pub max_num_msgs: usize,
}

/// One roster entry; `class` selects the participant implementation
///
/// Keys beyond the common ones (e.g. `"party"`, `"model"`) are kept in
/// `extra` for the participant factory to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSpec {
    pub class: String,
    pub name: String,
    #[serde(default)]
    pub background_story: String,
    #[serde(flatten)]
    pub extra: PersonSettings,
}

impl PersonSpec {
    pub fn new(
        class: impl Into<String>,
        name: impl Into<String>,
        background_story: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            background_story: background_story.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Rebuild a spec from a persisted persona and its saved settings
    pub fn from_persona(persona: &Persona, settings: PersonSettings) -> Self {
        Self {
            extra: settings,
            ..Self::new(
                persona.person_type.clone(),
                persona.name.clone(),
                persona.background_story.clone(),
            )
        }
    }

    pub fn persona(&self) -> Persona {
        Persona::new(&self.class, &self.name, &self.background_story)
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Complete description of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub experiment: ExperimentConfig,
    pub host: HostConfig,
    pub persons: Vec<PersonSpec>,
    #[serde(rename = "endType")]
    pub end_type: EndTypeConfig,
}

impl SessionConfig {
    /// Check everything that can be checked without building participants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.persons.is_empty() {
            return Err(DomainError::EmptyRoster.into());
        }
        if let Some(pos) = self.persons.iter().position(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::UnnamedParticipant(pos));
        }
        for probe in &self.experiment.survey_questions {
            probe.validate()?;
        }
        self.host()?;
        self.end_type()?;
        Ok(())
    }

    pub fn host(&self) -> Result<Host, ConfigError> {
        let kind: HostKind = self.host.class.parse()?;
        Ok(Host::new(
            kind,
            self.persons.len(),
            self.host.start_person_index,
        )?)
    }

    pub fn end_type(&self) -> Result<EndType, ConfigError> {
        Ok(EndType::from_class(
            &self.end_type.class,
            self.end_type.max_num_msgs,
        )?)
    }
}
