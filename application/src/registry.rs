//! Participant registry
//!
//! Maps the `class` tag of a roster entry to a factory that builds the
//! participant. The registry is built once at startup and handed to
//! whatever needs to resolve session files; there is no global lookup.

use crate::config::{ConfigError, PersonSpec};
use crate::ports::participant::{Participant, ParticipantError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Builds a participant from its roster entry
pub type ParticipantFactory =
    Arc<dyn Fn(&PersonSpec) -> Result<Arc<dyn Participant>, ParticipantError> + Send + Sync>;

#[derive(Default, Clone)]
pub struct ParticipantRegistry {
    factories: BTreeMap<String, ParticipantFactory>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `class`, replacing any previous one
    pub fn register<F>(mut self, class: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&PersonSpec) -> Result<Arc<dyn Participant>, ParticipantError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(class.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Registered class tags, sorted
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn build(&self, spec: &PersonSpec) -> Result<Arc<dyn Participant>, ConfigError> {
        let factory = self
            .factories
            .get(&spec.class)
            .ok_or_else(|| ConfigError::UnknownParticipantClass(spec.class.clone()))?;
        debug!("Building participant {} ({})", spec.name, spec.class);
        factory(spec).map_err(|source| ConfigError::ParticipantConstruction {
            name: spec.name.clone(),
            source,
        })
    }

    /// Build the whole roster in order
    pub fn build_roster(
        &self,
        specs: &[PersonSpec],
    ) -> Result<Vec<Arc<dyn Participant>>, ConfigError> {
        specs.iter().map(|spec| self.build(spec)).collect()
    }
}

impl std::fmt::Debug for ParticipantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticipantRegistry")
            .field("classes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_domain::{ChatEntry, Persona};

    struct Silent {
        persona: Arc<Persona>,
    }

    #[async_trait]
    impl Participant for Silent {
        fn persona(&self) -> &Arc<Persona> {
            &self.persona
        }

        async fn generate_answer(
            &self,
            _scenario: &str,
            _transcript: &[ChatEntry],
            _prompt_version: &str,
            _is_questionnaire: bool,
        ) -> Result<Option<ChatEntry>, ParticipantError> {
            Ok(None)
        }
    }

    fn registry() -> ParticipantRegistry {
        ParticipantRegistry::new()
            .register("silent", |spec: &PersonSpec| {
                Ok(Arc::new(Silent {
                    persona: Arc::new(spec.persona()),
                }) as Arc<dyn Participant>)
            })
            .register("broken", |_spec: &PersonSpec| {
                Err(ParticipantError::InvalidConfig("missing model".to_string()))
            })
    }

    #[test]
    fn test_build_registered_class() {
        let participant = registry()
            .build(&PersonSpec::new("silent", "Anna", ""))
            .unwrap();
        assert_eq!(participant.name(), "Anna");
        assert_eq!(participant.persona().person_type, "silent");
    }

    #[test]
    fn test_unknown_class() {
        let err = registry()
            .build(&PersonSpec::new("gpt-9", "Anna", ""))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::UnknownParticipantClass(c) if c == "gpt-9"));
    }

    #[test]
    fn test_factory_failure_is_config_error() {
        let err = registry()
            .build(&PersonSpec::new("broken", "Ben", ""))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::ParticipantConstruction { name, .. } if name == "Ben"));
    }

    #[test]
    fn test_classes_sorted() {
        let registry = registry();
        let classes: Vec<&str> = registry.classes().collect();
        assert_eq!(classes, vec!["broken", "silent"]);
    }
}
