//! JSON session snapshots
//!
//! Personas are written once per reference, so a snapshot file repeats the
//! persona inside every transcript entry. Loading relinks them to the
//! roster again.

use parley_application::{SessionStore, StoreError};
use parley_domain::SessionSnapshot;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// [`SessionStore`] writing pretty-printed JSON files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSessionStore;

impl JsonSessionStore {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn format_error(path: &Path, e: impl std::fmt::Display) -> StoreError {
    StoreError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

impl SessionStore for JsonSessionStore {
    fn save(&self, snapshot: &SessionSnapshot, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        let file = File::create(path).map_err(|e| io_error(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot).map_err(|e| format_error(path, e))?;
        writer.flush().map_err(|e| io_error(path, e))?;
        debug!(
            "Saved session ({} messages) to {}",
            snapshot.session_length(),
            path.display()
        );
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SessionSnapshot, StoreError> {
        let file = File::open(path).map_err(|e| io_error(path, e))?;
        let snapshot: SessionSnapshot = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| format_error(path, e))?;
        Ok(snapshot.relinked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{
        ChatEntry, EndType, Host, HostKind, PersonSettings, Persona, ProbeTrigger, Speaker,
        SurveyPolicy, SurveyProbe,
    };
    use std::sync::Arc;

    fn snapshot() -> SessionSnapshot {
        let anna = Arc::new(Persona::new("fake", "Anna", "Lehrerin"));
        let ben = Arc::new(Persona::new("fake", "Ben", "Landwirt"));
        SessionSnapshot {
            scenario: "Tempolimit".to_string(),
            survey_questions: vec![SurveyProbe::new("q", ProbeTrigger::Always, "0-10?")],
            survey_policy: SurveyPolicy::Declared,
            persons: vec![anna.clone(), ben.clone()],
            person_settings: vec![
                PersonSettings::from([("model".to_string(), serde_json::json!("mistral-7b"))]),
                PersonSettings::new(),
            ],
            host: Host::new(HostKind::RoundRobin, 2, 1).unwrap(),
            end_type: EndType::iteration(4),
            chat_room: vec![
                ChatEntry::new(Speaker::person(ben), vec![], "Ja"),
                ChatEntry::new(Speaker::person(anna), vec![], "Nein"),
            ],
            prompt_version: "v1".to_string(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("s.json");
        let store = JsonSessionStore::new();
        let original = snapshot();

        store.save(&original, &path).unwrap();
        let loaded = store.load(&path).unwrap();

        assert_eq!(loaded, original);
        let Speaker::Person(speaker) = loaded.chat_room[1].entity() else {
            panic!("expected a person");
        };
        assert!(Arc::ptr_eq(speaker, &loaded.persons[0]));
    }

    #[test]
    fn test_load_missing_file() {
        let err = JsonSessionStore::new()
            .load(Path::new("/nonexistent/session.json"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_load_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.json");
        std::fs::write(&path, "not json").unwrap();
        let err = JsonSessionStore::new().load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Format { .. }));
    }
}
