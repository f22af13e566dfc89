//! JSONL transcript writer.
//!
//! Each [`ConversationEvent`] becomes one JSON line: the payload's fields
//! plus `type`, `seq` and `timestamp`.

use parley_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    seq: u64,
}

/// [`ConversationLogger`] appending one JSON object per line
///
/// Thread-safe via a `Mutex`; flushes after every line and on `Drop`.
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create a logger writing to `path`, creating parent directories
    ///
    /// Returns `None` (after a warning) if the file cannot be created; a
    /// missing transcript log never prevents a session from running.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        match File::create(path) {
            Ok(file) => Some(Self {
                sink: Mutex::new(Sink {
                    writer: BufWriter::new(file),
                    seq: 0,
                }),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not create transcript log {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Logger for one session inside `dir`, named `{label}_{utc timestamp}.jsonl`
    pub fn for_session(dir: impl AsRef<Path>, label: &str) -> Option<Self> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        Self::new(dir.as_ref().join(format!("{label}_{stamp}.jsonl")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_record(event: ConversationEvent, seq: u64) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut record = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        record.insert("type".to_string(), Value::String(event.event_type.to_string()));
        record.insert("seq".to_string(), Value::from(seq));
        record.insert("timestamp".to_string(), Value::String(timestamp));
        Value::Object(record)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let record = Self::to_record(event, sink.seq);
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        sink.seq += 1;
        if writeln!(sink.writer, "{}", line)
            .and_then(|_| sink.writer.flush())
            .is_err()
        {
            warn!("Could not append to transcript log {}", self.path.display());
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}
