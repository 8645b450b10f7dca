//! JSONL transcript of generation events.
//!
//! Each [`GenerationEvent`] becomes one JSON line: the event payload with
//! `type` and `timestamp` added. The file is opened in append mode so
//! successive runs accumulate in one transcript.

use octophyx_application::ports::generation_logger::{GenerationEvent, GenerationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Generation logger writing one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and on `Drop`.
pub struct JsonlGenerationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlGenerationLogger {
    /// Open (or create) the transcript at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; generation then runs
    /// without a transcript.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create generation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Self {
                writer: Mutex::new(BufWriter::new(file)),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not open generation log {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Build the line written for `event`.
fn to_record(event: GenerationEvent, timestamp: String) -> Value {
    let mut record = Map::new();
    record.insert("type".to_string(), Value::String(event.event_type.to_string()));
    record.insert("timestamp".to_string(), Value::String(timestamp));
    match event.payload {
        Value::Object(fields) => {
            for (key, value) in fields {
                // type/timestamp are reserved
                record.entry(key).or_insert(value);
            }
        }
        Value::Null => {}
        other => {
            record.insert("data".to_string(), other);
        }
    }
    Value::Object(record)
}

impl GenerationLogger for JsonlGenerationLogger {
    fn log(&self, event: GenerationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let Ok(line) = serde_json::to_string(&to_record(event, timestamp)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlGenerationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
