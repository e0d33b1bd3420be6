//! JSONL audit trail for allocation events.
//!
//! Every [`AllocationEvent`] becomes one line holding `timestamp`, `type`
//! and `round`, followed by the event's own fields. The file is opened in
//! append mode and each line goes out in a single write, so several
//! `montage` processes can share one audit log.

use montage_application::{AllocationEvent, AllocationLogger};
use montage_domain::RoundId;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// One line of the audit log
#[derive(Serialize)]
struct AuditRecord<'a> {
    timestamp: String,
    #[serde(rename = "type")]
    event_type: &'a str,
    round: RoundId,
    #[serde(flatten)]
    details: Map<String, Value>,
}

impl<'a> AuditRecord<'a> {
    fn from_event(event: &'a AllocationEvent) -> Self {
        let details = match &event.details {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            other => Map::from_iter([("data".to_string(), other.clone())]),
        };
        Self {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            event_type: event.event_type,
            round: event.round,
            details,
        }
    }
}

/// Appends allocation events to a JSONL file
pub struct JsonlAllocationLogger {
    file: Mutex<File>,
    path: PathBuf,
}

impl JsonlAllocationLogger {
    /// Open (or create) the log at the given path.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Self {
                file: Mutex::new(file),
                path: path.to_path_buf(),
            }),
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AllocationLogger for JsonlAllocationLogger {
    fn log(&self, event: AllocationEvent) {
        let record = AuditRecord::from_event(&event);
        let mut line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not encode {} audit event: {}", event.event_type, e);
                return;
            }
        };
        line.push('\n');

        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("Could not write audit log {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("allocation.jsonl");
        let logger = JsonlAllocationLogger::new(&path).unwrap();

        logger.log(AllocationEvent::new(
            "allocation_applied",
            RoundId(1),
            json!({ "created": 30, "cancelled": [] }),
        ));
        logger.log(AllocationEvent::new(
            "rating_submitted",
            RoundId(1),
            json!({ "vote": 4, "rating": 5 }),
        ));

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "allocation_applied");
        assert_eq!(lines[0]["round"], 1);
        assert_eq!(lines[0]["created"], 30);
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["type"], "rating_submitted");
        assert_eq!(lines[1]["rating"], 5);
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allocation.jsonl");

        for round in 1..=2 {
            let logger = JsonlAllocationLogger::new(&path).unwrap();
            logger.log(AllocationEvent::new(
                "allocation_noop",
                RoundId(round),
                json!({ "quorum": 3 }),
            ));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["round"], 2);
    }

    #[test]
    fn test_record_fields_lead_the_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allocation.jsonl");
        let logger = JsonlAllocationLogger::new(&path).unwrap();

        logger.log(AllocationEvent::new(
            "allocation_noop",
            RoundId(9),
            json!({ "quorum": 2 }),
        ));

        let text = std::fs::read_to_string(&path).unwrap();
        let after_timestamp = text.split_once(',').unwrap().1;
        assert!(after_timestamp.starts_with(r#""type":"allocation_noop","round":9,"quorum":2"#));
    }

    #[test]
    fn test_scalar_details_are_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("allocation.jsonl");
        let logger = JsonlAllocationLogger::new(&path).unwrap();

        logger.log(AllocationEvent::new("note", RoundId(3), json!("manual fix")));
        logger.log(AllocationEvent::new("note", RoundId(3), Value::Null));

        let lines = read_lines(&path);
        assert_eq!(lines[0]["round"], 3);
        assert_eq!(lines[0]["data"], "manual fix");
        assert!(lines[1].get("data").is_none());
    }
}
