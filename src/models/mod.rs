//! # Models Module
//!
//! Data shapes shared by every store backend.
//!
//! - [`LogEntry`]: one structured log record, persisted as one row/document
//! - [`MatchCriteria`]: the fixed filter shape accepted by find and remove

pub mod criteria;

pub use criteria::MatchCriteria;

use serde::{Deserialize, Serialize};

///////////////////////////////////////////////////////////////////////////////
//****                          Log Levels                               ****//
///////////////////////////////////////////////////////////////////////////////

pub const TRACE: &str = "TRACE";
pub const DEBUG: &str = "DEBUG";
pub const INFO: &str = "INFO";
pub const WARN: &str = "WARN";
pub const ERROR: &str = "ERROR";

/// Every log level a client is expected to send
pub const LOG_LEVELS: [&str; 5] = [TRACE, DEBUG, INFO, WARN, ERROR];

/// Check whether a level string is one of the known log levels
pub fn is_valid_log_level(level: &str) -> bool {
    LOG_LEVELS.contains(&level)
}

///////////////////////////////////////////////////////////////////////////////
//****                          Log Entry                                ****//
///////////////////////////////////////////////////////////////////////////////

/// A structured log entry as sent by an origin service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(rename = "logLevel", default)]
    pub level: String,
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
    #[serde(default)]
    pub origin_service: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub labels: Vec<String>,
    /// Creation time in epoch milliseconds
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub modified: i64,
}

impl LogEntry {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            level: level.into(),
            message: message.into(),
            created: now,
            modified: now,
            ..Default::default()
        }
    }

    pub fn with_origin_service(mut self, origin_service: impl Into<String>) -> Self {
        self.origin_service = origin_service.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_created(mut self, created: i64) -> Self {
        self.created = created;
        self.modified = created;
        self
    }

    pub fn with_arg(mut self, arg: serde_json::Value) -> Self {
        self.args.push(arg);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_json_field_names() {
        let entry = LogEntry::new(ERROR, "disk full")
            .with_origin_service("svc-a")
            .with_label("storage")
            .with_created(42);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["logLevel"], "ERROR");
        assert_eq!(json["originService"], "svc-a");
        assert_eq!(json["message"], "disk full");
        assert_eq!(json["labels"][0], "storage");
        assert_eq!(json["created"], 42);
    }

    #[test]
    fn test_log_entry_deserializes_with_missing_fields() {
        let entry: LogEntry = serde_json::from_str(r#"{"message":"hello"}"#).unwrap();
        assert_eq!(entry.message, "hello");
        assert!(entry.labels.is_empty());
        assert_eq!(entry.created, 0);
    }

    #[test]
    fn test_new_sets_timestamps() {
        let entry = LogEntry::new(INFO, "started");
        assert!(entry.created > 0);
        assert_eq!(entry.created, entry.modified);
    }

    #[test]
    fn test_is_valid_log_level() {
        assert!(is_valid_log_level("WARN"));
        assert!(!is_valid_log_level("warn"));
        assert!(!is_valid_log_level("FATAL"));
    }
}
