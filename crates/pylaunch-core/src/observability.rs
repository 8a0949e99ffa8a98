//! Audit log: one JSON object per line, appended to `PYLAUNCH_AUDIT_LOG`.
//!
//! Writes are best-effort; a broken audit path never fails a launch.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::config::ObservabilityConfig;

/// Launch lifecycle events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Activation artifact missing; nothing was started.
    LaunchBlocked { artifact: String, guide: String },
    /// Right before spawn.
    LaunchStarted {
        program: String,
        args: Vec<String>,
        cwd: String,
        venv: String,
    },
    LaunchCompleted {
        exit_code: i32,
        duration_ms: u64,
        success: bool,
    },
    VenvProvisioned {
        venv: String,
        created: bool,
        installed: bool,
    },
}

impl AuditEvent {
    pub fn to_record(&self) -> serde_json::Value {
        let mut record = serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}));
        if let Some(obj) = record.as_object_mut() {
            obj.insert(
                "ts".to_string(),
                Utc::now()
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
                    .into(),
            );
            obj.insert("source".to_string(), "pylaunch".into());
        }
        record
    }
}

/// Append the event to the configured audit log, if any.
pub fn audit(event: AuditEvent) {
    if let Some(ref path) = ObservabilityConfig::from_env().audit_log {
        audit_to(Path::new(path), &event);
    }
}

pub fn audit_to(path: &Path, event: &AuditEvent) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    append_jsonl(path, &event.to_record());
}

fn append_jsonl(path: &Path, record: &serde_json::Value) {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut f) => {
            if let Ok(line) = serde_json::to_string(record) {
                let _ = writeln!(f, "{}", line);
            }
        }
        Err(e) => tracing::debug!(path = %path.display(), "Audit log unavailable: {}", e),
    }
}
