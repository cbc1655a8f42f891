use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::TaskStatus;
use crate::errors::TaskError;

/// Resultado inmutable de una tarea.
#[derive(Debug, Clone)]
pub struct TaskResult {
    step_id: String,
    context_name: String,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    duration: Duration,
    progress: f64,
    success: bool,
    exception: Option<Arc<TaskError>>,
    error_message: Option<String>,
    description: Option<String>,
    command_line: Option<String>,
    counters: BTreeMap<String, i64>,
}

impl TaskResult {
    pub(super) fn new(status: &TaskStatus,
                      progress: f64,
                      success: bool,
                      exception: Option<Arc<TaskError>>,
                      error_message: Option<String>)
                      -> Self {
        Self { step_id: status.step_id().to_string(),
               context_name: status.context_name().to_string(),
               started_at: status.started_at(),
               finished_at: Utc::now(),
               duration: status.elapsed(),
               progress,
               success,
               exception,
               error_message,
               description: status.description().map(str::to_string),
               command_line: status.command_line().map(str::to_string),
               counters: status.counters().clone() }
    }

    pub fn step_id(&self) -> &str { &self.step_id }

    pub fn context_name(&self) -> &str { &self.context_name }

    pub fn started_at(&self) -> DateTime<Utc> { self.started_at }

    pub fn finished_at(&self) -> DateTime<Utc> { self.finished_at }

    pub fn duration(&self) -> Duration { self.duration }

    pub fn progress(&self) -> f64 { self.progress }

    pub fn is_success(&self) -> bool { self.success }

    pub fn exception(&self) -> Option<&Arc<TaskError>> { self.exception.as_ref() }

    pub fn error_message(&self) -> Option<&str> { self.error_message.as_deref() }

    pub fn description(&self) -> Option<&str> { self.description.as_deref() }

    pub fn command_line(&self) -> Option<&str> { self.command_line.as_deref() }

    pub fn counters(&self) -> &BTreeMap<String, i64> { &self.counters }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "step": self.step_id,
            "context": self.context_name,
            "success": self.success,
            "start": self.started_at.to_rfc3339(),
            "end": self.finished_at.to_rfc3339(),
            "duration_ms": self.duration.as_millis() as u64,
            "progress": self.progress,
            "description": self.description,
            "command_line": self.command_line,
            "error": self.error_message,
            "exception": self.exception.as_ref().map(|e| e.to_string()),
            "counters": self.counters,
        })
    }
}
