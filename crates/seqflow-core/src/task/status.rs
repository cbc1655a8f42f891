use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use super::TaskResult;
use crate::errors::TaskError;

/// Estado observable de una tarea en curso. Progreso y contadores son
/// escrituras laterales; no influyen en el resultado.
#[derive(Debug)]
pub struct TaskStatus {
    step_id: String,
    context_name: String,
    started_at: DateTime<Utc>,
    started: Instant,
    progress: f64,
    description: Option<String>,
    command_line: Option<String>,
    counters: BTreeMap<String, i64>,
}

impl TaskStatus {
    pub fn new(step_id: &str, context_name: &str) -> Self {
        Self { step_id: step_id.to_string(),
               context_name: context_name.to_string(),
               started_at: Utc::now(),
               started: Instant::now(),
               progress: 0.0,
               description: None,
               command_line: None,
               counters: BTreeMap::new() }
    }

    pub fn progress(&self) -> f64 { self.progress }

    /// Progreso en `[0, 1]`; los valores fuera de rango se recortan.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    }

    /// Progreso como posición de `value` en `[min, max]`.
    pub fn set_progress_range(&mut self, min: i64, max: i64, value: i64) {
        if max <= min {
            self.set_progress(1.0);
        } else {
            self.set_progress((value - min) as f64 / (max - min) as f64);
        }
    }

    pub fn set_description(&mut self, description: &str) { self.description = Some(description.to_string()); }

    pub fn set_command_line(&mut self, command_line: &str) { self.command_line = Some(command_line.to_string()); }

    pub fn increment_counter(&mut self, name: &str, by: i64) { *self.counters.entry(name.to_string()).or_insert(0) += by; }

    pub fn set_counter(&mut self, name: &str, value: i64) { self.counters.insert(name.to_string(), value); }

    pub fn counter(&self, name: &str) -> Option<i64> { self.counters.get(name).copied() }

    pub fn counters(&self) -> &BTreeMap<String, i64> { &self.counters }

    pub fn create_task_result(&self) -> TaskResult { self.finish(true, None, None) }

    /// Fallo explícito sin causa con `success == false`.
    pub fn create_task_result_with_success(&self, success: bool) -> TaskResult { self.finish(success, None, None) }

    pub fn create_task_result_with_error(&self, error: TaskError) -> TaskResult {
        let message = error.to_string();
        self.finish(false, Some(error), Some(message))
    }

    pub fn create_task_result_with_error_message(&self, error: TaskError, message: &str) -> TaskResult {
        self.finish(false, Some(error), Some(message.to_string()))
    }

    fn finish(&self, success: bool, error: Option<TaskError>, message: Option<String>) -> TaskResult {
        if success {
            // una tarea terminada con éxito está completa
            return TaskResult::new(self, 1.0, success, None, message);
        }
        TaskResult::new(self, self.progress, success, error.map(Arc::new), message)
    }

    pub(crate) fn step_id(&self) -> &str { &self.step_id }

    pub(crate) fn context_name(&self) -> &str { &self.context_name }

    pub(crate) fn started_at(&self) -> DateTime<Utc> { self.started_at }

    pub(crate) fn elapsed(&self) -> std::time::Duration { self.started.elapsed() }

    pub(crate) fn description(&self) -> Option<&str> { self.description.as_deref() }

    pub(crate) fn command_line(&self) -> Option<&str> { self.command_line.as_deref() }
}
