use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;

use super::TaskResult;

/// Agregado de los resultados de todas las tareas de un step.
#[derive(Debug, Clone)]
pub struct StepResult {
    step_id: String,
    results: Vec<TaskResult>,
}

impl StepResult {
    pub fn new(step_id: &str) -> Self { Self { step_id: step_id.to_string(), results: Vec::new() } }

    pub fn add(&mut self, result: TaskResult) { self.results.push(result); }

    pub fn step_id(&self) -> &str { &self.step_id }

    pub fn results(&self) -> &[TaskResult] { &self.results }

    pub fn task_count(&self) -> usize { self.results.len() }

    pub fn success_count(&self) -> usize { self.results.iter().filter(|r| r.is_success()).count() }

    pub fn failure_count(&self) -> usize { self.task_count() - self.success_count() }

    /// Un step sin tareas también cuenta como exitoso.
    pub fn is_success(&self) -> bool { self.results.iter().all(TaskResult::is_success) }

    /// Primer fallo registrado.
    pub fn first_failure(&self) -> Option<&TaskResult> { self.results.iter().find(|r| !r.is_success()) }

    pub fn counters(&self) -> BTreeMap<String, i64> {
        let mut merged = BTreeMap::new();
        for (name, value) in self.results.iter().flat_map(|r| r.counters()) {
            *merged.entry(name.clone()).or_insert(0) += value;
        }
        merged
    }

    /// Suma de la duración de las tareas (tiempo de CPU aproximado).
    pub fn task_time(&self) -> Duration { self.results.iter().map(TaskResult::duration).sum() }

    /// Desde el primer inicio hasta el último fin.
    pub fn wall_time(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.results.iter().map(TaskResult::started_at).min()?;
        let end = self.results.iter().map(TaskResult::finished_at).max()?;
        Some((start, end))
    }

    pub fn to_json(&self) -> serde_json::Value {
        let (start, end) = match self.wall_time() {
            Some((s, e)) => (Some(s.to_rfc3339()), Some(e.to_rfc3339())),
            None => (None, None),
        };
        json!({
            "step": self.step_id,
            "success": self.is_success(),
            "tasks": self.task_count(),
            "failed": self.failure_count(),
            "start": start,
            "end": end,
            "task_time_ms": self.task_time().as_millis() as u64,
            "counters": self.counters(),
            "results": self.results.iter().map(TaskResult::to_json).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TaskError;
    use crate::task::TaskStatus;

    #[test]
    fn aggregates_counters_and_failures() {
        let mut step = StepResult::new("filter");
        let mut a = TaskStatus::new("filter", "s1");
        a.increment_counter("reads", 10);
        let mut b = TaskStatus::new("filter", "s2");
        b.increment_counter("reads", 5);
        b.increment_counter("discarded", 1);

        step.add(a.create_task_result());
        step.add(b.create_task_result_with_error(TaskError::Internal("bad record".into())));

        assert_eq!(step.task_count(), 2);
        assert_eq!(step.failure_count(), 1);
        assert!(!step.is_success());
        assert_eq!(step.first_failure().map(|r| r.context_name()), Some("s2"));
        assert_eq!(step.counters().get("reads"), Some(&15));

        let report = step.to_json();
        assert_eq!(report["tasks"], 2);
        assert_eq!(report["counters"]["discarded"], 1);
        assert_eq!(report["results"][1]["success"], false);
    }
}
