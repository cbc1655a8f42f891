//! Envoltorio de tareas delegadas en un backend distribuido opaco.
//!
//! El planificador invoca `Module::execute` de forma síncrona; `RemoteTask`
//! lanza el trabajo remoto sobre un runtime tokio propio y bloquea hasta que
//! termina o vence el plazo.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};

use super::{TaskResult, TaskStatus};
use crate::errors::TaskError;
use crate::module::StepConfigurationContext;
use crate::params::Parameters;

/// Trabajo enviado al backend.
#[derive(Debug, Clone, Default)]
pub struct RemoteJob {
    pub name: String,
    pub step_id: String,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub parameters: Parameters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOutcome {
    pub success: bool,
    pub counters: BTreeMap<String, i64>,
    pub message: Option<String>,
}

#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Envía el trabajo y espera a que termine.
    async fn submit(&self, job: RemoteJob) -> Result<RemoteOutcome, TaskError>;
}

pub struct RemoteTask {
    executor: Arc<dyn RemoteExecutor>,
    timeout: Option<Duration>,
}

impl RemoteTask {
    pub fn new(executor: Arc<dyn RemoteExecutor>) -> Self { Self { executor, timeout: None } }

    /// Tarea con el plazo configurado para el step.
    pub fn for_step(executor: Arc<dyn RemoteExecutor>, context: &StepConfigurationContext<'_>) -> Self {
        Self::new(executor).with_timeout(context.remote_timeout)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn run(&self, job: RemoteJob) -> Result<RemoteOutcome, TaskError> {
        let name = job.name.clone();
        debug!("submitting remote job {name}");
        let submitted = self.executor.submit(job);
        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, submitted).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("remote job {name} timed out after {limit:?}");
                    Err(TaskError::Timeout(limit))
                }
            },
            None => submitted.await,
        }
    }

    /// Versión bloqueante para `Module::execute`. No debe llamarse desde un
    /// hilo que ya ejecute un runtime tokio.
    pub fn execute(&self, job: RemoteJob, status: &mut TaskStatus) -> TaskResult {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => return status.create_task_result_with_error(TaskError::Io(e)),
        };
        match runtime.block_on(self.run(job)) {
            Ok(outcome) => {
                for (name, value) in &outcome.counters {
                    status.increment_counter(name, *value);
                }
                if outcome.success {
                    status.create_task_result()
                } else {
                    let message = outcome.message.unwrap_or_else(|| "remote job failed".to_string());
                    status.create_task_result_with_error_message(TaskError::Remote(message.clone()), &message)
                }
            }
            Err(e) => status.create_task_result_with_error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sleepy(Duration);

    #[async_trait]
    impl RemoteExecutor for Sleepy {
        async fn submit(&self, job: RemoteJob) -> Result<RemoteOutcome, TaskError> {
            tokio::time::sleep(self.0).await;
            let mut counters = BTreeMap::new();
            counters.insert("inputs".to_string(), job.inputs.len() as i64);
            Ok(RemoteOutcome { success: true, counters, message: None })
        }
    }

    struct Rejecting;

    #[async_trait]
    impl RemoteExecutor for Rejecting {
        async fn submit(&self, _job: RemoteJob) -> Result<RemoteOutcome, TaskError> {
            Ok(RemoteOutcome { success: false, counters: BTreeMap::new(), message: Some("queue refused job".into()) })
        }
    }

    #[tokio::test]
    async fn run_times_out() {
        let task = RemoteTask::new(Arc::new(Sleepy(Duration::from_secs(5)))).with_timeout(Some(Duration::from_millis(20)));
        let err = task.run(RemoteJob::default()).await.unwrap_err();
        assert!(matches!(err, TaskError::Timeout(_)));
    }

    #[tokio::test]
    async fn run_without_timeout_waits() {
        let task = RemoteTask::new(Arc::new(Sleepy(Duration::from_millis(5))));
        let job = RemoteJob { inputs: vec![PathBuf::from("a"), PathBuf::from("b")], ..Default::default() };
        assert_eq!(task.run(job).await.unwrap().counters.get("inputs"), Some(&2));
    }

    #[test]
    fn execute_blocks_and_reports() {
        let mut status = TaskStatus::new("mapreads", "s1");
        let ok = RemoteTask::new(Arc::new(Sleepy(Duration::from_millis(1)))).execute(RemoteJob::default(), &mut status);
        assert!(ok.is_success());
        assert_eq!(ok.counters().get("inputs"), Some(&0));

        let mut status = TaskStatus::new("mapreads", "s1");
        let failed = RemoteTask::new(Arc::new(Rejecting)).execute(RemoteJob::default(), &mut status);
        assert!(!failed.is_success());
        assert_eq!(failed.error_message(), Some("queue refused job"));

        let mut status = TaskStatus::new("mapreads", "s1");
        let timed_out = RemoteTask::new(Arc::new(Sleepy(Duration::from_secs(5)))).with_timeout(Some(Duration::from_millis(10)))
                                                                              .execute(RemoteJob::default(), &mut status);
        assert!(matches!(timed_out.exception().map(|e| &**e), Some(TaskError::Timeout(_))));
    }
}
