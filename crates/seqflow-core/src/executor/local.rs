use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{EngineConfig, LOCAL_THREADS_VAR};
use crate::errors::{ConfigurationError, TaskError, WorkflowError};
use crate::module::{Module, ParallelizationMode};
use crate::step::StepState;
use crate::task::{StepResult, TaskContext, TaskResult, TaskStatus};
use crate::workflow::Workflow;

/// Ejecuta los steps de un workflow en este proceso.
///
/// Las tareas de un step `Standard` se reparten en un pool rayon; el resto se
/// ejecuta en secuencia. El runner es quien mueve el estado de cada step.
pub struct LocalRunner {
    pool: ThreadPool,
}

impl LocalRunner {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        let pool = ThreadPoolBuilder::new().num_threads(config.local_threads)
                                           .thread_name(|i| format!("seqflow-worker-{i}"))
                                           .build()
                                           .map_err(|e| ConfigurationError::Env { name: LOCAL_THREADS_VAR.to_string(),
                                                                                  message: e.to_string() })?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize { self.pool.current_num_threads() }

    /// Ejecuta todos los steps en orden. Tras el primer step fallido los
    /// pendientes pasan a `Aborted`.
    pub fn run(&self, workflow: &mut Workflow) -> Result<Vec<StepResult>, WorkflowError> {
        let mut results = Vec::new();
        let mut failed = false;
        for id in workflow.step_ids() {
            if failed {
                workflow.set_state(&id, StepState::Aborted)?;
                continue;
            }
            let result = self.run_step(workflow, &id)?;
            failed = !result.is_success();
            results.push(result);
        }
        Ok(results)
    }

    /// Ejecuta todas las tareas de un step que esté en `Waiting` o `Ready`.
    pub fn run_step(&self, workflow: &mut Workflow, id: &str) -> Result<StepResult, WorkflowError> {
        let contexts = workflow.task_contexts(id);
        let (step, module) = workflow.step_and_module(id)?;
        if step.state() == StepState::Waiting {
            step.set_state(StepState::Ready)?;
        }
        step.set_state(StepState::Working)?;
        let step_id = step.id().to_string();
        let mut result = StepResult::new(&step_id);

        let contexts = match contexts {
            Ok(contexts) => contexts,
            Err(e) => {
                warn!("step {step_id}: cannot prepare tasks: {e}");
                result.add(TaskStatus::new(&step_id, &step_id).create_task_result_with_error(e));
                step.set_state(StepState::Failed)?;
                return Ok(result);
            }
        };
        info!("step {step_id}: {} tasks", contexts.len());

        if step.parallelization_mode() == ParallelizationMode::Standard && contexts.len() > 1 {
            let results: Vec<TaskResult> =
                self.pool.install(|| contexts.into_par_iter().map(|context| run_task(module, context)).collect());
            results.into_iter().for_each(|r| result.add(r));
        } else {
            let total = contexts.len();
            for (n, context) in contexts.into_iter().enumerate() {
                let task = run_task(module, context);
                let ok = task.is_success();
                result.add(task);
                if !ok {
                    break;
                }
                if n + 1 < total {
                    step.set_state(StepState::PartiallyDone)?;
                    step.set_state(StepState::Working)?;
                }
            }
        }

        step.set_state(if result.is_success() { StepState::Done } else { StepState::Failed })?;
        Ok(result)
    }
}

/// Ejecuta una tarea. Un pánico del módulo se convierte en fallo.
fn run_task(module: &dyn Module, mut context: TaskContext) -> TaskResult {
    let mut status = TaskStatus::new(context.step_id(), context.context_name());
    debug!("task {} of step {} started ({})", context.context_name(), context.step_id(), context.run_id());
    let outcome = catch_unwind(AssertUnwindSafe(|| module.execute(&mut context, &mut status)));
    let result = match outcome {
        Ok(result) => result,
        Err(panic) => {
            let message = panic.downcast_ref::<&str>()
                               .map(|s| s.to_string())
                               .or_else(|| panic.downcast_ref::<String>().cloned())
                               .unwrap_or_else(|| "unknown panic".to_string());
            status.create_task_result_with_error(TaskError::Internal(format!("module {} panicked: {message}", module.name())))
        }
    };
    debug!("task {} of step {} finished in {:?} (success: {})",
           context.context_name(),
           context.step_id(),
           result.duration(),
           result.is_success());
    result
}
