//! Una ejecución de `Module::execute`: contexto de entrada/salida, estado
//! observable y resultado inmutable.

mod context;
mod remote;
mod result;
mod status;
mod step_result;

pub use context::TaskContext;
pub use remote::{RemoteExecutor, RemoteJob, RemoteOutcome, RemoteTask};
pub use result::TaskResult;
pub use status::TaskStatus;
pub use step_result::StepResult;
