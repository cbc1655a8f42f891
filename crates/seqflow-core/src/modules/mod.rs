//! Módulos genéricos que el motor ofrece sin adaptadores externos.

mod checker;
mod copy;
mod merger;
mod splitter;

pub use checker::CheckerModule;
pub use copy::CopyModule;
pub use merger::{MergerModule, TechnicalReplicateMergerModule};
pub use splitter::SplitterModule;

use crate::constants::FORMAT_PARAMETER;
use crate::errors::{ConfigurationError, TaskError};
use crate::format::DataFormat;
use crate::module::{ModuleDescriptor, StepConfigurationContext};
use crate::params::{Parameters, Version};
use crate::task::{TaskResult, TaskStatus};

/// Versión común de los módulos incluidos en el core.
pub fn builtin_version() -> Version { Version::new(1, 0, 0, "") }

/// Descriptores de todos los módulos genéricos.
pub fn builtin_descriptors() -> Vec<ModuleDescriptor> {
    vec![ModuleDescriptor::new(CheckerModule::NAME, builtin_version(), || Box::new(CheckerModule::default()))
             .with_description("Validate data with the checkers of their formats"),
         ModuleDescriptor::new(SplitterModule::NAME, builtin_version(), || Box::new(SplitterModule::default()))
             .with_description("Split data into numbered parts")
             .with_distributed_backend(true),
         ModuleDescriptor::new(MergerModule::NAME, builtin_version(), || Box::new(MergerModule::default()))
             .with_description("Merge the parts of data sharing a name")
             .with_distributed_backend(true),
         ModuleDescriptor::new(TechnicalReplicateMergerModule::NAME,
                               builtin_version(),
                               || Box::new(TechnicalReplicateMergerModule::default()))
             .with_description("Merge technical replicates"),
         ModuleDescriptor::new(CopyModule::NAME, builtin_version(), || Box::new(CopyModule::default()))
             .with_description("Copy data, optionally changing the compression")
             .with_distributed_backend(true)
             .with_reusable_across_tasks(true)]
}

/// Formato indicado por el parámetro `format` (nombre o alias).
fn format_parameter(context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<DataFormat, ConfigurationError> {
    let parameter = parameters.get(FORMAT_PARAMETER)
                              .ok_or_else(|| context.invalid(format!("no \"{FORMAT_PARAMETER}\" parameter defined")))?;
    context.formats
           .by_name_or_alias(parameter.value().trim())
           .cloned()
           .ok_or_else(|| ConfigurationError::UnknownFormat(parameter.value().to_string()))
}

/// Parámetros restantes tras quitar los que consume el módulo.
fn remaining(parameters: &Parameters, consumed: &[&str]) -> Parameters {
    parameters.iter().filter(|p| !consumed.contains(&p.name())).cloned().collect()
}

fn finish(status: &mut TaskStatus, outcome: Result<(), TaskError>) -> TaskResult {
    match outcome {
        Ok(()) => status.create_task_result(),
        Err(e) => status.create_task_result_with_error(e),
    }
}

/// Módulo sin configurar: el motor nunca lo ejecuta, pero si ocurre se
/// devuelve un fallo.
fn not_configured(name: &str) -> TaskError { TaskError::Internal(format!("module {name} has not been configured")) }
