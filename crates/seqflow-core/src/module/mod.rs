//! Contrato de los módulos enchufables y su registro.

mod descriptor;
mod registry;

use std::path::Path;
use std::time::Duration;

pub use descriptor::{ModuleDescriptor, ModuleFactory, ModuleSource};
pub use registry::ModuleRegistry;

use serde::{Deserialize, Serialize};

use crate::checker::CheckerConfiguration;
use crate::errors::ConfigurationError;
use crate::format::DataFormatRegistry;
use crate::params::{Parameters, Version};
use crate::port::{InputPorts, OutputPorts};
use crate::step::StepType;
use crate::task::{TaskContext, TaskResult, TaskStatus};

/// Cómo puede el planificador repartir las tareas de un step. Es una
/// capacidad declarada; el core no la impone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParallelizationMode {
    /// Varias tareas del step pueden ejecutarse a la vez.
    #[default]
    Standard,
    /// Una sola tarea a la vez.
    NotNeeded,
    /// El módulo gestiona su propio paralelismo (usa todos los procesadores).
    OwnParallelization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    Local,
    Distributed,
}

/// Lo que un módulo ve durante `configure`.
#[derive(Debug, Clone, Copy)]
pub struct StepConfigurationContext<'a> {
    pub step_id: &'a str,
    pub step_type: StepType,
    /// Fail-fast con parámetros obsoletos.
    pub strict: bool,
    pub formats: &'a DataFormatRegistry,
    pub checker_configuration: &'a CheckerConfiguration,
    pub working_directory: &'a Path,
    /// Plazo de los trabajos remotos del step (`SEQFLOW_REMOTE_TIMEOUT_SECS`).
    pub remote_timeout: Option<Duration>,
}

impl StepConfigurationContext<'_> {
    pub fn invalid(&self, message: impl Into<String>) -> ConfigurationError {
        ConfigurationError::InvalidConfiguration { step_id: self.step_id.to_string(), message: message.into() }
    }
}

/// Comportamiento asociado a un step.
///
/// `configure` se llama exactamente una vez al construir el workflow; los
/// puertos se consultan después, así que pueden depender de los parámetros.
/// `execute` se llama una vez por tarea y nunca falla: cualquier error se
/// devuelve dentro del `TaskResult` creado con `TaskStatus`.
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> Version;

    fn description(&self) -> &str { "" }

    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError>;

    fn input_ports(&self) -> InputPorts { InputPorts::new() }

    fn output_ports(&self) -> OutputPorts { OutputPorts::new() }

    fn parallelization_mode(&self) -> ParallelizationMode { ParallelizationMode::Standard }

    /// Memoria en MiB.
    fn required_memory(&self) -> Option<u64> { None }

    fn required_processors(&self) -> u32 { 1 }

    fn execute(&self, context: &mut TaskContext, status: &mut TaskStatus) -> TaskResult;
}
