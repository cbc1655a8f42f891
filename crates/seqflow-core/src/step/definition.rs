use std::path::{Path, PathBuf};

use log::debug;
use serde_json::json;

use super::{StepState, StepType};
use crate::constants::ENGINE_VERSION;
use crate::errors::WorkflowError;
use crate::hashing::hash_value;
use crate::module::{Module, ParallelizationMode};
use crate::params::{Parameters, Version};
use crate::port::{InputPorts, OutputPorts};

/// Step configurado. Todo es inmutable tras la construcción del grafo salvo
/// el estado, que sólo cambia a través de `set_state`.
#[derive(Debug, Clone)]
pub struct Step {
    id: String,
    step_type: StepType,
    module_name: String,
    version: Version,
    parameters: Parameters,
    required_memory: Option<u64>,
    required_processors: u32,
    input_ports: InputPorts,
    output_ports: OutputPorts,
    parallelization_mode: ParallelizationMode,
    output_directory: PathBuf,
    fingerprint: String,
    state: StepState,
}

impl Step {
    /// Captura la declaración de un módulo ya configurado.
    pub(crate) fn from_module(id: &str,
                              step_type: StepType,
                              module: &dyn Module,
                              parameters: Parameters,
                              output_directory: &Path)
                              -> Self {
        let version = module.version();
        let fingerprint = hash_value(&json!({
                                         "engine_version": ENGINE_VERSION,
                                         "module": module.name(),
                                         "version": version.to_string(),
                                         "parameters": &parameters,
                                     }));
        Self { id: id.to_string(),
               step_type,
               module_name: module.name().to_string(),
               version,
               parameters,
               required_memory: module.required_memory(),
               required_processors: module.required_processors(),
               input_ports: module.input_ports(),
               output_ports: module.output_ports(),
               parallelization_mode: module.parallelization_mode(),
               output_directory: output_directory.to_path_buf(),
               fingerprint,
               state: StepState::Configured }
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn step_type(&self) -> StepType { self.step_type }

    pub fn module_name(&self) -> &str { &self.module_name }

    pub fn version(&self) -> &Version { &self.version }

    pub fn parameters(&self) -> &Parameters { &self.parameters }

    /// Memoria requerida en MiB, si el módulo la declara.
    pub fn required_memory(&self) -> Option<u64> { self.required_memory }

    pub fn required_processors(&self) -> u32 { self.required_processors }

    pub fn input_ports(&self) -> &InputPorts { &self.input_ports }

    pub fn output_ports(&self) -> &OutputPorts { &self.output_ports }

    pub fn parallelization_mode(&self) -> ParallelizationMode { self.parallelization_mode }

    pub fn output_directory(&self) -> &Path { &self.output_directory }

    /// Hash blake3 de módulo, versión y parámetros.
    pub fn fingerprint(&self) -> &str { &self.fingerprint }

    pub fn state(&self) -> StepState { self.state }

    pub fn set_state(&mut self, next: StepState) -> Result<(), WorkflowError> {
        if !self.state.can_transition_to(next) {
            return Err(WorkflowError::InvalidTransition { step_id: self.id.clone(), from: self.state, to: next });
        }
        debug!("step {}: {:?} -> {:?}", self.id, self.state, next);
        self.state = next;
        Ok(())
    }
}
