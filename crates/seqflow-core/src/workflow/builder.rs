use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;
use log::{debug, info};

use super::{Link, Workflow};
use crate::checker::CheckerConfiguration;
use crate::config::EngineConfig;
use crate::errors::WorkflowError;
use crate::format::DataFormatRegistry;
use crate::module::{Backend, Module, ModuleRegistry, StepConfigurationContext};
use crate::naming::is_name_valid;
use crate::params::{Parameters, Version};
use crate::port::{check_link, Port};
use crate::step::{Step, StepState, StepType};

/// Declaración de un step antes de configurarlo.
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub id: String,
    pub module: String,
    pub version: Option<Version>,
    pub step_type: StepType,
    pub parameters: Parameters,
}

impl StepSpec {
    pub fn new(id: &str, module: &str) -> Self {
        Self { id: id.to_string(),
               module: module.to_string(),
               version: None,
               step_type: StepType::Standard,
               parameters: Parameters::new() }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_type(mut self, step_type: StepType) -> Self {
        self.step_type = step_type;
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }
}

pub struct WorkflowBuilder<'a> {
    modules: &'a ModuleRegistry,
    formats: &'a DataFormatRegistry,
    config: &'a EngineConfig,
    backend: Backend,
    checker_configuration: CheckerConfiguration,
    steps: IndexMap<String, (Step, Box<dyn Module>)>,
    links: Vec<Link>,
}

impl<'a> WorkflowBuilder<'a> {
    pub fn new(modules: &'a ModuleRegistry, formats: &'a DataFormatRegistry, config: &'a EngineConfig) -> Self {
        Self { modules,
               formats,
               config,
               backend: Backend::Local,
               checker_configuration: CheckerConfiguration::new(),
               steps: IndexMap::new(),
               links: Vec::new() }
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Debe fijarse antes de añadir el step checker.
    pub fn checker_configuration(mut self, configuration: CheckerConfiguration) -> Self {
        self.checker_configuration = configuration;
        self
    }

    /// Carga y configura el módulo del step.
    pub fn add_step(&mut self, spec: StepSpec) -> Result<&mut Self, WorkflowError> {
        if !is_name_valid(&spec.id) {
            return Err(WorkflowError::InvalidStepId(spec.id));
        }
        let id = spec.id.to_lowercase();
        if self.steps.contains_key(&id) {
            return Err(WorkflowError::DuplicateStep(id));
        }
        let mut module = self.modules.load(&spec.module, spec.version.as_ref(), self.backend)?;
        let context = StepConfigurationContext { step_id: &id,
                                                 step_type: spec.step_type,
                                                 strict: self.config.strict_parameters,
                                                 formats: self.formats,
                                                 checker_configuration: &self.checker_configuration,
                                                 working_directory: &self.config.working_directory,
                                                 remote_timeout: self.config.remote_timeout };
        module.configure(&context, &spec.parameters)?;
        let step = Step::from_module(&id, spec.step_type, module.as_ref(), spec.parameters, &self.config.working_directory);
        debug!("step {} configured with module {} {} ({})", id, step.module_name(), step.version(), step.fingerprint());
        self.steps.insert(id, (step, module));
        Ok(self)
    }

    /// Enlaza la salida `from_step.from_port` con la entrada `to_step.to_port`.
    pub fn link(&mut self, from_step: &str, from_port: &str, to_step: &str, to_port: &str) -> Result<&mut Self, WorkflowError> {
        let (from_step, to_step) = (from_step.to_lowercase(), to_step.to_lowercase());
        let (from_port, to_port) = (from_port.to_lowercase(), to_port.to_lowercase());
        let (source, _) = self.steps.get(&from_step).ok_or_else(|| WorkflowError::UnknownStep(from_step.clone()))?;
        let (target, _) = self.steps.get(&to_step).ok_or_else(|| WorkflowError::UnknownStep(to_step.clone()))?;
        let output = source.output_ports()
                           .get(&from_port)
                           .ok_or_else(|| WorkflowError::UnknownPort { step_id: from_step.clone(), port: from_port.clone() })?;
        let input = target.input_ports()
                          .get(&to_port)
                          .ok_or_else(|| WorkflowError::UnknownPort { step_id: to_step.clone(), port: to_port.clone() })?;
        if self.links.iter().any(|l| l.to_step == to_step && l.to_port == to_port) {
            return Err(WorkflowError::AlreadyLinked { step_id: to_step, port: to_port });
        }
        if let Err(reason) = check_link(output, input) {
            return Err(WorkflowError::IncompatiblePorts { from_step, from_port, to_step, to_port, reason });
        }
        self.links.push(Link { from_step, from_port: output.name().to_string(), to_step, to_port: input.name().to_string() });
        Ok(self)
    }

    /// Valida el grafo y ordena los steps: dependencias primero y, entre
    /// steps disponibles a la vez, menor prioridad de tipo y orden de
    /// declaración.
    pub fn build(self) -> Result<Workflow, WorkflowError> {
        for (id, (step, _)) in &self.steps {
            for port in step.input_ports().iter() {
                let linked = self.links.iter().any(|l| &l.to_step == id && l.to_port == port.name());
                if !linked && !port.is_list() {
                    return Err(WorkflowError::UnlinkedInput { step_id: id.clone(), port: port.name().to_string() });
                }
            }
        }

        let order = self.order()?;
        let mut steps = self.steps;
        let mut ordered = IndexMap::new();
        for id in order {
            if let Some((mut step, module)) = steps.shift_remove(&id) {
                step.set_state(StepState::Waiting)?;
                ordered.insert(id, (step, module));
            }
        }
        info!("workflow built with {} steps", ordered.len());
        Ok(Workflow::new(ordered, self.links, self.formats.clone(), self.config.clone()))
    }

    fn order(&self) -> Result<Vec<String>, WorkflowError> {
        let mut upstream: HashMap<&str, BTreeSet<&str>> =
            self.steps.keys().map(|id| (id.as_str(), BTreeSet::new())).collect();
        for link in &self.links {
            if let Some(deps) = upstream.get_mut(link.to_step.as_str()) {
                deps.insert(link.from_step.as_str());
            }
        }
        let mut order: Vec<String> = Vec::new();
        while order.len() < self.steps.len() {
            let next = self.steps
                           .iter()
                           .enumerate()
                           .filter(|(_, (id, _))| !order.contains(*id))
                           .filter(|(_, (id, _))| upstream[id.as_str()].iter().all(|d| order.iter().any(|o| o.as_str() == *d)))
                           .min_by_key(|(index, (_, (step, _)))| (step.step_type().priority(), *index))
                           .map(|(_, (id, _))| id.clone());
            match next {
                Some(id) => order.push(id),
                None => {
                    let remaining = self.steps.keys().filter(|id| !order.contains(*id)).cloned().collect();
                    return Err(WorkflowError::Cycle(remaining));
                }
            }
        }
        Ok(order)
    }
}
