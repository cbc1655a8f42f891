use std::collections::HashMap;

use indexmap::IndexMap;
use log::debug;

use crate::config::EngineConfig;
use crate::data::{Data, PortData};
use crate::errors::{TaskError, WorkflowError};
use crate::format::DataFormatRegistry;
use crate::module::Module;
use crate::naming::discover_data;
use crate::port::Port;
use crate::step::{Step, StepState};
use crate::task::TaskContext;

/// Enlace de un puerto de salida con un puerto de entrada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub from_step: String,
    pub from_port: String,
    pub to_step: String,
    pub to_port: String,
}

/// Workflow validado, con los steps en orden de ejecución.
pub struct Workflow {
    steps: IndexMap<String, Step>,
    modules: HashMap<String, Box<dyn Module>>,
    links: Vec<Link>,
    formats: DataFormatRegistry,
    config: EngineConfig,
}

impl Workflow {
    pub(crate) fn new(ordered: IndexMap<String, (Step, Box<dyn Module>)>,
                      links: Vec<Link>,
                      formats: DataFormatRegistry,
                      config: EngineConfig)
                      -> Self {
        let mut steps = IndexMap::new();
        let mut modules = HashMap::new();
        for (id, (step, module)) in ordered {
            modules.insert(id.clone(), module);
            steps.insert(id, step);
        }
        Self { steps, modules, links, formats, config }
    }

    /// Steps en orden de ejecución.
    pub fn steps(&self) -> impl Iterator<Item = &Step> { self.steps.values() }

    pub fn step_ids(&self) -> Vec<String> { self.steps.keys().cloned().collect() }

    pub fn step(&self, id: &str) -> Option<&Step> { self.steps.get(&id.to_lowercase()) }

    pub fn module(&self, id: &str) -> Option<&dyn Module> { self.modules.get(&id.to_lowercase()).map(|m| m.as_ref()) }

    pub fn links(&self) -> &[Link] { &self.links }

    pub fn formats(&self) -> &DataFormatRegistry { &self.formats }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Steps de los que `id` consume datos.
    pub fn upstream(&self, id: &str) -> Vec<&str> {
        let id = id.to_lowercase();
        let mut upstream: Vec<&str> = self.links.iter().filter(|l| l.to_step == id).map(|l| l.from_step.as_str()).collect();
        upstream.sort_unstable();
        upstream.dedup();
        upstream
    }

    pub fn set_state(&mut self, id: &str, state: StepState) -> Result<(), WorkflowError> {
        self.steps
            .get_mut(&id.to_lowercase())
            .ok_or_else(|| WorkflowError::UnknownStep(id.to_string()))?
            .set_state(state)
    }

    /// Acceso simultáneo al step (mutable) y a su módulo.
    pub fn step_and_module(&mut self, id: &str) -> Result<(&mut Step, &dyn Module), WorkflowError> {
        let key = id.to_lowercase();
        let step = self.steps.get_mut(&key).ok_or_else(|| WorkflowError::UnknownStep(id.to_string()))?;
        let module = self.modules.get(&key).ok_or_else(|| WorkflowError::UnknownStep(id.to_string()))?;
        Ok((step, module.as_ref()))
    }

    /// Datos de cada puerto de entrada de `id`, buscados en el directorio del
    /// step enlazado mediante el codec de nombres. Un puerto lista sin
    /// enlace queda vacío.
    pub fn discover_inputs(&self, id: &str) -> Result<IndexMap<String, Vec<Data>>, TaskError> {
        let key = id.to_lowercase();
        let step = self.steps.get(&key).ok_or_else(|| TaskError::Internal(format!("unknown step {id}")))?;
        let mut inputs = IndexMap::new();
        for port in step.input_ports().iter() {
            let link = self.links.iter().find(|l| l.to_step == key && l.to_port == port.name());
            let data = match link {
                None => Vec::new(),
                Some(link) => {
                    let upstream = self.steps
                                       .get(&link.from_step)
                                       .ok_or_else(|| TaskError::Internal(format!("unknown step {}", link.from_step)))?;
                    discover_data(upstream.output_directory(),
                                  &link.from_step,
                                  &link.from_port,
                                  port.format(),
                                  &port.compressions_accepted(),
                                  &self.formats)?
                }
            };
            debug!("{}.{}: {} data found", key, port.name(), data.len());
            inputs.insert(port.name().to_string(), data);
        }
        Ok(inputs)
    }

    /// Una tarea por dato del primer puerto de entrada simple (los demás
    /// puertos simples se emparejan por nombre y parte; los puertos lista
    /// reciben todos sus datos). Sin puertos simples hay una única tarea.
    pub fn task_contexts(&self, id: &str) -> Result<Vec<TaskContext>, TaskError> {
        let mut inputs = self.discover_inputs(id)?;
        let key = id.to_lowercase();
        let step = self.steps.get(&key).ok_or_else(|| TaskError::Internal(format!("unknown step {id}")))?;
        let directory = step.output_directory();

        let new_context = |n: usize, name: &str| {
            let mut context = TaskContext::new(n as u32 + 1, name, &key, &self.config.working_directory);
            for port in step.output_ports().iter() {
                context = context.with_output(PortData::for_output(port, &key, directory));
            }
            context
        };

        let Some(driver) = step.input_ports().iter().find(|p| !p.is_list()) else {
            let mut context = new_context(0, &key);
            for port in step.input_ports().iter() {
                context = context.with_input(PortData::for_input(port, inputs.shift_remove(port.name()).unwrap_or_default()));
            }
            return Ok(vec![context]);
        };

        let driving = inputs.get(driver.name()).cloned().unwrap_or_default();
        let mut contexts = Vec::with_capacity(driving.len());
        for (n, data) in driving.iter().enumerate() {
            let mut context = new_context(n, data.name());
            for port in step.input_ports().iter() {
                let available = inputs.get(port.name()).map(Vec::as_slice).unwrap_or_default();
                let elements = if port.is_list() {
                    available.to_vec()
                } else if port.name() == driver.name() {
                    vec![data.clone()]
                } else {
                    let matched = available.iter().find(|d| d.name() == data.name() && d.part() == data.part());
                    match (matched, available) {
                        (Some(d), _) => vec![d.clone()],
                        (None, [only]) => vec![only.clone()],
                        _ => return Err(TaskError::MissingPort(format!("{} (for {})", port.name(), data.name()))),
                    }
                };
                context = context.with_input(PortData::for_input(port, elements));
            }
            contexts.push(context);
        }
        Ok(contexts)
    }
}
