use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use uuid::Uuid;

use crate::data::{Data, PortData};
use crate::errors::TaskError;

/// Datos de una tarea. Lo crea el motor para una única llamada a
/// `Module::execute`.
#[derive(Debug, Clone)]
pub struct TaskContext {
    run_id: Uuid,
    context_id: u32,
    context_name: String,
    step_id: String,
    working_directory: PathBuf,
    inputs: IndexMap<String, PortData>,
    outputs: IndexMap<String, PortData>,
}

impl TaskContext {
    pub fn new(context_id: u32, context_name: &str, step_id: &str, working_directory: impl Into<PathBuf>) -> Self {
        Self { run_id: Uuid::new_v4(),
               context_id,
               context_name: context_name.to_string(),
               step_id: step_id.to_string(),
               working_directory: working_directory.into(),
               inputs: IndexMap::new(),
               outputs: IndexMap::new() }
    }

    pub fn with_input(mut self, data: PortData) -> Self {
        self.inputs.insert(data.port_name().to_string(), data);
        self
    }

    pub fn with_output(mut self, data: PortData) -> Self {
        self.outputs.insert(data.port_name().to_string(), data);
        self
    }

    pub fn run_id(&self) -> Uuid { self.run_id }

    pub fn context_id(&self) -> u32 { self.context_id }

    pub fn context_name(&self) -> &str { &self.context_name }

    pub fn step_id(&self) -> &str { &self.step_id }

    pub fn working_directory(&self) -> &Path { &self.working_directory }

    pub fn input_port_data(&self, port: &str) -> Result<&PortData, TaskError> {
        self.inputs.get(&port.to_lowercase()).ok_or_else(|| TaskError::MissingPort(port.to_string()))
    }

    /// Dato único de un puerto de entrada simple.
    pub fn input_data(&self, port: &str) -> Result<&Data, TaskError> { self.input_port_data(port)?.single() }

    pub fn input_data_list(&self, port: &str) -> Result<&[Data], TaskError> { Ok(self.input_port_data(port)?.elements()) }

    pub fn inputs(&self) -> impl Iterator<Item = &PortData> { self.inputs.values() }

    pub fn outputs(&self) -> impl Iterator<Item = &PortData> { self.outputs.values() }

    pub fn output_port_data(&self, port: &str) -> Result<&PortData, TaskError> {
        self.outputs.get(&port.to_lowercase()).ok_or_else(|| TaskError::MissingPort(port.to_string()))
    }

    pub fn output_port_data_mut(&mut self, port: &str) -> Result<&mut PortData, TaskError> {
        self.outputs.get_mut(&port.to_lowercase()).ok_or_else(|| TaskError::MissingPort(port.to_string()))
    }

    /// Dato de salida `name` (sin partir) del puerto, creado si no existía.
    pub fn output_data(&mut self, port: &str, name: &str) -> Result<&mut Data, TaskError> {
        let output = self.output_port_data_mut(port)?;
        match output.elements().iter().position(|d| d.name() == name && d.part().is_none()) {
            Some(i) => Ok(&mut output.elements_mut()[i]),
            None => output.add_element(name, None),
        }
    }

    /// Dato de salida que conserva nombre, parte y metadatos de `source`.
    pub fn output_data_from(&mut self, port: &str, source: &Data) -> Result<&mut Data, TaskError> {
        let output = self.output_port_data_mut(port)?;
        let data = output.add_element(source.name(), source.part())?;
        data.metadata_mut().copy_from(source.metadata());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DataFormat;
    use crate::port::{InputPort, OutputPort};

    #[test]
    fn output_data_is_named_by_the_codec() {
        let fmt = DataFormat::builder("text", "text", ".txt").build().unwrap();
        let out = OutputPort::new("output", &fmt).unwrap();
        let input = InputPort::new("input", &fmt).unwrap();
        let mut ctx = TaskContext::new(1, "s1", "copy", "/tmp/w").with_input(PortData::for_input(&input, vec![]))
                                                                 .with_output(PortData::for_output(&out, "copy", "/tmp/w"));

        let data = ctx.output_data("Output", "s1").unwrap();
        let file = data.data_file().unwrap();
        assert_eq!(file.path(), Path::new("/tmp/w/copy_output_text_s1.txt"));

        // mismo nombre en un puerto simple: mismo dato
        ctx.output_data("output", "s1").unwrap();
        assert_eq!(ctx.output_port_data("output").unwrap().len(), 1);
        assert!(ctx.output_data("output", "s2").is_err());
        assert!(matches!(ctx.input_data("input"), Err(TaskError::MissingPort(_))));
        assert!(matches!(ctx.input_data("nope"), Err(TaskError::MissingPort(_))));
    }
}
