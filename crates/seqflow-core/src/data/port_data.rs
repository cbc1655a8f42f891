use std::path::PathBuf;

use super::Data;
use crate::errors::TaskError;
use crate::format::{Compression, DataFormat};
use crate::port::{InputPort, OutputPort, Port};

/// Dónde y con qué compresión escribe un puerto de salida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub step_id: String,
    pub port_name: String,
    pub directory: PathBuf,
    pub compression: Compression,
}

/// Contenido de un puerto durante una tarea: exactamente un dato para un
/// puerto simple, cero o más para un puerto lista.
#[derive(Debug, Clone)]
pub struct PortData {
    port_name: String,
    format: DataFormat,
    list: bool,
    elements: Vec<Data>,
    location: Option<OutputLocation>,
}

impl PortData {
    pub fn for_input(port: &InputPort, elements: Vec<Data>) -> Self {
        Self { port_name: port.name().to_string(),
               format: port.format().clone(),
               list: port.is_list(),
               elements,
               location: None }
    }

    pub fn for_output(port: &OutputPort, step_id: &str, directory: impl Into<PathBuf>) -> Self {
        Self { port_name: port.name().to_string(),
               format: port.format().clone(),
               list: port.is_list(),
               elements: Vec::new(),
               location: Some(OutputLocation { step_id: step_id.to_string(),
                                               port_name: port.name().to_string(),
                                               directory: directory.into(),
                                               compression: port.compression() }) }
    }

    pub fn port_name(&self) -> &str { &self.port_name }

    pub fn format(&self) -> &DataFormat { &self.format }

    pub fn is_list(&self) -> bool { self.list }

    pub fn elements(&self) -> &[Data] { &self.elements }

    pub fn elements_mut(&mut self) -> &mut [Data] { &mut self.elements }

    pub fn len(&self) -> usize { self.elements.len() }

    pub fn is_empty(&self) -> bool { self.elements.is_empty() }

    /// El dato de un puerto simple.
    pub fn single(&self) -> Result<&Data, TaskError> {
        match self.elements.as_slice() {
            [data] => Ok(data),
            [] => Err(TaskError::MissingPort(self.port_name.clone())),
            _ => Err(TaskError::Format(format!("port {} holds {} data, expected one", self.port_name, self.elements.len()))),
        }
    }

    /// Agrega un dato de salida nuevo. Un puerto simple admite uno solo.
    pub fn add_element(&mut self, name: &str, part: Option<u32>) -> Result<&mut Data, TaskError> {
        let location = self.location
                           .as_ref()
                           .ok_or_else(|| TaskError::Internal(format!("port {} is not an output port", self.port_name)))?;
        if !self.list && !self.elements.is_empty() {
            return Err(TaskError::Format(format!("output port {} is not a list port", self.port_name)));
        }
        if self.elements.iter().any(|d| d.name() == name && d.part() == part) {
            return Err(TaskError::Format(format!("data {name} (part {part:?}) already exists on port {}", self.port_name)));
        }
        let data = Data::output(location, name, &self.format, part);
        self.elements.push(data);
        let last = self.elements.len() - 1;
        Ok(&mut self.elements[last])
    }
}
