use std::collections::BTreeSet;

use super::{normalize_port_name, Port};
use crate::errors::ConfigurationError;
use crate::format::{Compression, DataFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPort {
    name: String,
    format: DataFormat,
    list: bool,
    compressions_accepted: BTreeSet<Compression>,
    required_in_working_directory: bool,
}

impl InputPort {
    /// Puerto simple que acepta cualquier compresión.
    pub fn new(name: &str, format: &DataFormat) -> Result<Self, ConfigurationError> {
        Ok(Self { name: normalize_port_name(name)?,
                  format: format.clone(),
                  list: false,
                  compressions_accepted: Compression::ALL.into_iter().collect(),
                  required_in_working_directory: false })
    }

    pub fn with_list(mut self, list: bool) -> Self {
        self.list = list;
        self
    }

    pub fn with_compressions_accepted(mut self, compressions: &[Compression]) -> Self {
        self.compressions_accepted = compressions.iter().copied().collect();
        self
    }

    /// El dato debe copiarse al directorio de trabajo antes de ejecutar
    /// (backend distribuido).
    pub fn with_required_in_working_directory(mut self, required: bool) -> Self {
        self.required_in_working_directory = required;
        self
    }

    pub fn compressions_accepted(&self) -> Vec<Compression> { self.compressions_accepted.iter().copied().collect() }

    pub fn accepts(&self, compression: Compression) -> bool { self.compressions_accepted.contains(&compression) }

    pub fn is_required_in_working_directory(&self) -> bool { self.required_in_working_directory }
}

impl Port for InputPort {
    fn name(&self) -> &str { &self.name }

    fn format(&self) -> &DataFormat { &self.format }

    fn is_list(&self) -> bool { self.list }
}
