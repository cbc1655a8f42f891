use super::{normalize_port_name, Port};
use crate::errors::ConfigurationError;
use crate::format::{Compression, DataFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPort {
    name: String,
    format: DataFormat,
    list: bool,
    compression: Compression,
}

impl OutputPort {
    pub fn new(name: &str, format: &DataFormat) -> Result<Self, ConfigurationError> {
        Ok(Self { name: normalize_port_name(name)?,
                  format: format.clone(),
                  list: false,
                  compression: Compression::None })
    }

    pub fn with_list(mut self, list: bool) -> Self {
        self.list = list;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression(&self) -> Compression { self.compression }
}

impl Port for OutputPort {
    fn name(&self) -> &str { &self.name }

    fn format(&self) -> &DataFormat { &self.format }

    fn is_list(&self) -> bool { self.list }
}
