use indexmap::IndexMap;

use crate::params::Parameters;

/// Parámetros de checker por formato. Se construye junto con el workflow y
/// se entrega al coordinador; nadie lo modifica después.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckerConfiguration {
    by_format: IndexMap<String, Parameters>,
}

impl CheckerConfiguration {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, format: &str, parameters: Parameters) { self.by_format.insert(format.to_string(), parameters); }

    pub fn with(mut self, format: &str, parameters: Parameters) -> Self {
        self.set(format, parameters);
        self
    }

    pub fn get(&self, format: &str) -> Option<&Parameters> { self.by_format.get(format) }

    pub fn formats(&self) -> impl Iterator<Item = &str> { self.by_format.keys().map(String::as_str) }

    pub fn is_empty(&self) -> bool { self.by_format.is_empty() }
}
