use indexmap::IndexMap;

use super::{InputPort, OutputPort, Port};
use crate::errors::ConfigurationError;

/// Colección de puertos con nombres únicos (sin distinguir mayúsculas),
/// búsqueda O(1) y orden de declaración estable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ports<P: Port> {
    ports: IndexMap<String, P>,
}

pub type InputPorts = Ports<InputPort>;
pub type OutputPorts = Ports<OutputPort>;

impl<P: Port> Default for Ports<P> {
    fn default() -> Self { Self { ports: IndexMap::new() } }
}

impl<P: Port> Ports<P> {
    pub fn new() -> Self { Self::default() }

    /// Colección de un único puerto.
    pub fn single(port: P) -> Self {
        let mut ports = Self::new();
        ports.ports.insert(port.name().to_string(), port);
        ports
    }

    pub fn add(&mut self, port: P) -> Result<(), ConfigurationError> {
        if self.ports.contains_key(port.name()) {
            return Err(ConfigurationError::Port(format!("duplicate port name: {}", port.name())));
        }
        self.ports.insert(port.name().to_string(), port);
        Ok(())
    }

    pub fn with(mut self, port: P) -> Result<Self, ConfigurationError> {
        self.add(port)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&P> { self.ports.get(&name.to_lowercase()) }

    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    pub fn iter(&self) -> impl Iterator<Item = &P> { self.ports.values() }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.ports.keys().map(String::as_str) }

    /// Primer puerto declarado.
    pub fn first(&self) -> Option<&P> { self.ports.first().map(|(_, p)| p) }

    pub fn len(&self) -> usize { self.ports.len() }

    pub fn is_empty(&self) -> bool { self.ports.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DataFormat;

    #[test]
    fn names_are_unique_case_insensitively() {
        let f = DataFormat::builder("text", "text", ".txt").build().unwrap();
        let mut ports = InputPorts::new();
        ports.add(InputPort::new("Input", &f).unwrap()).unwrap();
        assert!(ports.add(InputPort::new("INPUT", &f).unwrap()).is_err());
        assert!(ports.get("iNpUt").is_some());
        assert_eq!(ports.names().collect::<Vec<_>>(), vec!["input"]);
    }
}
