//! Registro de formatos construido explícitamente e inyectado allí donde se
//! necesite (parseo de nombres, construcción del workflow).

use std::collections::HashMap;

use indexmap::IndexMap;

use super::DataFormat;
use crate::errors::ConfigurationError;

#[derive(Debug, Clone, Default)]
pub struct DataFormatRegistry {
    formats: IndexMap<String, DataFormat>,
    aliases: HashMap<String, String>,
    by_prefix_and_extension: HashMap<(String, String), String>,
}

impl DataFormatRegistry {
    pub fn new() -> Self { Self::default() }

    /// Registra un formato. Rechaza nombres/alias repetidos y pares
    /// `(prefijo, extensión)` ya usados por otro formato, ya que harían
    /// ambiguo el parseo de nombres de fichero.
    pub fn register(&mut self, format: DataFormat) -> Result<(), ConfigurationError> {
        let name = format.name().to_lowercase();
        if self.formats.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(ConfigurationError::UnknownFormat(format!("format already registered: {}", format.name())));
        }
        if let Some(alias) = format.alias() {
            let alias = alias.to_lowercase();
            if self.formats.contains_key(&alias) || self.aliases.contains_key(&alias) {
                return Err(ConfigurationError::UnknownFormat(format!("alias already registered: {alias}")));
            }
        }
        for ext in format.extensions() {
            let key = (format.prefix().to_string(), ext.clone());
            if let Some(other) = self.by_prefix_and_extension.get(&key) {
                return Err(ConfigurationError::UnknownFormat(format!("{} and {other} share prefix {:?} and extension {ext:?}",
                                                                     format.name(),
                                                                     format.prefix())));
            }
        }

        for ext in format.extensions() {
            self.by_prefix_and_extension.insert((format.prefix().to_string(), ext.clone()), name.clone());
        }
        if let Some(alias) = format.alias() {
            self.aliases.insert(alias.to_lowercase(), name.clone());
        }
        self.formats.insert(name, format);
        Ok(())
    }

    pub fn by_name(&self, name: &str) -> Option<&DataFormat> {
        self.formats.get(&name.to_lowercase())
    }

    /// Busca por nombre y, si no existe, por alias.
    pub fn by_name_or_alias(&self, name: &str) -> Option<&DataFormat> {
        let key = name.to_lowercase();
        self.formats
            .get(&key)
            .or_else(|| self.aliases.get(&key).and_then(|n| self.formats.get(n)))
    }

    /// `extension` incluye el punto inicial.
    pub fn by_prefix_and_extension(&self, prefix: &str, extension: &str) -> Option<&DataFormat> {
        self.by_prefix_and_extension
            .get(&(prefix.to_string(), extension.to_string()))
            .and_then(|n| self.formats.get(n))
    }

    pub fn formats(&self) -> impl Iterator<Item = &DataFormat> { self.formats.values() }

    pub fn len(&self) -> usize { self.formats.len() }

    pub fn is_empty(&self) -> bool { self.formats.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(name: &str, prefix: &str, ext: &str) -> DataFormat {
        DataFormat::builder(name, prefix, ext).build().unwrap()
    }

    #[test]
    fn lookups() {
        let mut reg = DataFormatRegistry::new();
        reg.register(DataFormat::builder("reads_fastq", "reads", ".fq").alias("fastq").extra_extension(".fastq").build().unwrap())
           .unwrap();
        assert!(reg.by_name("READS_FASTQ").is_some());
        assert_eq!(reg.by_name_or_alias("fastq").map(|f| f.name()), Some("reads_fastq"));
        assert!(reg.by_prefix_and_extension("reads", ".fastq").is_some());
        assert!(reg.by_prefix_and_extension("reads", ".fa").is_none());
    }

    #[test]
    fn rejects_ambiguous_formats() {
        let mut reg = DataFormatRegistry::new();
        reg.register(fmt("a", "x", ".txt")).unwrap();
        assert!(reg.register(fmt("a", "y", ".txt")).is_err());
        assert!(reg.register(fmt("b", "x", ".txt")).is_err());
        assert!(reg.register(fmt("b", "x", ".csv")).is_ok());
        assert_eq!(reg.len(), 2);
    }
}
