use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Metadata clave/valor de un dato (réplica, condición, grupo técnico...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMetadata {
    entries: BTreeMap<String, String>,
}

impl DataMetadata {
    pub fn get(&self, key: &str) -> Option<&str> { self.entries.get(key).map(String::as_str) }

    pub fn set(&mut self, key: &str, value: &str) { self.entries.insert(key.to_string(), value.to_string()); }

    pub fn contains(&self, key: &str) -> bool { self.entries.contains_key(key) }

    pub fn remove(&mut self, key: &str) -> Option<String> { self.entries.remove(key) }

    /// Copia todas las entradas de `other`, sobrescribiendo las existentes.
    pub fn copy_from(&mut self, other: &DataMetadata) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> { self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str())) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
