use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Almacén compartido por los checkers de una misma tarea.
#[derive(Debug, Clone, Default)]
pub struct CheckStore {
    values: HashMap<String, Value>,
}

impl CheckStore {
    pub fn new() -> Self { Self::default() }

    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<(), serde_json::Error> {
        self.values.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> { self.values.get(key) }

    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<Result<T, serde_json::Error>> {
        self.values.get(key).map(|v| serde_json::from_value(v.clone()))
    }

    pub fn contains(&self, key: &str) -> bool { self.values.contains_key(key) }

    pub fn clear(&mut self) { self.values.clear(); }
}
