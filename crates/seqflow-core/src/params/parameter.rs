use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::errors::ParameterError;

/// Par `(nombre, valor)` inmutable.
///
/// El nombre se normaliza (trim + minúsculas) en la construcción y no puede
/// quedar vacío. Igualdad y orden son lexicográficos sobre `(nombre, valor)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Parameter {
    name: String,
    value: String,
}

impl Parameter {
    pub fn new(name: &str, value: impl Into<String>) -> Result<Self, ParameterError> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ParameterError::InvalidName(name.to_string()));
        }
        Ok(Self { name: normalized, value: value.into() })
    }

    pub fn name(&self) -> &str { &self.name }

    /// Valor tal como fue declarado.
    pub fn value(&self) -> &str { &self.value }

    pub fn string_value(&self) -> &str { &self.value }

    pub fn lower_string_value(&self) -> String { self.value.to_lowercase() }

    pub fn upper_string_value(&self) -> String { self.value.to_uppercase() }

    pub fn int_value(&self) -> Result<i32, ParameterError> {
        self.value.trim().parse::<i32>().map_err(|_| self.bad_value("an integer is expected"))
    }

    pub fn long_value(&self) -> Result<i64, ParameterError> {
        self.value.trim().parse::<i64>().map_err(|_| self.bad_value("an integer is expected"))
    }

    pub fn double_value(&self) -> Result<f64, ParameterError> {
        self.value.trim().parse::<f64>().map_err(|_| self.bad_value("a decimal number is expected"))
    }

    /// Acepta `true/false`, `yes/no` y `1/0` sin distinguir mayúsculas.
    pub fn bool_value(&self) -> Result<bool, ParameterError> {
        match self.value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(self.bad_value("a boolean is expected")),
        }
    }

    pub fn int_value_greater_or_equals_to(&self, min: i32) -> Result<i32, ParameterError> {
        let v = self.int_value()?;
        if v < min {
            return Err(self.bad_value(&format!("the value must be greater or equals to {min}")));
        }
        Ok(v)
    }

    /// Entero dentro de `[min, max]`, ambos incluidos.
    pub fn int_value_in_range(&self, min: i32, max: i32) -> Result<i32, ParameterError> {
        let v = self.int_value()?;
        if v < min || v > max {
            return Err(self.bad_value(&format!("the value must be in the range [{min}, {max}]")));
        }
        Ok(v)
    }

    fn bad_value(&self, expected: &str) -> ParameterError {
        ParameterError::BadValue { name: self.name.clone(),
                                   value: self.value.clone(),
                                   expected: expected.to_string() }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Parsea la forma textual `name=value`.
impl FromStr for Parameter {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) => Parameter::new(name, value),
            None => Err(ParameterError::InvalidName(s.to_string())),
        }
    }
}

/// Conjunto de parámetros de un step, indexado por nombre normalizado.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    inner: BTreeMap<String, Parameter>,
}

impl Parameters {
    pub fn new() -> Self { Self::default() }

    /// Inserta o reemplaza; devuelve el parámetro previo con el mismo nombre.
    pub fn insert(&mut self, parameter: Parameter) -> Option<Parameter> {
        self.inner.insert(parameter.name.clone(), parameter)
    }

    /// Atajo que construye y agrega el parámetro.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Result<Self, ParameterError> {
        self.insert(Parameter::new(name, value)?);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.inner.get(&name.trim().to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.inner.remove(&name.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> { self.inner.values() }

    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        let mut out = Parameters::new();
        for p in iter {
            out.insert(p);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::collections::btree_map::Values<'a, String, Parameter>;

    fn into_iter(self) -> Self::IntoIter { self.inner.values() }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.inner.values().map(|p| (p.name(), p.value())))
    }
}
