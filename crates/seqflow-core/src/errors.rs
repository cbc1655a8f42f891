//! Errores del core, separados por momento del ciclo de vida.
//!
//! - `ConfigurationError`: durante `Module::configure` y la construcción del
//!   workflow. Aborta la construcción completa.
//! - `NamingError`: nombre de fichero mal formado (inconsistencia en disco,
//!   no error del usuario).
//! - `TaskError`: fallo durante `Module::execute`, siempre encapsulado en un
//!   `TaskResult`.
//! - `WorkflowError`: grafo inválido.

use std::io;

use thiserror::Error;

/// Error de acceso tipado a un parámetro (valor no interpretable).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("invalid parameter name: {0:?}")]
    InvalidName(String),
    #[error("parameter \"{name}\" has an invalid value ({value:?}): {expected}")]
    BadValue { name: String, value: String, expected: String },
}

impl ParameterError {
    /// Asocia el error al step que estaba configurando el parámetro.
    pub fn in_step(self, step_id: &str) -> ConfigurationError {
        match self {
            ParameterError::InvalidName(name) => ConfigurationError::InvalidConfiguration {
                step_id: step_id.to_string(),
                message: format!("invalid parameter name: {name:?}"),
            },
            ParameterError::BadValue { name, value, expected } => ConfigurationError::InvalidParameterValue {
                step_id: step_id.to_string(),
                parameter: name,
                message: format!("{expected} (value: {value:?})"),
            },
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid value for parameter \"{parameter}\" in step \"{step_id}\": {message}")]
    InvalidParameterValue { step_id: String, parameter: String, message: String },
    #[error("unknown parameter \"{parameter}\" in step \"{step_id}\"")]
    UnknownParameter { step_id: String, parameter: String },
    #[error("parameter \"{parameter}\" in step \"{step_id}\" has been removed: {message}")]
    RemovedParameter { step_id: String, parameter: String, message: String },
    #[error("parameter \"{parameter}\" in step \"{step_id}\" is deprecated{}", .replacement.as_ref().map(|r| format!(", use \"{r}\" instead")).unwrap_or_default())]
    DeprecatedParameter { step_id: String, parameter: String, replacement: Option<String> },
    #[error("invalid configuration of step \"{step_id}\": {message}")]
    InvalidConfiguration { step_id: String, message: String },
    #[error("unknown module: {0}")]
    UnknownModule(String),
    #[error("unknown data format: {0}")]
    UnknownFormat(String),
    #[error("invalid port: {0}")]
    Port(String),
    #[error("invalid environment variable {name}: {message}")]
    Env { name: String, message: String },
}

/// Nombre de fichero que no respeta la gramática del codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid filename {filename:?}: {message}")]
pub struct NamingError {
    pub filename: String,
    pub message: String,
}

impl NamingError {
    pub fn new(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self { filename: filename.into(), message: message.into() }
    }
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot split already split data: {data} (part {part})")]
    AlreadySplit { data: String, part: u32 },
    #[error("found two parts with the same number ({part}) for merger key \"{key}\"")]
    DuplicatePart { key: String, part: i64 },
    #[error("two merger keys share the same data name: \"{first}\" and \"{second}\" -> \"{name}\"")]
    MergerKeyCollision { first: String, second: String, name: String },
    #[error("Unable to resolve checker dependencies: {pending:?}")]
    CheckerDependencies { pending: Vec<String> },
    #[error("check of {data} ({format}) failed: {message}")]
    CheckFailed { format: String, data: String, message: String },
    #[error("data format error: {0}")]
    Format(String),
    #[error("no data for port \"{0}\"")]
    MissingPort(String),
    #[error("remote execution failed: {0}")]
    Remote(String),
    #[error("remote execution timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("duplicate step id: {0}")]
    DuplicateStep(String),
    #[error("invalid step id: {0:?}")]
    InvalidStepId(String),
    #[error("unknown step: {0}")]
    UnknownStep(String),
    #[error("step \"{step_id}\" has no port \"{port}\"")]
    UnknownPort { step_id: String, port: String },
    #[error("cannot link {from_step}.{from_port} to {to_step}.{to_port}: {reason}")]
    IncompatiblePorts { from_step: String, from_port: String, to_step: String, to_port: String, reason: String },
    #[error("input port {step_id}.{port} is already linked")]
    AlreadyLinked { step_id: String, port: String },
    #[error("input port {step_id}.{port} is not linked")]
    UnlinkedInput { step_id: String, port: String },
    #[error("cycle detected between steps: {0:?}")]
    Cycle(Vec<String>),
    #[error("invalid state transition for step \"{step_id}\": {from:?} -> {to:?}")]
    InvalidTransition { step_id: String, from: crate::step::StepState, to: crate::step::StepState },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_error_cites_step_and_parameter() {
        let err = ParameterError::BadValue { name: "count".into(), value: "abc".into(), expected: "an integer".into() }.in_step("map");
        let msg = err.to_string();
        assert!(msg.contains("\"count\""));
        assert!(msg.contains("\"map\""));
    }

    #[test]
    fn deprecated_message_mentions_replacement() {
        let err = ConfigurationError::DeprecatedParameter { step_id: "filter".into(),
                                                            parameter: "old".into(),
                                                            replacement: Some("new".into()) };
        assert_eq!(err.to_string(), "parameter \"old\" in step \"filter\" is deprecated, use \"new\" instead");
    }

    #[test]
    fn checker_dependency_message() {
        let err = TaskError::CheckerDependencies { pending: vec!["a".into()] };
        assert!(err.to_string().starts_with("Unable to resolve checker dependencies"));
    }
}
