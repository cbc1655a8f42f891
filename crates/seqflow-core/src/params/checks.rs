//! Helpers para que los módulos reporten parámetros inválidos durante
//! `configure`.
//!
//! Los parámetros obsoletos o renombrados sólo emiten un `warn!` salvo que el
//! llamador pida fail-fast (`strict`).

use log::warn;

use super::Parameter;
use crate::errors::ConfigurationError;

pub fn unknown_parameter(step_id: &str, parameter: &Parameter) -> ConfigurationError {
    ConfigurationError::UnknownParameter { step_id: step_id.to_string(),
                                           parameter: parameter.name().to_string() }
}

pub fn removed_parameter(step_id: &str, parameter: &Parameter, message: &str) -> ConfigurationError {
    ConfigurationError::RemovedParameter { step_id: step_id.to_string(),
                                           parameter: parameter.name().to_string(),
                                           message: message.to_string() }
}

pub fn bad_parameter_value(step_id: &str, parameter: &Parameter, message: &str) -> ConfigurationError {
    ConfigurationError::InvalidParameterValue { step_id: step_id.to_string(),
                                                parameter: parameter.name().to_string(),
                                                message: message.to_string() }
}

pub fn deprecated_parameter(step_id: &str, parameter: &Parameter, strict: bool) -> Result<(), ConfigurationError> {
    report_deprecation(step_id, parameter, None, strict)
}

pub fn renamed_parameter(step_id: &str, parameter: &Parameter, new_name: &str, strict: bool) -> Result<(), ConfigurationError> {
    report_deprecation(step_id, parameter, Some(new_name), strict)
}

fn report_deprecation(step_id: &str, parameter: &Parameter, replacement: Option<&str>, strict: bool) -> Result<(), ConfigurationError> {
    let err = ConfigurationError::DeprecatedParameter { step_id: step_id.to_string(),
                                                        parameter: parameter.name().to_string(),
                                                        replacement: replacement.map(str::to_string) };
    if strict {
        return Err(err);
    }
    warn!("{err}");
    Ok(())
}
