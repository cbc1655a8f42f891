use indexmap::IndexMap;

use super::{finish, not_configured};
use crate::checker::{CheckerConfiguration, CheckerCoordinator};
use crate::constants::FORMATS_PARAMETER;
use crate::errors::{ConfigurationError, TaskError};
use crate::format::DataFormat;
use crate::module::{Module, ParallelizationMode, StepConfigurationContext};
use crate::naming::to_valid_name;
use crate::params::{checks, Parameters, Version};
use crate::port::{InputPort, InputPorts, Port};
use crate::task::{TaskContext, TaskResult, TaskStatus};

/// Valida los datos de cada formato configurado con su checker, en orden de
/// dependencias. Hay un puerto de entrada lista por formato, con el nombre
/// del formato saneado.
///
/// Los formatos son los de la `CheckerConfiguration` del workflow más los
/// del parámetro `formats`.
#[derive(Default)]
pub struct CheckerModule {
    configuration: Option<CheckerConfiguration>,
    formats: IndexMap<String, DataFormat>,
    inputs: InputPorts,
}

impl CheckerModule {
    pub const NAME: &'static str = "checker";

    fn run(&self, context: &mut TaskContext, status: &mut TaskStatus) -> Result<(), TaskError> {
        let configuration = self.configuration.as_ref().ok_or_else(|| not_configured(Self::NAME))?;
        let mut coordinator = CheckerCoordinator::new(context.step_id(), configuration);
        for (port, format) in &self.formats {
            let data = context.input_data_list(port)?;
            if !data.is_empty() {
                coordinator.add_data(format, data.iter().cloned())?;
            }
        }
        let checked = coordinator.check_all(status)?;
        status.set_counter("checked data", checked as i64);
        Ok(())
    }

    fn add_format(&mut self, context: &StepConfigurationContext<'_>, name: &str) -> Result<(), ConfigurationError> {
        let format = context.formats
                            .by_name_or_alias(name)
                            .cloned()
                            .ok_or_else(|| ConfigurationError::UnknownFormat(name.to_string()))?;
        if !format.has_checker() {
            return Err(context.invalid(format!("format {} has no checker", format.name())));
        }
        let port = InputPort::new(&to_valid_name(format.name()), &format)?.with_list(true);
        if !self.inputs.contains(port.name()) {
            self.formats.insert(port.name().to_string(), format);
            self.inputs.add(port)?;
        }
        Ok(())
    }
}

impl Module for CheckerModule {
    fn name(&self) -> &str { Self::NAME }

    fn version(&self) -> Version { super::builtin_version() }

    fn description(&self) -> &str { "Check data before launching the analysis" }

    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError> {
        let mut configuration = context.checker_configuration.clone();
        for parameter in parameters {
            if parameter.name() != FORMATS_PARAMETER {
                return Err(checks::unknown_parameter(context.step_id, parameter));
            }
            for name in parameter.value().split(',').map(str::trim).filter(|n| !n.is_empty()) {
                if configuration.get(name).is_none() {
                    configuration.set(name, Parameters::new());
                }
            }
        }
        let names: Vec<String> = configuration.formats().map(str::to_string).collect();
        for name in &names {
            self.add_format(context, name)?;
        }
        // las claves del coordinador son nombres canónicos, no alias
        let mut canonical = CheckerConfiguration::new();
        for name in &names {
            if let Some(format) = context.formats.by_name_or_alias(name) {
                canonical.set(format.name(), configuration.get(name).cloned().unwrap_or_default());
            }
        }
        self.configuration = Some(canonical);
        Ok(())
    }

    fn input_ports(&self) -> InputPorts { self.inputs.clone() }

    fn parallelization_mode(&self) -> ParallelizationMode { ParallelizationMode::NotNeeded }

    fn execute(&self, context: &mut TaskContext, status: &mut TaskStatus) -> TaskResult {
        let outcome = self.run(context, status);
        finish(status, outcome)
    }
}
