use log::debug;

use super::{finish, format_parameter, not_configured, remaining};
use crate::constants::FORMAT_PARAMETER;
use crate::errors::{ConfigurationError, TaskError};
use crate::module::{Module, StepConfigurationContext};
use crate::params::{Parameters, Version};
use crate::port::{InputPort, InputPorts, OutputPort, OutputPorts};
use crate::splitmerge::{split_data, Splitter};
use crate::task::{TaskContext, TaskResult, TaskStatus};

/// Parte el dato del puerto `input` con el splitter de su formato. Los
/// parámetros distintos de `format` se pasan al splitter.
#[derive(Default)]
pub struct SplitterModule {
    splitter: Option<Box<dyn Splitter>>,
    inputs: InputPorts,
    outputs: OutputPorts,
}

impl SplitterModule {
    pub const NAME: &'static str = "splitter";

    fn run(&self, context: &mut TaskContext, status: &mut TaskStatus) -> Result<(), TaskError> {
        let splitter = self.splitter.as_deref().ok_or_else(|| not_configured(Self::NAME))?;
        let input = context.input_data("input")?.clone();
        let parts = split_data(splitter, &input, context.output_port_data_mut("output")?)?;
        debug!("{}: {} -> {} parts", context.step_id(), input.name(), parts);
        status.set_counter("parts", i64::from(parts));
        Ok(())
    }
}

impl Module for SplitterModule {
    fn name(&self) -> &str { Self::NAME }

    fn version(&self) -> Version { super::builtin_version() }

    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError> {
        let format = format_parameter(context, parameters)?;
        let mut splitter = format.splitter()
                                 .ok_or_else(|| context.invalid(format!("no splitter available for format {}", format.name())))?;
        splitter.configure(context.step_id, &remaining(parameters, &[FORMAT_PARAMETER]))?;
        self.splitter = Some(splitter);
        self.inputs = InputPorts::single(InputPort::new("input", &format)?);
        self.outputs = OutputPorts::single(OutputPort::new("output", &format)?.with_list(true));
        Ok(())
    }

    fn input_ports(&self) -> InputPorts { self.inputs.clone() }

    fn output_ports(&self) -> OutputPorts { self.outputs.clone() }

    fn execute(&self, context: &mut TaskContext, status: &mut TaskStatus) -> TaskResult {
        let outcome = self.run(context, status);
        finish(status, outcome)
    }
}
