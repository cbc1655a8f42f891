use std::fs;

use super::{finish, format_parameter};
use crate::constants::{COMPRESSION_PARAMETER, FORMAT_PARAMETER};
use crate::errors::{ConfigurationError, TaskError};
use crate::format::Compression;
use crate::module::{Module, ParallelizationMode, StepConfigurationContext};
use crate::params::{checks, Parameter, Parameters, Version};
use crate::port::{InputPort, InputPorts, OutputPort, OutputPorts};
use crate::task::{TaskContext, TaskResult, TaskStatus};

const OLD_COMPRESSION_PARAMETER: &str = "output.compression";
const OVERWRITE_PARAMETER: &str = "overwrite";

fn parse_compression(context: &StepConfigurationContext<'_>, parameter: &Parameter) -> Result<Compression, ConfigurationError> {
    Compression::from_name(parameter.value())
        .ok_or_else(|| checks::bad_parameter_value(context.step_id, parameter, "expected none, gzip or bzip2"))
}

/// Copia los datos de `input` a `output`. El formato del puerto lo fija el
/// parámetro `format`; `compression` cambia sólo el nombre de la salida.
#[derive(Default)]
pub struct CopyModule {
    inputs: InputPorts,
    outputs: OutputPorts,
}

impl CopyModule {
    pub const NAME: &'static str = "copy";

    fn run(&self, context: &mut TaskContext, status: &mut TaskStatus) -> Result<(), TaskError> {
        let inputs = context.input_data_list("input")?.to_vec();
        let total = inputs.len() as i64;
        for (done, data) in inputs.iter().enumerate() {
            let output = context.output_data_from("output", data)?;
            for file_index in 0..data.data_file_count() {
                let source = data.data_file_at(file_index)?;
                let target = output.data_file_at(file_index)?;
                if let Some(parent) = target.path().parent() {
                    fs::create_dir_all(parent)?;
                }
                let bytes = fs::copy(source.path(), target.path())?;
                status.increment_counter("copied files", 1);
                status.increment_counter("copied bytes", bytes as i64);
            }
            status.set_progress_range(0, total, done as i64 + 1);
        }
        Ok(())
    }
}

impl Module for CopyModule {
    fn name(&self) -> &str { Self::NAME }

    fn version(&self) -> Version { super::builtin_version() }

    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError> {
        let format = format_parameter(context, parameters)?;
        let mut compression = Compression::None;
        for parameter in parameters {
            match parameter.name() {
                FORMAT_PARAMETER => {}
                OLD_COMPRESSION_PARAMETER => {
                    checks::renamed_parameter(context.step_id, parameter, COMPRESSION_PARAMETER, context.strict)?;
                    compression = parse_compression(context, parameter)?;
                }
                COMPRESSION_PARAMETER => {
                    compression = parse_compression(context, parameter)?;
                }
                OVERWRITE_PARAMETER => {
                    return Err(checks::removed_parameter(context.step_id, parameter, "outputs are always overwritten"));
                }
                _ => return Err(checks::unknown_parameter(context.step_id, parameter)),
            }
        }
        self.inputs = InputPorts::single(InputPort::new("input", &format)?.with_list(true));
        self.outputs = OutputPorts::single(OutputPort::new("output", &format)?.with_list(true).with_compression(compression));
        Ok(())
    }

    fn input_ports(&self) -> InputPorts { self.inputs.clone() }

    fn output_ports(&self) -> OutputPorts { self.outputs.clone() }

    fn parallelization_mode(&self) -> ParallelizationMode { ParallelizationMode::NotNeeded }

    fn execute(&self, context: &mut TaskContext, status: &mut TaskStatus) -> TaskResult {
        let outcome = self.run(context, status);
        finish(status, outcome)
    }
}
