use super::{finish, format_parameter, not_configured, remaining};
use crate::constants::{FORMAT_PARAMETER, REP_TECH_GROUP_METADATA};
use crate::errors::{ConfigurationError, TaskError};
use crate::module::{Module, StepConfigurationContext};
use crate::params::{Parameters, Version};
use crate::port::{InputPort, InputPorts, OutputPort, OutputPorts};
use crate::splitmerge::{merge_data, MergeKey, MergeOptions, Merger};
use crate::task::{TaskContext, TaskResult, TaskStatus};

/// Estado común de los dos módulos de fusión.
#[derive(Default)]
struct MergerCore {
    merger: Option<Box<dyn Merger>>,
    inputs: InputPorts,
    outputs: OutputPorts,
}

impl MergerCore {
    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError> {
        let format = format_parameter(context, parameters)?;
        let mut merger = format.merger()
                               .ok_or_else(|| context.invalid(format!("no merger available for format {}", format.name())))?;
        merger.configure(context.step_id, &remaining(parameters, &[FORMAT_PARAMETER]))?;
        self.merger = Some(merger);
        self.inputs = InputPorts::single(InputPort::new("input", &format)?.with_list(true));
        self.outputs = OutputPorts::single(OutputPort::new("output", &format)?.with_list(true));
        Ok(())
    }

    fn run(&self, name: &str, options: &MergeOptions, context: &mut TaskContext, status: &mut TaskStatus) -> Result<(), TaskError> {
        let merger = self.merger.as_deref().ok_or_else(|| not_configured(name))?;
        let inputs = context.input_data_list("input")?.to_vec();
        let groups = merge_data(merger, &inputs, context.output_port_data_mut("output")?, options)?;
        status.set_counter("input data", inputs.len() as i64);
        status.set_counter("merged data", groups as i64);
        Ok(())
    }
}

/// Fusiona las partes de los datos que comparten nombre.
#[derive(Default)]
pub struct MergerModule {
    core: MergerCore,
}

impl MergerModule {
    pub const NAME: &'static str = "merger";
}

impl Module for MergerModule {
    fn name(&self) -> &str { Self::NAME }

    fn version(&self) -> Version { super::builtin_version() }

    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError> {
        self.core.configure(context, parameters)
    }

    fn input_ports(&self) -> InputPorts { self.core.inputs.clone() }

    fn output_ports(&self) -> OutputPorts { self.core.outputs.clone() }

    fn execute(&self, context: &mut TaskContext, status: &mut TaskStatus) -> TaskResult {
        let outcome = self.core.run(Self::NAME, &MergeOptions::default(), context, status);
        finish(status, outcome)
    }
}

/// Fusiona réplicas técnicas: agrupa por el metadato `RepTechGroup` y admite
/// números de parte repetidos entre réplicas.
#[derive(Default)]
pub struct TechnicalReplicateMergerModule {
    core: MergerCore,
}

impl TechnicalReplicateMergerModule {
    pub const NAME: &'static str = "technicalreplicatemerger";

    pub fn merge_options() -> MergeOptions {
        MergeOptions { key: MergeKey::Metadata(REP_TECH_GROUP_METADATA.to_string()), check_duplicate_parts: false }
    }
}

impl Module for TechnicalReplicateMergerModule {
    fn name(&self) -> &str { Self::NAME }

    fn version(&self) -> Version { super::builtin_version() }

    fn configure(&mut self, context: &StepConfigurationContext<'_>, parameters: &Parameters) -> Result<(), ConfigurationError> {
        self.core.configure(context, parameters)
    }

    fn input_ports(&self) -> InputPorts { self.core.inputs.clone() }

    fn output_ports(&self) -> OutputPorts { self.core.outputs.clone() }

    fn execute(&self, context: &mut TaskContext, status: &mut TaskStatus) -> TaskResult {
        let outcome = self.core.run(Self::NAME, &Self::merge_options(), context, status);
        finish(status, outcome)
    }
}
