//! seqflow-core: contratos y coordinadores del motor de pipelines.
pub mod checker;
pub mod config;
pub mod constants;
pub mod data;
pub mod errors;
pub mod executor;
pub mod format;
pub mod hashing;
pub mod module;
pub mod modules;
pub mod naming;
pub mod params;
pub mod port;
pub mod splitmerge;
pub mod step;
pub mod task;
pub mod workflow;

pub use checker::{CheckStore, Checker, CheckerConfiguration, CheckerCoordinator};
pub use config::EngineConfig;
pub use data::{Data, DataFile, DataMetadata, PortData};
pub use errors::{ConfigurationError, NamingError, ParameterError, TaskError, WorkflowError};
pub use executor::LocalRunner;
pub use format::{Compression, DataFormat, DataFormatRegistry};
pub use module::{Backend, Module, ModuleDescriptor, ModuleRegistry, ModuleSource, ParallelizationMode, StepConfigurationContext};
pub use naming::{discover_data, FileNaming};
pub use params::{Parameter, Parameters, Version};
pub use port::{InputPort, InputPorts, OutputPort, OutputPorts, Port};
pub use splitmerge::{merge_data, split_data, MergeKey, MergeOptions, MergeSource, Merger, SplitTarget, Splitter};
pub use step::{Step, StepState, StepType};
pub use task::{RemoteExecutor, RemoteJob, RemoteOutcome, RemoteTask, StepResult, TaskContext, TaskResult, TaskStatus};
pub use workflow::{Link, StepSpec, Workflow, WorkflowBuilder};
