//! Partición de un dato en partes numeradas y fusión de partes.
//!
//! La estrategia concreta la aporta el formato (`Splitter`/`Merger`); el
//! coordinador gestiona la numeración de partes, los metadatos y las
//! comprobaciones previas a cualquier E/S.

mod merge;
mod split;

pub use merge::{merge_data, MergeKey, MergeOptions, MergeSource};
pub use split::{split_data, SplitTarget};

use crate::data::DataFile;
use crate::errors::{ConfigurationError, TaskError};
use crate::params::Parameters;

pub trait Splitter: Send + Sync {
    fn configure(&mut self, _step_id: &str, _parameters: &Parameters) -> Result<(), ConfigurationError> { Ok(()) }

    /// Reparte `input` pidiendo a `parts` un fichero nuevo por cada parte.
    /// El número de partes lo decide la estrategia.
    fn split(&self, input: &DataFile, parts: &mut SplitTarget<'_>) -> Result<(), TaskError>;
}

pub trait Merger: Send + Sync {
    fn configure(&mut self, _step_id: &str, _parameters: &Parameters) -> Result<(), ConfigurationError> { Ok(()) }

    /// Escribe en `output` el contenido de las partes en orden.
    fn merge(&self, parts: &mut MergeSource, output: &DataFile) -> Result<(), TaskError>;
}
