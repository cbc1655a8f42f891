//! seqflow-adapters: formatos concretos y sus estrategias.
//!
//! Este crate provee:
//! - Los formatos FASTQ (lecturas), FASTA (genoma), SAM (alineamientos) y
//!   texto plano, con su checker, splitter y merger cuando aplica.
//! - `builtin_formats()`: registro con todos ellos.
//! - `builtin_modules()`: registro con los módulos genéricos del core.
//!
//! El core no conoce ningún formato; sólo ve `DataFormat` y los traits
//! `Checker`, `Splitter` y `Merger`.

pub mod concat;
pub mod fasta;
pub mod fastq;
pub mod formats;
pub mod sam;
pub mod text;

use std::sync::Arc;

use seqflow_core::modules::builtin_descriptors;
use seqflow_core::{ModuleDescriptor, ModuleRegistry, ModuleSource};

pub use formats::{builtin_formats, genome_fasta, mapper_results_sam, reads_fastq, text_lines};

/// Fuente con los módulos genéricos del core.
pub struct BuiltinModules;

impl ModuleSource for BuiltinModules {
    fn name(&self) -> &str { "builtin" }

    fn descriptors(&self) -> Vec<ModuleDescriptor> { builtin_descriptors() }
}

pub fn builtin_modules() -> ModuleRegistry {
    let registry = ModuleRegistry::new();
    registry.add_source(Arc::new(BuiltinModules));
    registry
}
