//! seqflow
//!
//! Librería fachada del motor de pipelines:
//! - Re-exporta `seqflow_core` (contratos, coordinadores, workflow y runner).
//! - Expone `adapters` con los formatos FASTQ, FASTA, SAM y texto.
//!
//! Los binarios y otros crates pueden depender sólo de este.

pub use seqflow_adapters as adapters;
pub use seqflow_adapters::{builtin_formats, builtin_modules};
pub use seqflow_core::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registries_are_consistent() {
        let formats = builtin_formats().unwrap();
        let modules = builtin_modules();
        assert!(formats.by_name(adapters::formats::READS_FASTQ).unwrap().has_splitter());
        assert_eq!(modules.names().len(), 5);
    }
}
