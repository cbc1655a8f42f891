//! Formatos incluidos y su registro.

use seqflow_core::{ConfigurationError, DataFormat, DataFormatRegistry};

use crate::concat::ConcatMerger;
use crate::fasta::GenomeChecker;
use crate::fastq::{FastqChecker, FastqSplitter};
use crate::sam::SamChecker;
use crate::text::TextLineSplitter;

pub const READS_FASTQ: &str = "reads_fastq";
pub const GENOME_FASTA: &str = "genome_fasta";
pub const MAPPER_RESULTS_SAM: &str = "mapper_results_sam";
pub const TEXT: &str = "text";

/// Lecturas FASTQ; dos ficheros para lecturas pareadas.
pub fn reads_fastq() -> Result<DataFormat, ConfigurationError> {
    DataFormat::builder(READS_FASTQ, "reads", ".fq").alias("reads")
                                                    .extra_extension(".fastq")
                                                    .description("FASTQ reads")
                                                    .max_files_count(2)
                                                    .checker(|| Box::new(FastqChecker))
                                                    .splitter(|| Box::new(FastqSplitter::default()))
                                                    .merger(|| Box::new(ConcatMerger))
                                                    .build()
}

pub fn genome_fasta() -> Result<DataFormat, ConfigurationError> {
    DataFormat::builder(GENOME_FASTA, "genome", ".fasta").alias("genome")
                                                         .extra_extension(".fa")
                                                         .description("Reference genome in FASTA format")
                                                         .one_file_per_analysis(true)
                                                         .checker(|| Box::new(GenomeChecker))
                                                         .build()
}

pub fn mapper_results_sam() -> Result<DataFormat, ConfigurationError> {
    DataFormat::builder(MAPPER_RESULTS_SAM, "mapper", ".sam").alias("sam")
                                                             .description("Alignments in SAM format")
                                                             .checker(|| Box::new(SamChecker))
                                                             .build()
}

pub fn text_lines() -> Result<DataFormat, ConfigurationError> {
    DataFormat::builder(TEXT, "text", ".txt").description("Plain text")
                                             .splitter(|| Box::new(TextLineSplitter::default()))
                                             .merger(|| Box::new(ConcatMerger))
                                             .build()
}

/// Registro con todos los formatos del crate.
pub fn builtin_formats() -> Result<DataFormatRegistry, ConfigurationError> {
    let mut registry = DataFormatRegistry::new();
    for format in [reads_fastq()?, genome_fasta()?, mapper_results_sam()?, text_lines()?] {
        registry.register(format)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookups() {
        let registry = builtin_formats().unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.by_name_or_alias("reads").unwrap().name(), READS_FASTQ);
        assert_eq!(registry.by_prefix_and_extension("reads", ".fastq").unwrap().name(), READS_FASTQ);
        assert_eq!(registry.by_prefix_and_extension("genome", ".fa").unwrap().name(), GENOME_FASTA);
        assert!(registry.by_name(MAPPER_RESULTS_SAM).unwrap().has_checker());
        assert!(!registry.by_name(MAPPER_RESULTS_SAM).unwrap().has_splitter());
        assert!(registry.by_name(READS_FASTQ).unwrap().is_multi_file());
    }
}
