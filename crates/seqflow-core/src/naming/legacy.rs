//! Nombre de compatibilidad con el esquema de nombres anterior:
//! `<prefijoHeredado>_<muestra><letraDeFichero><extensión>`.
//!
//! La tabla de prefijos está congelada; los step ids nuevos no se añaden.

use super::FileNaming;

const LEGACY_PREFIXES: &[(&str, &str)] = &[("filterreads", "filtered_reads"),
                                           ("mapreads", "mapper_results"),
                                           ("filtersam", "filtered_mapper_results"),
                                           ("filterandmap", "filtered_mapper_results")];

fn legacy_prefix(step_id: &str) -> &str {
    LEGACY_PREFIXES.iter()
                   .find(|(id, _)| *id == step_id)
                   .map(|(_, prefix)| *prefix)
                   .unwrap_or(step_id)
}

/// 0 -> `a`, 1 -> `b`... A partir de 26 se usa el número.
fn file_index_letter(index: u32) -> String {
    if index < 26 {
        char::from(b'a' + index as u8).to_string()
    } else {
        index.to_string()
    }
}

pub(super) fn compatibility_filename(naming: &FileNaming) -> String {
    let mut out = format!("{}_{}", legacy_prefix(naming.step_id()), naming.sample_number().unwrap_or(1));
    if let Some(index) = naming.file_index() {
        out.push_str(&file_index_letter(index));
    }
    out.push_str(naming.format().default_extension());
    out.push_str(naming.compression().extension());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Compression;
    use crate::naming::tests::registry;

    #[test]
    fn known_step_ids_are_remapped() {
        let reg = registry();
        let reads = reg.by_name("reads_fastq").unwrap();
        let n = FileNaming::new("filterreads", "output", reads, "s1").unwrap()
                                                                      .with_file_index(Some(1))
                                                                      .with_sample_number(Some(4))
                                                                      .with_compression(Compression::Gzip);
        assert_eq!(n.compatibility_filename(), "filtered_reads_4b.fq.gz");

        let n = FileNaming::new("filtersam", "output", reads, "s1").unwrap().with_file_index(Some(0));
        assert_eq!(n.compatibility_filename(), "filtered_mapper_results_1a.fq");
    }

    #[test]
    fn unknown_step_ids_are_kept() {
        let reg = registry();
        let genome = reg.by_name("genome_fasta").unwrap();
        let n = FileNaming::new("expression", "output", genome, "g").unwrap().with_sample_number(Some(2));
        assert_eq!(n.compatibility_filename(), "expression_2.fasta");
    }
}
