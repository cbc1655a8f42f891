//! FASTA de genoma: el checker registra los nombres y longitudes de las
//! secuencias para los checkers que dependen de él.

use std::collections::BTreeMap;
use std::io::BufRead;

use log::debug;
use seqflow_core::{CheckStore, Checker, Data, TaskError};

/// Clave del `CheckStore` con el mapa nombre -> longitud de las secuencias.
pub const GENOME_SEQUENCES_KEY: &str = "genome.sequences";

#[derive(Debug, Default, Clone)]
pub struct GenomeChecker;

impl GenomeChecker {
    /// Longitud de cada secuencia del genoma, en orden de aparición.
    pub fn sequence_lengths(reader: impl BufRead, file: &str) -> Result<Vec<(String, u64)>, String> {
        let mut sequences: Vec<(String, u64)> = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| e.to_string())?;
            let line = line.trim_end();
            if let Some(header) = line.strip_prefix('>') {
                let name = header.split_whitespace().next().unwrap_or("");
                if name.is_empty() {
                    return Err(format!("{file}:{}: sequence without name", n + 1));
                }
                if sequences.iter().any(|(s, _)| s == name) {
                    return Err(format!("{file}:{}: duplicated sequence name {name}", n + 1));
                }
                sequences.push((name.to_string(), 0));
            } else if !line.is_empty() {
                let Some((_, length)) = sequences.last_mut() else {
                    return Err(format!("{file}:{}: sequence data before the first header", n + 1));
                };
                if let Some(c) = line.chars().find(|c| !c.is_ascii_alphabetic() && *c != '-' && *c != '*') {
                    return Err(format!("{file}:{}: invalid character {c:?}", n + 1));
                }
                *length += line.len() as u64;
            }
        }
        if let Some((name, _)) = sequences.iter().find(|(_, length)| *length == 0) {
            return Err(format!("{file}: empty sequence {name}"));
        }
        if sequences.is_empty() {
            return Err(format!("{file}: no sequence found"));
        }
        Ok(sequences)
    }
}

impl Checker for GenomeChecker {
    fn name(&self) -> &str { "genome" }

    fn check(&self, data: &Data, store: &mut CheckStore) -> Result<(), TaskError> {
        let fail = |message: String| TaskError::CheckFailed { format: data.format().name().to_string(),
                                                              data: data.name().to_string(),
                                                              message };
        let file = data.data_file()?;
        let sequences = Self::sequence_lengths(file.open()?, &file.name()).map_err(fail)?;
        debug!("genome {}: {} sequences", data.name(), sequences.len());
        let map: BTreeMap<String, u64> = sequences.into_iter().collect();
        store.set(GENOME_SEQUENCES_KEY, map).map_err(|e| TaskError::Internal(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(text: &str) -> Result<Vec<(String, u64)>, String> { GenomeChecker::sequence_lengths(text.as_bytes(), "g.fa") }

    #[test]
    fn multi_line_sequences() {
        let found = lengths(">chr1 desc\nACGT\nAC\n\n>chrM\nN-*A\n").unwrap();
        assert_eq!(found, vec![("chr1".to_string(), 6), ("chrM".to_string(), 4)]);
    }

    #[test]
    fn malformed_genomes() {
        assert!(lengths("").unwrap_err().contains("no sequence"));
        assert!(lengths("ACGT\n>chr1\nA\n").unwrap_err().contains("before the first header"));
        assert!(lengths(">\nACGT\n").unwrap_err().contains("without name"));
        assert!(lengths(">chr1\n>chr2\nA\n").unwrap_err().contains("empty sequence chr1"));
        assert!(lengths(">chr1\nAC GT\n").unwrap_err().contains("invalid character"));
    }
}
