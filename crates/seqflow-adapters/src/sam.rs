//! SAM: el checker verifica que cabecera y alineamientos sólo citan
//! secuencias del genoma ya validado.

use std::collections::BTreeMap;
use std::io::BufRead;

use log::{debug, warn};
use seqflow_core::{CheckStore, Checker, Data, TaskError};

use crate::fasta::GENOME_SEQUENCES_KEY;
use crate::formats::GENOME_FASTA;

#[derive(Debug, Default, Clone)]
pub struct SamChecker;

impl Checker for SamChecker {
    fn name(&self) -> &str { "sam" }

    fn checkers_required(&self) -> Vec<String> { vec![GENOME_FASTA.to_string()] }

    fn check(&self, data: &Data, store: &mut CheckStore) -> Result<(), TaskError> {
        let fail = |message: String| TaskError::CheckFailed { format: data.format().name().to_string(),
                                                              data: data.name().to_string(),
                                                              message };
        let genome: Option<BTreeMap<String, u64>> = match store.get_as(GENOME_SEQUENCES_KEY) {
            Some(parsed) => Some(parsed.map_err(|e| TaskError::Internal(e.to_string()))?),
            None => {
                warn!("no genome checked before {}, sequence names are not verified", data.name());
                None
            }
        };
        let known = |name: &str| genome.as_ref().map_or(true, |g| g.contains_key(name));

        let file = data.data_file()?;
        let mut alignments = 0usize;
        for (n, line) in file.open()?.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            if let Some(header) = line.strip_prefix("@SQ") {
                let name = header.split('\t').find_map(|f| f.strip_prefix("SN:"));
                match name {
                    Some(name) if known(name) => {}
                    Some(name) => return Err(fail(format!("line {}: unknown reference sequence {name}", n + 1))),
                    None => return Err(fail(format!("line {}: @SQ without SN field", n + 1))),
                }
                continue;
            }
            if line.starts_with('@') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 11 {
                return Err(fail(format!("line {}: expected 11 fields, found {}", n + 1, fields.len())));
            }
            let reference = fields[2];
            if reference != "*" && !known(reference) {
                return Err(fail(format!("line {}: read {} aligned on unknown sequence {reference}", n + 1, fields[0])));
            }
            if fields[3].parse::<u64>().is_err() {
                return Err(fail(format!("line {}: invalid position {:?}", n + 1, fields[3])));
            }
            alignments += 1;
        }
        debug!("{}: {alignments} alignments", data.name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::formats::mapper_results_sam;
    use seqflow_core::DataFile;

    fn check(content: &str, store: &mut CheckStore) -> Result<(), TaskError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.sam");
        fs::write(&path, content).unwrap();
        let data = Data::from_files("a", &mapper_results_sam().unwrap(), None, vec![DataFile::new(path)]);
        SamChecker.check(&data, store)
    }

    #[test]
    fn record_structure() {
        let mut store = CheckStore::new();
        store.set(GENOME_SEQUENCES_KEY, BTreeMap::from([("chr1".to_string(), 100u64)])).unwrap();
        assert!(check("r1\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII\n", &mut store).is_ok());
        assert!(check("r1\t0\tchr1\t5\n", &mut store).is_err());
        assert!(check("r1\t0\tchr1\tx\t60\t4M\t*\t0\t0\tACGT\tIIII\n", &mut store).is_err());
        assert!(check("@SQ\tLN:10\n", &mut store).is_err());
        assert!(check("@SQ\tSN:chr9\tLN:10\n", &mut store).is_err());
    }

    #[test]
    fn without_genome_names_are_not_verified() {
        let mut store = CheckStore::new();
        assert!(check("@SQ\tSN:chr9\tLN:10\nr1\t0\tchr9\t1\t60\t4M\t*\t0\t0\tACGT\tIIII\n", &mut store).is_ok());
    }
}
