//! FASTQ: registros de 4 líneas (`@id`, secuencia, `+`, calidades).

use std::fs::File;
use std::io::{BufRead, BufWriter, Lines, Write};

use log::debug;
use seqflow_core::params::checks;
use seqflow_core::{CheckStore, Checker, ConfigurationError, Data, DataFile, Parameters, SplitTarget, Splitter, TaskError};

pub const MAX_ENTRIES_PARAMETER: &str = "max.entries";
const DEFAULT_MAX_ENTRIES: usize = 1_000_000;

/// Un registro FASTQ tal como aparece en disco.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub header: String,
    pub sequence: String,
    pub separator: String,
    pub quality: String,
}

impl FastqRecord {
    pub fn id(&self) -> &str { self.header.trim_start_matches('@').split_whitespace().next().unwrap_or("") }

    fn validate(&self) -> Result<(), String> {
        if !self.header.starts_with('@') {
            return Err(format!("invalid header line {:?}", self.header));
        }
        if !self.separator.starts_with('+') {
            return Err(format!("invalid separator line for {}", self.id()));
        }
        if self.sequence.is_empty() {
            return Err(format!("empty sequence for {}", self.id()));
        }
        if self.sequence.len() != self.quality.len() {
            return Err(format!("sequence and quality lengths differ for {}", self.id()));
        }
        Ok(())
    }

    fn write_to(&self, w: &mut impl Write) -> std::io::Result<()> {
        writeln!(w, "{}\n{}\n{}\n{}", self.header, self.sequence, self.separator, self.quality)
    }
}

/// Iterador de registros sobre las líneas de un lector.
pub struct FastqReader<R: BufRead> {
    lines: Lines<R>,
    file: String,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R, file: &str) -> Self { Self { lines: reader.lines(), file: file.to_string() } }

    fn truncated(&self) -> TaskError {
        TaskError::Format(format!("{}: truncated FASTQ record", self.file))
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<FastqRecord, TaskError>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = loop {
            match self.lines.next()? {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => break line,
                Err(e) => return Some(Err(e.into())),
            }
        };
        let mut rest = Vec::with_capacity(3);
        for _ in 0..3 {
            match self.lines.next() {
                Some(Ok(line)) => rest.push(line),
                Some(Err(e)) => return Some(Err(e.into())),
                None => return Some(Err(self.truncated())),
            }
        }
        let quality = rest.pop().unwrap_or_default();
        let separator = rest.pop().unwrap_or_default();
        let sequence = rest.pop().unwrap_or_default();
        Some(Ok(FastqRecord { header, sequence, separator, quality }))
    }
}

fn records(file: &DataFile) -> Result<FastqReader<impl BufRead>, TaskError> {
    Ok(FastqReader::new(file.open()?, &file.name()))
}

/// Parte un FASTQ cada `max.entries` registros.
#[derive(Debug, Clone)]
pub struct FastqSplitter {
    max_entries: usize,
}

impl Default for FastqSplitter {
    fn default() -> Self { Self { max_entries: DEFAULT_MAX_ENTRIES } }
}

impl FastqSplitter {
    pub fn new(max_entries: usize) -> Self { Self { max_entries: max_entries.max(1) } }

    pub fn max_entries(&self) -> usize { self.max_entries }
}

impl Splitter for FastqSplitter {
    fn configure(&mut self, step_id: &str, parameters: &Parameters) -> Result<(), ConfigurationError> {
        for parameter in parameters {
            match parameter.name() {
                MAX_ENTRIES_PARAMETER => {
                    self.max_entries = parameter.int_value_greater_or_equals_to(1).map_err(|e| e.in_step(step_id))? as usize;
                }
                _ => return Err(checks::unknown_parameter(step_id, parameter)),
            }
        }
        Ok(())
    }

    fn split(&self, input: &DataFile, parts: &mut SplitTarget<'_>) -> Result<(), TaskError> {
        let mut writer: Option<BufWriter<File>> = None;
        for (i, record) in records(input)?.enumerate() {
            let record = record?;
            if i % self.max_entries == 0 {
                if let Some(mut previous) = writer.take() {
                    previous.flush()?;
                }
                writer = Some(parts.next_part()?.create()?);
            }
            if let Some(w) = writer.as_mut() {
                record.write_to(w)?;
            }
        }
        if let Some(mut last) = writer {
            last.flush()?;
        }
        debug!("{}: {} parts", input, parts.count());
        Ok(())
    }
}

/// Valida la estructura de cada registro de todos los ficheros del dato.
#[derive(Debug, Default, Clone)]
pub struct FastqChecker;

impl Checker for FastqChecker {
    fn name(&self) -> &str { "fastq" }

    fn check(&self, data: &Data, _store: &mut CheckStore) -> Result<(), TaskError> {
        for index in 0..data.data_file_count() {
            let file = data.data_file_at(index)?;
            let mut count = 0usize;
            for record in records(&file)? {
                let record = record.map_err(|e| failed(data, e.to_string()))?;
                record.validate().map_err(|msg| failed(data, format!("{}: {msg}", file.name())))?;
                count += 1;
            }
            if count == 0 {
                return Err(failed(data, format!("{} contains no reads", file.name())));
            }
            debug!("{}: {count} reads", file.name());
        }
        Ok(())
    }
}

fn failed(data: &Data, message: String) -> TaskError {
    TaskError::CheckFailed { format: data.format().name().to_string(), data: data.name().to_string(), message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Vec<Result<FastqRecord, TaskError>> { FastqReader::new(text.as_bytes(), "test.fq").collect() }

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let records = read("@r1 extra\nACGT\n+\nIIII\n\n@r2\nAC\n+r2\nII\n");
        assert_eq!(records.len(), 2);
        let r1 = records[0].as_ref().unwrap();
        assert_eq!(r1.id(), "r1");
        assert_eq!(r1.sequence, "ACGT");
        assert!(records.iter().all(|r| r.as_ref().unwrap().validate().is_ok()));
    }

    #[test]
    fn truncated_record_is_an_error() {
        let records = read("@r1\nACGT\n+\n");
        assert!(matches!(records.as_slice(), [Err(TaskError::Format(msg))] if msg.contains("truncated")));
    }

    #[test]
    fn validation_rules() {
        let record = |h: &str, s: &str, sep: &str, q: &str| FastqRecord { header: h.into(),
                                                                          sequence: s.into(),
                                                                          separator: sep.into(),
                                                                          quality: q.into() };
        assert!(record("r1", "AC", "+", "II").validate().is_err());
        assert!(record("@r1", "AC", "-", "II").validate().is_err());
        assert!(record("@r1", "", "+", "").validate().is_err());
        assert!(record("@r1", "ACG", "+", "II").validate().unwrap_err().contains("lengths differ"));
    }

    #[test]
    fn splitter_defaults() {
        assert_eq!(FastqSplitter::default().max_entries(), DEFAULT_MAX_ENTRIES);
        assert_eq!(FastqSplitter::new(0).max_entries(), 1);
    }
}
