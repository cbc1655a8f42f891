//! Texto plano: partición por número de líneas.

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};

use seqflow_core::params::checks;
use seqflow_core::{ConfigurationError, DataFile, Parameters, SplitTarget, Splitter, TaskError};

pub const MAX_LINES_PARAMETER: &str = "max.lines";
const DEFAULT_MAX_LINES: usize = 10_000;

#[derive(Debug, Clone)]
pub struct TextLineSplitter {
    max_lines: usize,
}

impl Default for TextLineSplitter {
    fn default() -> Self { Self { max_lines: DEFAULT_MAX_LINES } }
}

impl TextLineSplitter {
    pub fn new(max_lines: usize) -> Self { Self { max_lines: max_lines.max(1) } }
}

impl Splitter for TextLineSplitter {
    fn configure(&mut self, step_id: &str, parameters: &Parameters) -> Result<(), ConfigurationError> {
        for parameter in parameters {
            match parameter.name() {
                MAX_LINES_PARAMETER => {
                    self.max_lines = parameter.int_value_greater_or_equals_to(1).map_err(|e| e.in_step(step_id))? as usize;
                }
                _ => return Err(checks::unknown_parameter(step_id, parameter)),
            }
        }
        Ok(())
    }

    fn split(&self, input: &DataFile, parts: &mut SplitTarget<'_>) -> Result<(), TaskError> {
        let mut writer: Option<BufWriter<File>> = None;
        for (i, line) in input.open()?.lines().enumerate() {
            let line = line?;
            if i % self.max_lines == 0 {
                if let Some(mut previous) = writer.take() {
                    previous.flush()?;
                }
                writer = Some(parts.next_part()?.create()?);
            }
            if let Some(w) = writer.as_mut() {
                writeln!(w, "{line}")?;
            }
        }
        if let Some(mut last) = writer {
            last.flush()?;
        }
        Ok(())
    }
}
