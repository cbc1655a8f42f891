//! Fusión por concatenación de bytes, común a los formatos de texto.

use std::io::{self, Write};

use seqflow_core::{DataFile, MergeSource, Merger, TaskError};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConcatMerger;

impl Merger for ConcatMerger {
    fn merge(&self, parts: &mut MergeSource, output: &DataFile) -> Result<(), TaskError> {
        let mut writer = output.create()?;
        for part in parts {
            let mut reader = part.open()?;
            io::copy(&mut reader, &mut writer)?;
        }
        writer.flush()?;
        Ok(())
    }
}
