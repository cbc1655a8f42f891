//! Descubrimiento de datos en disco a partir de `(step, puerto, formato)`.
//!
//! No hay catálogo central: se enumeran los ficheros que casan con el glob
//! del puerto, se parsean y se agrupan por identidad de dato.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use super::{globs, FileNaming};
use crate::data::{Data, DataFile};
use crate::errors::TaskError;
use crate::format::{Compression, DataFormat, DataFormatRegistry};

/// Devuelve los datos producidos por `step_id.port_name` en `directory`,
/// ordenados por nombre y parte. Se aceptan todas las extensiones del
/// formato. Los ficheros de un dato multi-fichero quedan ordenados por
/// índice, que debe ser contiguo desde 0 y no repetirse (p. ej. con otra
/// compresión).
pub fn discover_data(directory: &Path,
                     step_id: &str,
                     port_name: &str,
                     format: &DataFormat,
                     compressions: &[Compression],
                     registry: &DataFormatRegistry)
                     -> Result<Vec<Data>, TaskError> {
    let patterns: Vec<_> = compressions.iter().flat_map(|c| globs(step_id, port_name, format, *c)).collect();

    let mut groups: IndexMap<(String, Option<u32>), BTreeMap<u32, DataFile>> = IndexMap::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let filename = entry.file_name();
        let Some(filename) = filename.to_str() else { continue };
        if !patterns.iter().any(|g| g.matches(filename)) {
            continue;
        }
        let naming = FileNaming::parse(filename, registry)?;
        if naming.format() != format {
            continue;
        }
        let index = naming.file_index().unwrap_or(0);
        let files = groups.entry((naming.data_name().to_string(), naming.part())).or_default();
        if let Some(previous) = files.insert(index, DataFile::new(entry.path())) {
            return Err(TaskError::Format(format!("{} and {filename} are the same file of data {}",
                                                 previous.name(),
                                                 naming.data_name())));
        }
    }

    groups.sort_keys();
    let mut out = Vec::with_capacity(groups.len());
    for ((name, part), files) in groups {
        if let Some(missing) = (0u32..).zip(files.keys()).find_map(|(expected, &found)| (expected != found).then_some(expected)) {
            return Err(TaskError::Format(format!("data {name} (part {part:?}) of {step_id}.{port_name} lacks file {missing}")));
        }
        debug!("discovered {step_id}.{port_name}: {name} part={part:?} files={}", files.len());
        out.push(Data::from_files(&name, format, part, files.into_values().collect()));
    }
    Ok(out)
}
