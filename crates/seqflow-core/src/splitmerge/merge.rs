use std::collections::HashMap;

use indexmap::IndexMap;
use log::info;

use crate::data::{Data, DataFile, PortData};
use crate::errors::TaskError;
use crate::naming::to_valid_name;

use super::Merger;

/// Criterio de agrupación de las partes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MergeKey {
    #[default]
    DataName,
    /// Valor de un metadato; si falta se usa el nombre del dato.
    Metadata(String),
}

impl MergeKey {
    fn key_of(&self, data: &Data) -> String {
        match self {
            MergeKey::DataName => data.name().to_string(),
            MergeKey::Metadata(field) => data.metadata().get(field).unwrap_or(data.name()).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    pub key: MergeKey,
    pub check_duplicate_parts: bool,
}

impl Default for MergeOptions {
    fn default() -> Self { Self { key: MergeKey::DataName, check_duplicate_parts: true } }
}

/// Lector secuencial de los ficheros de un grupo, ya ordenados por parte.
#[derive(Debug, Clone)]
pub struct MergeSource {
    files: Vec<DataFile>,
    position: usize,
}

impl MergeSource {
    fn new(files: Vec<DataFile>) -> Self { Self { files, position: 0 } }

    pub fn len(&self) -> usize { self.files.len() }

    pub fn is_empty(&self) -> bool { self.files.is_empty() }
}

impl Iterator for MergeSource {
    type Item = DataFile;

    fn next(&mut self) -> Option<DataFile> {
        let file = self.files.get(self.position).cloned();
        self.position += 1;
        file
    }
}

struct Job {
    inputs: Vec<DataFile>,
    output: DataFile,
}

/// Agrupa `inputs` por clave y fusiona cada grupo en un dato de `output`.
/// Todas las validaciones (colisión de claves, partes duplicadas, rutas) se
/// hacen antes de la primera escritura. Devuelve el número de grupos.
pub fn merge_data(merger: &dyn Merger, inputs: &[Data], output: &mut PortData, options: &MergeOptions) -> Result<usize, TaskError> {
    let mut groups: IndexMap<String, Vec<&Data>> = IndexMap::new();
    for data in inputs {
        groups.entry(options.key.key_of(data)).or_default().push(data);
    }

    let mut names: HashMap<String, &str> = HashMap::new();
    for key in groups.keys() {
        let name = to_valid_name(key);
        if name.is_empty() {
            return Err(TaskError::Format(format!("merger key {key:?} has no valid characters")));
        }
        if let Some(first) = names.insert(name.clone(), key) {
            return Err(TaskError::MergerKeyCollision { first: first.to_string(), second: key.clone(), name });
        }
    }

    for (key, group) in groups.iter_mut() {
        group.sort_by_key(|d| d.part().map_or(-1, i64::from));
        if options.check_duplicate_parts {
            if let Some(pair) = group.windows(2).find(|w| w[0].part() == w[1].part()) {
                return Err(TaskError::DuplicatePart { key: key.clone(), part: pair[0].part().map_or(-1, i64::from) });
            }
        }
    }

    let mut jobs = Vec::new();
    for (key, group) in &groups {
        let Some(first) = group.first() else { continue };
        let merged = output.add_element(&to_valid_name(key), None)?;
        merged.metadata_mut().copy_from(first.metadata());
        for file_index in 0..first.data_file_count() {
            let inputs = group.iter().map(|d| d.data_file_at(file_index)).collect::<Result<Vec<_>, _>>()?;
            jobs.push(Job { inputs, output: merged.data_file_at(file_index)? });
        }
    }

    for job in jobs {
        let mut source = MergeSource::new(job.inputs);
        merger.merge(&mut source, &job.output)?;
    }
    info!("merged {} data into {} groups", inputs.len(), groups.len());
    Ok(groups.len())
}
