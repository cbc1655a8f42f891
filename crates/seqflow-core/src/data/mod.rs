//! Datos lógicos que fluyen por los puertos.
//!
//! Un `Data` es una instancia de un `DataFormat` (una muestra, un genoma...)
//! que puede ocupar varios ficheros y estar partida en partes. Los datos de
//! salida calculan la ruta de cada fichero con el codec de nombres, de modo
//! que el step siguiente los reencuentra sin catálogo.

mod file;
mod metadata;
mod port_data;

pub use file::DataFile;
pub use metadata::DataMetadata;
pub use port_data::{OutputLocation, PortData};

use serde_json::json;

use crate::errors::TaskError;
use crate::format::DataFormat;
use crate::naming::FileNaming;

#[derive(Debug, Clone)]
pub struct Data {
    name: String,
    format: DataFormat,
    part: Option<u32>,
    metadata: DataMetadata,
    files: Vec<DataFile>,
    location: Option<OutputLocation>,
}

impl Data {
    /// Dato de entrada con ficheros ya existentes (en orden de índice).
    pub fn from_files(name: &str, format: &DataFormat, part: Option<u32>, files: Vec<DataFile>) -> Self {
        Self { name: name.to_string(),
               format: format.clone(),
               part,
               metadata: DataMetadata::default(),
               files,
               location: None }
    }

    /// Dato de salida: sus ficheros se nombran a partir de `location`.
    pub(crate) fn output(location: &OutputLocation, name: &str, format: &DataFormat, part: Option<u32>) -> Self {
        Self { name: name.to_string(),
               format: format.clone(),
               part,
               metadata: DataMetadata::default(),
               files: Vec::new(),
               location: Some(location.clone()) }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn format(&self) -> &DataFormat { &self.format }

    /// `None` mientras el dato no haya sido partido.
    pub fn part(&self) -> Option<u32> { self.part }

    pub fn is_split(&self) -> bool { self.part.is_some() }

    pub fn metadata(&self) -> &DataMetadata { &self.metadata }

    pub fn metadata_mut(&mut self) -> &mut DataMetadata { &mut self.metadata }

    pub fn is_output(&self) -> bool { self.location.is_some() }

    /// Nombre descompuesto del fichero `file_index` de un dato de salida.
    pub fn file_naming(&self, file_index: usize) -> Result<FileNaming, TaskError> {
        let location = self.location
                           .as_ref()
                           .ok_or_else(|| TaskError::Internal(format!("{} is not an output data", self.name)))?;
        Ok(FileNaming::from_data(&location.step_id, &location.port_name, self, file_index, location.compression)?)
    }

    /// Fichero único de un formato mono-fichero.
    pub fn data_file(&self) -> Result<DataFile, TaskError> {
        if self.format.is_multi_file() {
            return Err(TaskError::Format(format!("format {} has several files per data, an index is required",
                                                 self.format.name())));
        }
        self.data_file_at(0)
    }

    pub fn data_file_at(&self, file_index: usize) -> Result<DataFile, TaskError> {
        if file_index >= self.format.max_files_count() {
            return Err(TaskError::Format(format!("file index {file_index} out of range for format {}",
                                                 self.format.name())));
        }
        match &self.location {
            Some(location) => Ok(DataFile::new(self.file_naming(file_index)?.file(&location.directory))),
            None => self.files
                        .get(file_index)
                        .cloned()
                        .ok_or_else(|| TaskError::Format(format!("data {} has no file {file_index}", self.name))),
        }
    }

    /// Para datos de entrada, los ficheros conocidos. Para datos de salida
    /// multi-fichero, los ficheros ya escritos en disco (contiguos desde 0).
    pub fn data_file_count(&self) -> usize {
        match &self.location {
            None => self.files.len(),
            Some(_) if !self.format.is_multi_file() => 1,
            Some(_) => (0..self.format.max_files_count()).take_while(|i| self.data_file_at(*i).map(|f| f.exists()).unwrap_or(false))
                                                         .count(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let files: Vec<String> = (0..self.data_file_count()).filter_map(|i| self.data_file_at(i).ok())
                                                            .map(|f| f.path().display().to_string())
                                                            .collect();
        json!({
            "name": self.name,
            "format": self.format.name(),
            "part": self.part,
            "metadata": self.metadata,
            "files": files,
        })
    }
}
