use log::info;

use crate::data::{Data, DataFile, DataMetadata, PortData};
use crate::errors::TaskError;

use super::Splitter;

/// Productor de partes bajo demanda para una posición de fichero.
///
/// Cada llamada a `next_part` devuelve el fichero de la parte siguiente,
/// creando el dato de salida si todavía no existe. En formatos multi-fichero
/// cada posición lleva su propio contador, de modo que los ficheros 0 y 1 de
/// un mismo dato generan las mismas partes.
pub struct SplitTarget<'a> {
    output: &'a mut PortData,
    name: &'a str,
    metadata: &'a DataMetadata,
    file_index: usize,
    count: u32,
}

impl<'a> SplitTarget<'a> {
    fn new(output: &'a mut PortData, source: &'a Data, file_index: usize) -> Self {
        Self { output, name: source.name(), metadata: source.metadata(), file_index, count: 0 }
    }

    pub fn next_part(&mut self) -> Result<DataFile, TaskError> {
        let part = self.count;
        let existing = self.output.elements().iter().position(|d| d.name() == self.name && d.part() == Some(part));
        let data = match existing {
            Some(i) => &mut self.output.elements_mut()[i],
            None => {
                let data = self.output.add_element(self.name, Some(part))?;
                data.metadata_mut().copy_from(self.metadata);
                data
            }
        };
        let file = data.data_file_at(self.file_index)?;
        self.count += 1;
        Ok(file)
    }

    /// Partes producidas hasta ahora para esta posición.
    pub fn count(&self) -> u32 { self.count }
}

/// Parte `input` en `output` con `splitter`. Devuelve el número de partes.
pub fn split_data(splitter: &dyn Splitter, input: &Data, output: &mut PortData) -> Result<u32, TaskError> {
    if let Some(part) = input.part() {
        return Err(TaskError::AlreadySplit { data: input.name().to_string(), part });
    }
    if !output.is_list() {
        return Err(TaskError::Format(format!("split output port {} must be a list port", output.port_name())));
    }
    let mut parts = 0;
    for file_index in 0..input.data_file_count() {
        let file = input.data_file_at(file_index)?;
        let mut target = SplitTarget::new(output, input, file_index);
        splitter.split(&file, &mut target)?;
        parts = parts.max(target.count());
    }
    info!("{} split into {} parts", input.name(), parts);
    Ok(parts)
}
