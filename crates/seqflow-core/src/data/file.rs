use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::format::Compression;

/// Fichero físico de un dato.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    pub fn name(&self) -> String {
        self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }

    pub fn compression(&self) -> Compression { Compression::from_filename(&self.name()) }

    pub fn exists(&self) -> bool { self.path.is_file() }

    pub fn open(&self) -> io::Result<BufReader<File>> { Ok(BufReader::new(File::open(&self.path)?)) }

    /// Crea (o trunca) el fichero, creando los directorios que falten.
    pub fn create(&self) -> io::Result<BufWriter<File>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(BufWriter::new(File::create(&self.path)?))
    }
}

impl std::fmt::Display for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.path.display()) }
}
