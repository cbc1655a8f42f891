//! Codec biyectivo entre la identidad de un fichero y su nombre en disco.
//!
//! Gramática:
//!
//! ```text
//! <stepId>_<portName>_<formatPrefix>_<dataName>[_file<N>][_part<N>].<ext>[.<compressionExt>]
//! ```
//!
//! Los steps aguas abajo localizan sus entradas únicamente parseando nombres,
//! así que `FileNaming::filename` y `FileNaming::parse` deben ser inversas
//! exactas para cualquier tupla válida. Los nombres de datos no pueden
//! contener puntos: un punto dentro del stem se interpreta como separador de
//! extensión y el nombre queda rechazado.

mod discovery;
mod legacy;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::{EXTENSION_SEPARATOR, FIELD_SEPARATOR, FILE_INDEX_TOKEN, MIN_STEM_FIELDS, PART_TOKEN};
use crate::data::Data;
use crate::errors::NamingError;
use crate::format::{Compression, DataFormat, DataFormatRegistry};

pub use discovery::discover_data;

/// Nombre válido: no vacío y sólo letras/dígitos ASCII.
pub fn is_name_valid(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Elimina todo carácter no alfanumérico ASCII.
pub fn to_valid_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Identidad descompuesta de un fichero físico.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileNaming {
    step_id: String,
    port_name: String,
    #[serde(serialize_with = "serialize_format")]
    format: DataFormat,
    data_name: String,
    file_index: Option<u32>,
    part: Option<u32>,
    compression: Compression,
    /// Sólo para el nombre de compatibilidad; la gramática no lo codifica.
    #[serde(skip)]
    sample_number: Option<u32>,
}

fn serialize_format<S: serde::Serializer>(format: &DataFormat, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(format.name())
}

impl FileNaming {
    pub fn new(step_id: &str, port_name: &str, format: &DataFormat, data_name: &str) -> Result<Self, NamingError> {
        for (what, value) in [("step id", step_id), ("port name", port_name), ("data name", data_name)] {
            if !is_name_valid(value) {
                return Err(NamingError::new(value, format!("invalid {what}")));
            }
        }
        Ok(Self { step_id: step_id.to_string(),
                  port_name: port_name.to_string(),
                  format: format.clone(),
                  data_name: data_name.to_string(),
                  file_index: None,
                  part: None,
                  compression: Compression::None,
                  sample_number: None })
    }

    pub fn with_file_index(mut self, file_index: Option<u32>) -> Self {
        self.file_index = file_index;
        self
    }

    pub fn with_part(mut self, part: Option<u32>) -> Self {
        self.part = part;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_sample_number(mut self, sample_number: Option<u32>) -> Self {
        self.sample_number = sample_number;
        self
    }

    /// Nombre del fichero `file_index` de `data` escrito por
    /// `step_id.port_name`. El índice se ignora en formatos mono-fichero.
    pub fn from_data(step_id: &str,
                     port_name: &str,
                     data: &Data,
                     file_index: usize,
                     compression: Compression)
                     -> Result<Self, NamingError> {
        let index = if data.format().is_multi_file() { Some(file_index as u32) } else { None };
        let naming = Self::new(step_id, port_name, data.format(), data.name())?.with_file_index(index)
                                                                              .with_part(data.part())
                                                                              .with_compression(compression);
        naming.validate()?;
        Ok(naming)
    }

    pub fn step_id(&self) -> &str { &self.step_id }

    pub fn port_name(&self) -> &str { &self.port_name }

    pub fn format(&self) -> &DataFormat { &self.format }

    pub fn data_name(&self) -> &str { &self.data_name }

    pub fn file_index(&self) -> Option<u32> { self.file_index }

    pub fn part(&self) -> Option<u32> { self.part }

    pub fn compression(&self) -> Compression { self.compression }

    pub fn sample_number(&self) -> Option<u32> { self.sample_number }

    /// Comprueba las reglas del índice de fichero frente al formato.
    pub fn validate(&self) -> Result<(), NamingError> {
        check_file_index(&self.format, self.file_index).map_err(|msg| NamingError::new(self.filename(), msg))
    }

    /// Parte común a todos los ficheros de un `(step, puerto, formato)`.
    pub fn prefix(&self) -> String {
        glob_prefix(&self.step_id, &self.port_name, &self.format)
    }

    /// Extensión de formato seguida de la de compresión.
    pub fn suffix(&self) -> String {
        format!("{}{}", self.format.default_extension(), self.compression.extension())
    }

    pub fn filename(&self) -> String {
        let mut out = format!("{}{}", self.prefix(), self.data_name);
        if let Some(index) = self.file_index {
            out.push(FIELD_SEPARATOR);
            out.push_str(FILE_INDEX_TOKEN);
            out.push_str(&index.to_string());
        }
        if let Some(part) = self.part {
            out.push(FIELD_SEPARATOR);
            out.push_str(PART_TOKEN);
            out.push_str(&part.to_string());
        }
        out.push_str(&self.suffix());
        out
    }

    pub fn glob(&self) -> Glob {
        glob(&self.step_id, &self.port_name, &self.format, self.compression)
    }

    pub fn file(&self, directory: &Path) -> PathBuf {
        directory.join(self.filename())
    }

    /// Nombre heredado, de sentido único (no se parsea de vuelta).
    pub fn compatibility_filename(&self) -> String {
        legacy::compatibility_filename(self)
    }

    /// Misma identidad de dato: step, puerto, formato, nombre y parte.
    /// El índice de fichero y la compresión no forman parte de la identidad.
    pub fn data_equals(&self, other: &FileNaming) -> bool {
        self.step_id == other.step_id
        && self.port_name == other.port_name
        && self.format == other.format
        && self.data_name == other.data_name
        && self.part == other.part
    }

    pub fn parse(filename: &str, registry: &DataFormatRegistry) -> Result<FileNaming, NamingError> {
        let fail = |msg: &str| NamingError::new(filename, msg);

        let pieces: Vec<&str> = filename.split(EXTENSION_SEPARATOR).collect();
        if pieces.len() != 2 && pieces.len() != 3 {
            return Err(fail("expected a format extension and an optional compression extension"));
        }
        let extension = format!("{EXTENSION_SEPARATOR}{}", pieces[1]);
        let compression = match pieces.get(2) {
            Some(ext) => Compression::from_extension(&format!("{EXTENSION_SEPARATOR}{ext}"))
                .filter(|c| *c != Compression::None)
                .ok_or_else(|| fail("unknown compression extension"))?,
            None => Compression::None,
        };

        let fields: Vec<&str> = pieces[0].split(FIELD_SEPARATOR).collect();
        if fields.len() < MIN_STEM_FIELDS {
            return Err(fail("the name must contain at least 4 fields separated by '_'"));
        }
        let (step_id, port_name, prefix, data_name) = (fields[0], fields[1], fields[2], fields[3]);
        for (what, value) in [("step id", step_id), ("port name", port_name), ("format prefix", prefix), ("data name", data_name)] {
            if !is_name_valid(value) {
                return Err(fail(&format!("invalid {what}: {value:?}")));
            }
        }

        let format = registry.by_prefix_and_extension(prefix, &extension)
                             .ok_or_else(|| fail(&format!("no format for prefix {prefix:?} and extension {extension:?}")))?;

        let mut file_index = None;
        let mut part = None;
        for token in &fields[MIN_STEM_FIELDS..] {
            if let Some(n) = token.strip_prefix(FILE_INDEX_TOKEN) {
                if file_index.is_some() {
                    return Err(fail("more than one file index"));
                }
                if part.is_some() {
                    return Err(fail("the file index must precede the part number"));
                }
                file_index = Some(parse_number(n).ok_or_else(|| fail("invalid file index"))?);
            } else if let Some(n) = token.strip_prefix(PART_TOKEN) {
                if part.is_some() {
                    return Err(fail("more than one part number"));
                }
                part = Some(parse_number(n).ok_or_else(|| fail("invalid part number"))?);
            } else {
                return Err(fail(&format!("unexpected field {token:?}")));
            }
        }
        check_file_index(format, file_index).map_err(|msg| fail(&msg))?;

        Ok(FileNaming { step_id: step_id.to_string(),
                        port_name: port_name.to_string(),
                        format: format.clone(),
                        data_name: data_name.to_string(),
                        file_index,
                        part,
                        compression,
                        sample_number: None })
    }

    /// Parsea el último componente de una ruta.
    pub fn parse_path(path: &Path, registry: &DataFormatRegistry) -> Result<FileNaming, NamingError> {
        let name = path.file_name()
                       .and_then(|n| n.to_str())
                       .ok_or_else(|| NamingError::new(path.display().to_string(), "not a valid file name"))?;
        FileNaming::parse(name, registry)
    }

    /// Compara dos nombres de fichero por identidad de dato.
    pub fn data_equals_names(name1: &str, name2: &str, registry: &DataFormatRegistry) -> Result<bool, NamingError> {
        let a = FileNaming::parse(name1, registry)?;
        let b = FileNaming::parse(name2, registry)?;
        Ok(a.data_equals(&b))
    }
}

impl fmt::Display for FileNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.filename()) }
}

/// Patrón `prefijo*sufijo` para enumerar ficheros sin parsearlos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glob {
    prefix: String,
    suffix: String,
}

impl Glob {
    pub fn prefix(&self) -> &str { &self.prefix }

    pub fn suffix(&self) -> &str { &self.suffix }

    pub fn matches(&self, filename: &str) -> bool {
        filename.len() > self.prefix.len() + self.suffix.len()
        && filename.starts_with(&self.prefix)
        && filename.ends_with(&self.suffix)
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}*{}", self.prefix, self.suffix) }
}

/// Glob de los ficheros que un `(step, puerto, formato)` escribe con una
/// compresión dada.
pub fn glob(step_id: &str, port_name: &str, format: &DataFormat, compression: Compression) -> Glob {
    Glob { prefix: glob_prefix(step_id, port_name, format),
           suffix: format!("{}{}", format.default_extension(), compression.extension()) }
}

/// Un glob por cada extensión aceptada por el formato. `glob` sólo cubre la
/// extensión con la que se escribe; para listar hay que aceptar todas.
pub fn globs(step_id: &str, port_name: &str, format: &DataFormat, compression: Compression) -> Vec<Glob> {
    let prefix = glob_prefix(step_id, port_name, format);
    format.extensions()
          .iter()
          .map(|ext| Glob { prefix: prefix.clone(), suffix: format!("{ext}{}", compression.extension()) })
          .collect()
}

fn glob_prefix(step_id: &str, port_name: &str, format: &DataFormat) -> String {
    format!("{step_id}{FIELD_SEPARATOR}{port_name}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}", format.prefix())
}

fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Sin ceros a la izquierda: `part01` y `part1` no pueden nombrar lo mismo.
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

fn check_file_index(format: &DataFormat, file_index: Option<u32>) -> Result<(), String> {
    match (format.is_multi_file(), file_index) {
        (true, None) => Err(format!("format {} requires a file index", format.name())),
        (false, Some(_)) => Err(format!("format {} does not allow a file index", format.name())),
        (true, Some(i)) if i as usize >= format.max_files_count() => {
            Err(format!("file index {i} exceeds the {} files allowed by format {}", format.max_files_count(), format.name()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn registry() -> DataFormatRegistry {
        let mut reg = DataFormatRegistry::new();
        reg.register(DataFormat::builder("reads_fastq", "reads", ".fq").extra_extension(".fastq")
                                                                   .max_files_count(2)
                                                                   .build().unwrap())
           .unwrap();
        reg.register(DataFormat::builder("genome_fasta", "genome", ".fasta").one_file_per_analysis(true).build().unwrap())
           .unwrap();
        reg
    }

    #[test]
    fn naming_from_data() {
        let reg = registry();
        let reads = reg.by_name("reads_fastq").unwrap();
        let data = Data::from_files("s1", reads, Some(3), vec![]);
        let naming = FileNaming::from_data("filter", "output", &data, 1, Compression::Gzip).unwrap();
        assert_eq!(naming.filename(), "filter_output_reads_s1_file1_part3.fq.gz");
        assert!(FileNaming::from_data("filter", "output", &data, 2, Compression::None).is_err());

        let genome = Data::from_files("mm10", reg.by_name("genome_fasta").unwrap(), None, vec![]);
        let naming = FileNaming::from_data("index", "output", &genome, 5, Compression::None).unwrap();
        assert_eq!(naming.filename(), "index_output_genome_mm10.fasta");
    }

    #[test]
    fn filename_grammar() {
        let reg = registry();
        let genome = reg.by_name("genome_fasta").unwrap();
        let n = FileNaming::new("design", "output", genome, "mm10").unwrap();
        assert_eq!(n.filename(), "design_output_genome_mm10.fasta");

        let reads = reg.by_name("reads_fastq").unwrap();
        let n = FileNaming::new("filterreads", "output", reads, "s1").unwrap()
                                                                      .with_file_index(Some(1))
                                                                      .with_part(Some(12))
                                                                      .with_compression(Compression::Gzip);
        assert_eq!(n.filename(), "filterreads_output_reads_s1_file1_part12.fq.gz");
    }

    #[test]
    fn parse_is_inverse_of_filename() {
        let reg = registry();
        let reads = reg.by_name("reads_fastq").unwrap();
        let n = FileNaming::new("map", "in", reads, "Sample7").unwrap()
                                                            .with_file_index(Some(0))
                                                            .with_part(Some(3))
                                                            .with_compression(Compression::Bzip2);
        let parsed = FileNaming::parse(&n.filename(), &reg).unwrap();
        assert_eq!(parsed, n);
    }

    #[test]
    fn rejects_malformed_names() {
        let reg = registry();
        for bad in ["a_b_genome.fasta",
                    "a_b_genome_c",
                    "a_b_genome_c.fasta.gz.x",
                    "a-1_b_genome_c.fasta",
                    "a_b_unknown_c.fasta",
                    "a_b_genome_c.fq",
                    "a_b_genome_c.fasta.zip",
                    "a_b_genome_c_file0.fasta",
                    "a_b_reads_c.fq",
                    "a_b_reads_c_file2.fq",
                    "a_b_reads_c_file0_file1.fq",
                    "a_b_reads_c_part1_file0.fq",
                    "a_b_genome_c_part.fasta",
                    "a_b_genome_c_part1_part2.fasta",
                    "a_b_genome_c_partx.fasta",
                    "a_b_genome_c_extra.fasta",
                    "a__genome_c.fasta",
                    "a_b_genome_c_part01.fasta",
                    "a_b_reads_c_file00.fq"]
        {
            assert!(FileNaming::parse(bad, &reg).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn data_equality_ignores_file_index_and_compression() {
        let reg = registry();
        assert!(FileNaming::data_equals_names("s_o_reads_x_file0.fq", "s_o_reads_x_file1.fq.gz", &reg).unwrap());
        assert!(!FileNaming::data_equals_names("s_o_reads_x_file0_part0.fq", "s_o_reads_x_file0_part1.fq", &reg).unwrap());
        assert!(!FileNaming::data_equals_names("s_o_reads_x_file0.fq", "s_o_reads_y_file0.fq", &reg).unwrap());
        assert!(FileNaming::data_equals_names("s_o_reads_x.fq", "s_o_reads_x_file0.fq", &reg).is_err());
    }

    #[test]
    fn glob_matches_only_its_port() {
        let reg = registry();
        let genome = reg.by_name("genome_fasta").unwrap();
        let g = glob("design", "output", genome, Compression::None);
        assert_eq!(g.to_string(), "design_output_genome_*.fasta");
        assert!(g.matches("design_output_genome_mm10.fasta"));
        assert!(!g.matches("design_output_genome_mm10.fasta.gz"));
        assert!(!g.matches("design_other_genome_mm10.fasta"));
        assert!(!g.matches("design_output_genome_.fasta"));
    }

    #[test]
    fn globs_cover_every_extension() {
        let reg = registry();
        let reads = reg.by_name("reads_fastq").unwrap();
        let gs: Vec<String> = globs("up", "output", reads, Compression::Gzip).iter().map(|g| g.to_string()).collect();
        assert_eq!(gs, vec!["up_output_reads_*.fq.gz", "up_output_reads_*.fastq.gz"]);
        assert_eq!(glob("up", "output", reads, Compression::None).to_string(), "up_output_reads_*.fq");
    }

    #[test]
    fn name_helpers() {
        assert!(is_name_valid("abc123"));
        assert!(!is_name_valid(""));
        assert!(!is_name_valid("a_b"));
        assert!(!is_name_valid("é"));
        assert_eq!(to_valid_name("rep-1 (a)"), "rep1a");
    }
}
