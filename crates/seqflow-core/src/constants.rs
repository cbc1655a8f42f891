//! Constantes del motor core.
//!
//! Agrupa los separadores de la gramática de nombres de fichero y los valores
//! que participan en el fingerprint de un step. Cambiar cualquier separador
//! rompe la compatibilidad con los ficheros ya producidos en disco.

/// Versión lógica del motor. Forma parte del fingerprint de cada step.
pub const ENGINE_VERSION: &str = "S1.0";

/// Separador de campos dentro del stem de un nombre de fichero.
pub const FIELD_SEPARATOR: char = '_';

/// Separador entre stem, extensión de formato y extensión de compresión.
pub const EXTENSION_SEPARATOR: char = '.';

/// Prefijo del token de índice de fichero (`_file<N>`).
pub const FILE_INDEX_TOKEN: &str = "file";

/// Prefijo del token de parte (`_part<N>`).
pub const PART_TOKEN: &str = "part";

/// Número mínimo de campos del stem: step, puerto, prefijo de formato y nombre.
pub const MIN_STEM_FIELDS: usize = 4;

/// Nombre del parámetro que fija el formato en los módulos genéricos
/// (copy, splitter, merger).
pub const FORMAT_PARAMETER: &str = "format";

/// Campo de metadata que agrupa réplicas técnicas.
pub const REP_TECH_GROUP_METADATA: &str = "RepTechGroup";

/// Compresión de la salida del módulo copy.
pub const COMPRESSION_PARAMETER: &str = "compression";

/// Lista (separada por comas) de formatos que valida el módulo checker.
pub const FORMATS_PARAMETER: &str = "formats";
