//! Formatos de datos (`DataFormat`), tipos de compresión y el registro de
//! formatos.

mod compression;
mod data_format;
mod registry;

pub use compression::Compression;
pub use data_format::{CheckerFactory, DataFormat, DataFormatBuilder, MergerFactory, SplitterFactory};
pub use registry::DataFormatRegistry;
