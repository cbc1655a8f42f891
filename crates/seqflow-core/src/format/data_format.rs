//! Descriptor inmutable de un tipo de dato.

use std::fmt;
use std::sync::Arc;

use crate::checker::Checker;
use crate::errors::ConfigurationError;
use crate::naming::is_name_valid;
use crate::splitmerge::{Merger, Splitter};

pub type CheckerFactory = Arc<dyn Fn() -> Box<dyn Checker> + Send + Sync>;
pub type SplitterFactory = Arc<dyn Fn() -> Box<dyn Splitter> + Send + Sync>;
pub type MergerFactory = Arc<dyn Fn() -> Box<dyn Merger> + Send + Sync>;

struct FormatInner {
    name: String,
    alias: Option<String>,
    prefix: String,
    extensions: Vec<String>,
    description: String,
    max_files_count: usize,
    one_file_per_analysis: bool,
    checker: Option<CheckerFactory>,
    splitter: Option<SplitterFactory>,
    merger: Option<MergerFactory>,
}

/// Formato de datos. Clonarlo es barato (comparte el descriptor) y dos
/// formatos son iguales si tienen el mismo nombre.
#[derive(Clone)]
pub struct DataFormat {
    inner: Arc<FormatInner>,
}

impl DataFormat {
    /// `extension` incluye el punto inicial (`.fq`).
    pub fn builder(name: &str, prefix: &str, extension: &str) -> DataFormatBuilder {
        DataFormatBuilder { inner: FormatInner { name: name.to_string(),
                                                 alias: None,
                                                 prefix: prefix.to_string(),
                                                 extensions: vec![extension.to_string()],
                                                 description: String::new(),
                                                 max_files_count: 1,
                                                 one_file_per_analysis: false,
                                                 checker: None,
                                                 splitter: None,
                                                 merger: None } }
    }

    pub fn name(&self) -> &str { &self.inner.name }

    pub fn alias(&self) -> Option<&str> { self.inner.alias.as_deref() }

    /// Prefijo corto usado en los nombres de fichero.
    pub fn prefix(&self) -> &str { &self.inner.prefix }

    pub fn default_extension(&self) -> &str { &self.inner.extensions[0] }

    pub fn extensions(&self) -> &[String] { &self.inner.extensions }

    pub fn description(&self) -> &str { &self.inner.description }

    pub fn max_files_count(&self) -> usize { self.inner.max_files_count }

    pub fn is_multi_file(&self) -> bool { self.inner.max_files_count > 1 }

    pub fn one_file_per_analysis(&self) -> bool { self.inner.one_file_per_analysis }

    pub fn has_checker(&self) -> bool { self.inner.checker.is_some() }

    pub fn has_splitter(&self) -> bool { self.inner.splitter.is_some() }

    pub fn has_merger(&self) -> bool { self.inner.merger.is_some() }

    pub fn checker(&self) -> Option<Box<dyn Checker>> { self.inner.checker.as_ref().map(|f| f()) }

    pub fn splitter(&self) -> Option<Box<dyn Splitter>> { self.inner.splitter.as_ref().map(|f| f()) }

    pub fn merger(&self) -> Option<Box<dyn Merger>> { self.inner.merger.as_ref().map(|f| f()) }
}

impl PartialEq for DataFormat {
    fn eq(&self, other: &Self) -> bool { self.inner.name == other.inner.name }
}

impl Eq for DataFormat {}

impl std::hash::Hash for DataFormat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) { self.inner.name.hash(state) }
}

impl fmt::Debug for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFormat")
         .field("name", &self.inner.name)
         .field("prefix", &self.inner.prefix)
         .field("extensions", &self.inner.extensions)
         .field("max_files_count", &self.inner.max_files_count)
         .field("checker", &self.has_checker())
         .field("splitter", &self.has_splitter())
         .field("merger", &self.has_merger())
         .finish()
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.inner.name) }
}

pub struct DataFormatBuilder {
    inner: FormatInner,
}

impl DataFormatBuilder {
    pub fn alias(mut self, alias: &str) -> Self {
        self.inner.alias = Some(alias.to_string());
        self
    }

    /// Extensión adicional aceptada al parsear nombres de fichero.
    pub fn extra_extension(mut self, extension: &str) -> Self {
        self.inner.extensions.push(extension.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.inner.description = description.to_string();
        self
    }

    pub fn max_files_count(mut self, count: usize) -> Self {
        self.inner.max_files_count = count;
        self
    }

    pub fn one_file_per_analysis(mut self, value: bool) -> Self {
        self.inner.one_file_per_analysis = value;
        self
    }

    pub fn checker<F>(mut self, factory: F) -> Self
        where F: Fn() -> Box<dyn Checker> + Send + Sync + 'static
    {
        self.inner.checker = Some(Arc::new(factory));
        self
    }

    pub fn splitter<F>(mut self, factory: F) -> Self
        where F: Fn() -> Box<dyn Splitter> + Send + Sync + 'static
    {
        self.inner.splitter = Some(Arc::new(factory));
        self
    }

    pub fn merger<F>(mut self, factory: F) -> Self
        where F: Fn() -> Box<dyn Merger> + Send + Sync + 'static
    {
        self.inner.merger = Some(Arc::new(factory));
        self
    }

    pub fn build(self) -> Result<DataFormat, ConfigurationError> {
        let inner = self.inner;
        let invalid = |msg: String| ConfigurationError::UnknownFormat(format!("{}: {msg}", inner.name));
        if inner.name.trim().is_empty() {
            return Err(invalid("empty format name".into()));
        }
        if !is_name_valid(&inner.prefix) {
            return Err(invalid(format!("invalid prefix {:?}", inner.prefix)));
        }
        for ext in &inner.extensions {
            let body = ext.strip_prefix('.').unwrap_or("");
            if body.is_empty() || body.contains('.') {
                return Err(invalid(format!("invalid extension {ext:?}")));
            }
        }
        if inner.max_files_count == 0 {
            return Err(invalid("max files count must be at least 1".into()));
        }
        Ok(DataFormat { inner: Arc::new(inner) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_prefix_and_extension() {
        assert!(DataFormat::builder("reads_fastq", "reads", ".fq").build().is_ok());
        assert!(DataFormat::builder("bad", "re_ads", ".fq").build().is_err());
        assert!(DataFormat::builder("bad", "reads", "fq").build().is_err());
        assert!(DataFormat::builder("bad", "reads", ".tar.gz").build().is_err());
        assert!(DataFormat::builder("bad", "reads", ".fq").max_files_count(0).build().is_err());
    }

    #[test]
    fn equality_is_by_name() {
        let a = DataFormat::builder("reads_fastq", "reads", ".fq").build().unwrap();
        let b = DataFormat::builder("reads_fastq", "other", ".fastq").build().unwrap();
        assert_eq!(a, b);
        assert!(!a.is_multi_file());
        assert_eq!(a.default_extension(), ".fq");
    }
}
