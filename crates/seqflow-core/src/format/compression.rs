use std::fmt;

use serde::{Deserialize, Serialize};

/// Compresión aplicada a un fichero. Sólo afecta al nombre: el core copia
/// los bytes tal cual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Bzip2,
}

impl Compression {
    pub const ALL: [Compression; 3] = [Compression::None, Compression::Gzip, Compression::Bzip2];

    /// Extensión con punto inicial; vacía para `None`.
    pub fn extension(self) -> &'static str {
        match self {
            Compression::None => "",
            Compression::Gzip => ".gz",
            Compression::Bzip2 => ".bz2",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Compression> {
        Compression::ALL.into_iter().find(|c| c.extension() == extension)
    }

    /// Nombre textual (`none`, `gzip`/`gz`, `bzip2`/`bz2`), sin distinguir
    /// mayúsculas.
    pub fn from_name(name: &str) -> Option<Compression> {
        match name.trim().to_lowercase().as_str() {
            "" | "none" => Some(Compression::None),
            "gzip" | "gz" => Some(Compression::Gzip),
            "bzip2" | "bz2" => Some(Compression::Bzip2),
            _ => None,
        }
    }

    /// Compresión deducida del sufijo de un nombre de fichero.
    pub fn from_filename(filename: &str) -> Compression {
        Compression::ALL.into_iter()
                        .filter(|c| *c != Compression::None)
                        .find(|c| filename.ends_with(c.extension()))
                        .unwrap_or(Compression::None)
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Bzip2 => "bzip2",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_extension_and_filename() {
        assert_eq!(Compression::from_extension(".gz"), Some(Compression::Gzip));
        assert_eq!(Compression::from_extension(""), Some(Compression::None));
        assert_eq!(Compression::from_extension(".zip"), None);
        assert_eq!(Compression::from_filename("a_b_c_d.fq.bz2"), Compression::Bzip2);
        assert_eq!(Compression::from_filename("a_b_c_d.fq"), Compression::None);
        assert_eq!(Compression::from_name("GZ"), Some(Compression::Gzip));
        assert_eq!(Compression::from_name("zip"), None);
    }
}
