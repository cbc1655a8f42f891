//! Versión semántica comparable de los módulos.
//!
//! Gramática: `MAJOR[.MINOR[.REVISION]][TYPE]`. `TYPE` empieza en el primer
//! carácter que no es dígito ni `.` y consume el resto de la cadena tal cual
//! (`"2.4.1-RC1"` => 2, 4, 1, `"-RC1"`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// El orden derivado sigue el orden de los campos: major, minor, revision y
/// luego `kind` lexicográfico.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    revision: u32,
    kind: String,
}

impl Version {
    /// Los componentes negativos se fijan a 0.
    pub fn new(major: i64, minor: i64, revision: i64, kind: &str) -> Self {
        Self { major: clamp(major),
               minor: clamp(minor),
               revision: clamp(revision),
               kind: kind.to_string() }
    }

    pub fn major(&self) -> u32 { self.major }

    pub fn minor(&self) -> u32 { self.minor }

    pub fn revision(&self) -> u32 { self.revision }

    /// Sufijo textual (`-beta`, `-RC1`...). Vacío si no hay.
    pub fn kind(&self) -> &str { &self.kind }

    /// `min <= self < max`.
    pub fn is_between(&self, min: &Version, max: &Version) -> bool {
        self >= min && self < max
    }

    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let type_start = s.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());
        let (numbers, kind) = s.split_at(type_start);

        let mut fields = [0u32; 3];
        for (slot, token) in fields.iter_mut().zip(numbers.split('.')) {
            // Un campo vacío o fuera de rango vale 0.
            *slot = token.parse().unwrap_or(0);
        }
        Self { major: fields[0],
               minor: fields[1],
               revision: fields[2],
               kind: kind.to_string() }
    }
}

fn clamp(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Version::parse(s)) }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}{}", self.major, self.minor, self.revision, self.kind)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Version::parse(&s))
    }
}
