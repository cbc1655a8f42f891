//! Módulo de hashing y canonicalización JSON.
//!
//! Se usa para el fingerprint de configuración de cada step: mismo módulo,
//! misma versión y mismos parámetros producen el mismo hash.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_str, hash_value};
