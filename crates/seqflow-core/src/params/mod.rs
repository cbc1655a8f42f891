//! Unidades de configuración: `Parameter`, el conjunto `Parameters`, la
//! versión semántica `Version` y los helpers de validación usados por los
//! módulos durante `configure`.

pub mod checks;
mod parameter;
mod version;

pub use parameter::{Parameter, Parameters};
pub use version::Version;
