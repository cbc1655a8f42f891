//! Ejecución local de steps.

mod local;

pub use local::LocalRunner;
