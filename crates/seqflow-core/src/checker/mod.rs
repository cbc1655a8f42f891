//! Validación de datos por formato con dependencias entre checkers.
//!
//! Un checker puede exigir que los checkers de otros formatos hayan pasado
//! antes (el de alineamientos necesita los nombres de secuencia que guarda el
//! del genoma). El coordinador ordena los checkers presentes y los ejecuta
//! en ese orden sobre todos los datos recibidos.

mod configuration;
mod coordinator;
mod store;

pub use configuration::CheckerConfiguration;
pub use coordinator::{resolve_checker_order, CheckerCoordinator};
pub use store::CheckStore;

use crate::data::Data;
use crate::errors::{ConfigurationError, TaskError};
use crate::params::Parameters;

pub trait Checker: Send {
    fn name(&self) -> &str;

    /// Formatos cuyos checkers deben ejecutarse antes que éste.
    fn checkers_required(&self) -> Vec<String> { Vec::new() }

    fn configure(&mut self, _step_id: &str, _parameters: &Parameters) -> Result<(), ConfigurationError> { Ok(()) }

    fn check(&self, data: &Data, store: &mut CheckStore) -> Result<(), TaskError>;
}
