//! Puertos tipados de los steps.
//!
//! Un puerto tiene nombre (letras y dígitos ASCII, normalizado a minúsculas),
//! formato y multiplicidad (`is_list`). Los puertos de entrada declaran las
//! compresiones que toleran; los de salida, la compresión que aplican.

mod input;
mod output;
mod ports;

pub use input::InputPort;
pub use output::OutputPort;
pub use ports::{InputPorts, OutputPorts, Ports};

use crate::errors::ConfigurationError;
use crate::format::DataFormat;
use crate::naming::is_name_valid;

/// Comportamiento común de los dos tipos de puerto.
pub trait Port {
    fn name(&self) -> &str;
    fn format(&self) -> &DataFormat;
    fn is_list(&self) -> bool;
}

pub(crate) fn normalize_port_name(name: &str) -> Result<String, ConfigurationError> {
    if !is_name_valid(name) {
        return Err(ConfigurationError::Port(format!("invalid port name: {name:?}")));
    }
    Ok(name.to_lowercase())
}

/// Un enlace salida -> entrada es válido si ambos puertos transportan el
/// mismo formato y la entrada acepta la compresión de la salida.
pub fn check_link(output: &OutputPort, input: &InputPort) -> Result<(), String> {
    if output.format() != input.format() {
        return Err(format!("format mismatch: {} vs {}", output.format(), input.format()));
    }
    if !input.accepts(output.compression()) {
        return Err(format!("compression {} is not accepted", output.compression()));
    }
    Ok(())
}
