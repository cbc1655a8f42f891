//! Nodo del workflow y su ciclo de vida.

mod definition;
mod state;
mod step_type;

pub use definition::Step;
pub use state::StepState;
pub use step_type::StepType;
