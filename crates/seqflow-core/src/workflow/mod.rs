//! Grafo de steps enlazados por puertos.
//!
//! `WorkflowBuilder` carga y configura cada módulo una sola vez, valida los
//! enlaces y fija el orden de ejecución. `Workflow` conserva el grafo ya
//! validado y sabe reconstruir las entradas de un step a partir de los
//! ficheros que dejaron los steps anteriores.

mod builder;
mod graph;

pub use builder::{StepSpec, WorkflowBuilder};
pub use graph::{Link, Workflow};
