use std::fmt;

use serde::{Deserialize, Serialize};

/// Tipo de step. La prioridad fija desempata el orden de ejecución entre
/// steps sin dependencias mutuas (menor primero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepType {
    Root,
    Design,
    Checker,
    Generator,
    First,
    #[default]
    Standard,
    Terminal,
}

impl StepType {
    pub fn priority(self) -> u8 {
        match self {
            StepType::Root => 0,
            StepType::Design => 1,
            StepType::Checker => 2,
            StepType::Generator => 3,
            StepType::First => 4,
            StepType::Standard => 5,
            StepType::Terminal => 6,
        }
    }

    /// Id reservado de los steps que crea el propio motor.
    pub fn default_step_id(self) -> Option<&'static str> {
        match self {
            StepType::Root => Some("root"),
            StepType::Design => Some("design"),
            StepType::Checker => Some("checker"),
            StepType::First => Some("first"),
            StepType::Terminal => Some("terminal"),
            StepType::Generator | StepType::Standard => None,
        }
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepType::Root => "root",
            StepType::Design => "design",
            StepType::Checker => "checker",
            StepType::Generator => "generator",
            StepType::First => "first",
            StepType::Standard => "standard",
            StepType::Terminal => "terminal",
        };
        f.write_str(s)
    }
}
