use serde::{Deserialize, Serialize};

/// Estado de un step durante la ejecución del workflow.
///
/// ```text
/// Created -> Configured -> Waiting -> Ready -> Working -> {PartiallyDone -> Working}* -> Done
/// ```
///
/// Cualquier estado no final puede pasar a `Failed` o `Aborted`. `Done`,
/// `Failed` y `Aborted` son finales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepState {
    Created,
    Configured,
    Waiting,
    Ready,
    Working,
    PartiallyDone,
    Done,
    Failed,
    Aborted,
}

impl StepState {
    pub fn is_final_state(self) -> bool { matches!(self, StepState::Done | StepState::Failed | StepState::Aborted) }

    pub fn is_working_state(self) -> bool { matches!(self, StepState::Working | StepState::PartiallyDone) }

    /// El step ya ha producido salidas utilizables.
    pub fn is_done_state(self) -> bool { matches!(self, StepState::PartiallyDone | StepState::Done) }

    pub fn can_transition_to(self, next: StepState) -> bool {
        use StepState::*;
        if self.is_final_state() {
            return false;
        }
        if matches!(next, Failed | Aborted) {
            return true;
        }
        matches!((self, next),
                 (Created, Configured)
                 | (Configured, Waiting)
                 | (Waiting, Ready)
                 | (Ready, Working)
                 | (Working, PartiallyDone)
                 | (Working, Done)
                 | (PartiallyDone, Working)
                 | (PartiallyDone, Done))
    }
}

#[cfg(test)]
mod tests {
    use super::StepState::*;
    use super::*;

    #[test]
    fn predicates() {
        assert!(Done.is_final_state() && Failed.is_final_state() && Aborted.is_final_state());
        assert!(!PartiallyDone.is_final_state());
        assert!(Working.is_working_state() && PartiallyDone.is_working_state());
        assert!(!Ready.is_working_state());
        assert!(PartiallyDone.is_done_state() && Done.is_done_state());
        assert!(!Failed.is_done_state());
    }

    #[test]
    fn transitions() {
        assert!(Created.can_transition_to(Configured));
        assert!(Working.can_transition_to(PartiallyDone));
        assert!(PartiallyDone.can_transition_to(Working));
        assert!(Waiting.can_transition_to(Aborted));
        assert!(Created.can_transition_to(Failed));
        assert!(!Created.can_transition_to(Working));
        assert!(!Done.can_transition_to(Working));
        assert!(!Failed.can_transition_to(Aborted));
        assert!(!Ready.can_transition_to(Done));
    }
}
