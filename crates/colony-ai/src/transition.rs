//! Result of applying a target's action.

use crate::AiState;

/// What a target's action asks the scheduler to do with the current state.
///
/// # Tick Semantics
///
/// - `To(state)`: the target fired. The scheduler switches to `state` and the
///   tick is consumed; no further targets are checked.
/// - `None`: nothing changed. Evaluation continues with the next target, so
///   later targets in the same and lower tiers still get a chance this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Transition {
    /// Stay in the current state and keep evaluating.
    #[default]
    None,

    /// Switch to the given state and end the tick.
    To(AiState),
}

impl Transition {
    /// Returns the requested state, if any.
    #[inline]
    pub fn target_state(self) -> Option<AiState> {
        match self {
            Transition::None => None,
            Transition::To(state) => Some(state),
        }
    }

    /// Returns `true` if this transition changes state.
    #[inline]
    pub fn is_transition(self) -> bool {
        matches!(self, Transition::To(_))
    }
}

impl From<AiState> for Transition {
    fn from(state: AiState) -> Self {
        Transition::To(state)
    }
}

impl From<Option<AiState>> for Transition {
    fn from(state: Option<AiState>) -> Self {
        state.map_or(Transition::None, Transition::To)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_state_converts() {
        assert_eq!(Transition::from(None::<AiState>), Transition::None);
        assert_eq!(
            Transition::from(Some(AiState::Dump)),
            Transition::To(AiState::Dump)
        );
        assert_eq!(Transition::To(AiState::Idle).target_state(), Some(AiState::Idle));
        assert!(!Transition::None.is_transition());
    }
}
