//! Scheduling phases a worker AI can be in.

/// Identifies a scheduling phase and, at the same time, the tier that targets
/// are registered under.
///
/// Four values are special to the scheduler:
/// - [`AiState::AiBlockingPrio`], [`AiState::Event`] and
///   [`AiState::StateBlockingPrio`] are checked on every tick, in that order,
///   regardless of the current state
/// - [`AiState::Init`] is the state every scheduler starts in
///
/// All other values are ordinary phases: while the AI is in one of them, the
/// targets registered under it are checked after the three priority tiers.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AiState {
    /// Startup phase.
    #[default]
    Init,
    /// Highest priority tier, checked first on every tick.
    AiBlockingPrio,
    /// Second tier, checked after `AiBlockingPrio`.
    Event,
    /// Third tier, checked after `Event`.
    StateBlockingPrio,
    /// Quiescent state the owner can force with `reset_ai_to_idle`.
    Idle,

    // Shared worker phases
    StartWorking,
    Prepare,
    Decide,
    Paused,
    WalkTo,
    NeedsItem,
    InventoryFull,
    GatherRequiredMaterials,
    Dump,
    Deliver,
    Eating,
    Sleeping,

    // Job specific phases
    Gathering,
    Crafting,
    Building,
    Farming,
    Fishing,
    Mining,
    Woodcutting,
    Guarding,
}

impl AiState {
    /// Tiers checked on every tick, in evaluation order.
    pub const PRIORITY_TIERS: [AiState; 3] = [
        AiState::AiBlockingPrio,
        AiState::Event,
        AiState::StateBlockingPrio,
    ];

    /// Tiers that exist in every registry from construction on.
    pub const BUILTIN_TIERS: [AiState; 4] = [
        AiState::Init,
        AiState::AiBlockingPrio,
        AiState::StateBlockingPrio,
        AiState::Event,
    ];

    /// Returns `true` for the three tiers checked on every tick.
    pub const fn is_priority_tier(self) -> bool {
        matches!(
            self,
            AiState::AiBlockingPrio | AiState::Event | AiState::StateBlockingPrio
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn priority_tiers_are_ordered() {
        assert_eq!(
            AiState::PRIORITY_TIERS,
            [
                AiState::AiBlockingPrio,
                AiState::Event,
                AiState::StateBlockingPrio
            ]
        );
        assert!(AiState::PRIORITY_TIERS.iter().all(|s| s.is_priority_tier()));
        assert!(!AiState::Init.is_priority_tier());
        assert!(!AiState::Idle.is_priority_tier());
    }

    #[test]
    fn display_uses_screaming_snake_case() {
        assert_eq!(AiState::AiBlockingPrio.to_string(), "AI_BLOCKING_PRIO");
        assert_eq!(AiState::StartWorking.as_ref(), "START_WORKING");
        assert_eq!(
            AiState::from_str("state_blocking_prio").unwrap(),
            AiState::StateBlockingPrio
        );
    }
}
