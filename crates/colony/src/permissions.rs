//! Player identity and colony permission checks.

use std::fmt;

/// Identifier of a connected player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Actions guarded by colony permissions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PermissionAction {
    AccessHuts,
    ManageHuts,
    PlaceHuts,
    BreakBlocks,
    PlaceBlocks,
}

/// Permission table of one colony.
pub trait Permissions {
    fn has_permission(&self, player: PlayerId, action: PermissionAction) -> bool;
}

impl<F> Permissions for F
where
    F: Fn(PlayerId, PermissionAction) -> bool,
{
    fn has_permission(&self, player: PlayerId, action: PermissionAction) -> bool {
        self(player, action)
    }
}
