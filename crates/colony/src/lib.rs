//! Colony-side collaborators of worker AIs.
//!
//! - [`package`] keeps track of which players watch a colony and pushes view
//!   updates to them through a host-provided [`ViewSink`]
//! - [`inventory`] models the container that bridges a player's inventory and
//!   a building's inventory, including shift-click transfers
//! - [`permissions`] defines player identity and the permission check the
//!   container relies on
//!
//! Delivery of views and rendering of containers belong to the host.

pub mod inventory;
pub mod package;
pub mod permissions;

pub use inventory::{
    BuildingHooks, BuildingInventoryContainer, ItemHandler, ItemId, ItemStack, NoHooks, SlotRef,
    VecItemHandler,
};
pub use package::{ColonyPackageManager, ColonyView, PackageManager, ViewSink};
pub use permissions::{PermissionAction, Permissions, PlayerId};
