//! Building inventories and the container joining them to a player.

mod container;
mod handler;
mod stack;

pub use container::{
    BuildingHooks, BuildingInventoryContainer, MAX_BUILDING_ROWS, NoHooks, PLAYER_HOTBAR_SLOTS,
    PLAYER_MAIN_SLOTS, ROW_WIDTH, SlotRef,
};
pub use handler::{DEFAULT_SLOT_LIMIT, ItemHandler, VecItemHandler};
pub use stack::{ItemId, ItemStack};
