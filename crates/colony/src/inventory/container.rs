//! Container bridging a building inventory and a player inventory.
//!
//! # Slot Layout
//!
//! Container slots are numbered building-first:
//!
//! | container slots | backing slots |
//! |-----------------|---------------|
//! | `0..b` | building `0..b` |
//! | `b..b + 27` | player main inventory `9..36` |
//! | `b + 27..b + 36` | player hotbar `0..9` |
//!
//! The building section shows at most [`MAX_BUILDING_ROWS`] rows. Buildings
//! larger than that widen their rows instead, so every slot stays reachable.
//! Smaller buildings show only complete rows of [`ROW_WIDTH`].

use tracing::trace;

use super::handler::ItemHandler;
use super::stack::ItemStack;
use crate::{PermissionAction, Permissions, PlayerId};

/// Slots per row.
pub const ROW_WIDTH: usize = 9;

/// Visible building rows before rows start widening.
pub const MAX_BUILDING_ROWS: usize = 6;

/// Player main inventory slots, backing indices `9..36`.
pub const PLAYER_MAIN_SLOTS: usize = 27;

/// Player hotbar slots, backing indices `0..9`.
pub const PLAYER_HOTBAR_SLOTS: usize = 9;

/// Backing storage of a container slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotRef {
    Building(usize),
    Player(usize),
}

/// Reactions of the owning building to its inventory changing.
pub trait BuildingHooks {
    /// Called whenever a non-empty stack is placed into a building slot; the
    /// building may use it to fulfill its next open request.
    fn overrule_next_open_request_with_stack(&mut self, stack: &ItemStack);
}

/// Building without hooks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl BuildingHooks for NoHooks {
    fn overrule_next_open_request_with_stack(&mut self, _stack: &ItemStack) {}
}

pub struct BuildingInventoryContainer<B, P, H = NoHooks> {
    building: B,
    player: P,
    hooks: H,
    slots: Vec<SlotRef>,
    building_slots: usize,
    rows: usize,
}

impl<B, P, H> BuildingInventoryContainer<B, P, H>
where
    B: ItemHandler,
    P: ItemHandler,
    H: BuildingHooks,
{
    pub fn new(building: B, player: P, hooks: H) -> Self {
        let size = building.slots();
        let rows = size / ROW_WIDTH;
        let columns = if rows <= MAX_BUILDING_ROWS {
            ROW_WIDTH
        } else {
            size / MAX_BUILDING_ROWS + 1
        };
        let building_slots = size.min(rows.min(MAX_BUILDING_ROWS) * columns);

        let mut slots: Vec<SlotRef> = (0..building_slots).map(SlotRef::Building).collect();
        slots.extend((ROW_WIDTH..ROW_WIDTH + PLAYER_MAIN_SLOTS).map(SlotRef::Player));
        slots.extend((0..PLAYER_HOTBAR_SLOTS).map(SlotRef::Player));

        Self {
            building,
            player,
            hooks,
            slots,
            building_slots,
            rows,
        }
    }

    /// Total number of container slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of container slots backed by the building.
    pub fn building_slot_count(&self) -> usize {
        self.building_slots
    }

    /// Full rows the building inventory holds.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn slot(&self, index: usize) -> Option<SlotRef> {
        self.slots.get(index).copied()
    }

    /// Stack shown in container slot `index`.
    pub fn stack(&self, index: usize) -> ItemStack {
        self.slot(index)
            .map_or(ItemStack::EMPTY, |slot| self.stack_in(slot))
    }

    /// Places `stack` into container slot `index`, notifying the building
    /// when a non-empty stack lands in one of its slots.
    pub fn put_stack(&mut self, index: usize, stack: ItemStack) {
        if let Some(slot) = self.slot(index) {
            self.put_in(slot, stack);
        }
    }

    /// Shift-click on container slot `index`.
    ///
    /// Building stacks move into the player inventory, searching from the
    /// hotbar end backwards; player stacks move into the building, searching
    /// forwards. Matching stacks are topped up before empty slots are used.
    /// Returns what is left in the clicked slot, or an empty stack when
    /// nothing could move.
    pub fn transfer_stack_in_slot(&mut self, index: usize) -> ItemStack {
        let Some(slot) = self.slot(index) else {
            return ItemStack::EMPTY;
        };
        let mut moving = self.stack_in(slot);
        if moving.is_empty() {
            return ItemStack::EMPTY;
        }

        let boundary = self.building_slots;
        let merged = if index < boundary {
            self.merge_item_stack(&mut moving, boundary, self.slots.len(), true)
        } else {
            self.merge_item_stack(&mut moving, 0, boundary, false)
        };
        if !merged {
            return ItemStack::EMPTY;
        }

        trace!(
            target: "colony::inventory",
            index,
            remaining = moving.count(),
            "shift-click transfer"
        );
        if moving.is_empty() {
            self.put_in(slot, ItemStack::EMPTY);
        } else {
            self.put_in(slot, moving);
        }
        moving
    }

    /// Only players allowed to access huts may use the container.
    pub fn can_interact_with(&self, player: PlayerId, permissions: &impl Permissions) -> bool {
        permissions.has_permission(player, PermissionAction::AccessHuts)
    }

    pub fn building(&self) -> &B {
        &self.building
    }

    pub fn building_mut(&mut self) -> &mut B {
        &mut self.building
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn into_parts(self) -> (B, P, H) {
        (self.building, self.player, self.hooks)
    }

    fn stack_in(&self, slot: SlotRef) -> ItemStack {
        match slot {
            SlotRef::Building(i) => self.building.stack(i),
            SlotRef::Player(i) => self.player.stack(i),
        }
    }

    /// Writes without notifying the building.
    fn set_in(&mut self, slot: SlotRef, stack: ItemStack) {
        match slot {
            SlotRef::Building(i) => self.building.set_stack(i, stack),
            SlotRef::Player(i) => self.player.set_stack(i, stack),
        }
    }

    fn put_in(&mut self, slot: SlotRef, stack: ItemStack) {
        self.set_in(slot, stack);
        if matches!(slot, SlotRef::Building(_)) && !stack.is_empty() {
            self.hooks.overrule_next_open_request_with_stack(&stack);
        }
    }

    fn slot_limit(&self, slot: SlotRef) -> u32 {
        match slot {
            SlotRef::Building(i) => self.building.slot_limit(i),
            SlotRef::Player(i) => self.player.slot_limit(i),
        }
    }

    /// Container indices `start..end`, back to front when `reverse` is set.
    fn search_order(start: usize, end: usize, reverse: bool) -> impl Iterator<Item = usize> {
        (0..end.saturating_sub(start)).map(move |offset| {
            if reverse {
                end - 1 - offset
            } else {
                start + offset
            }
        })
    }

    /// Moves as much of `stack` as fits into container slots `start..end`.
    ///
    /// Returns `true` if anything moved.
    fn merge_item_stack(
        &mut self,
        stack: &mut ItemStack,
        start: usize,
        end: usize,
        reverse: bool,
    ) -> bool {
        let mut moved = false;

        if stack.is_stackable() {
            for index in Self::search_order(start, end, reverse) {
                if stack.is_empty() {
                    break;
                }
                let slot = self.slots[index];
                let mut existing = self.stack_in(slot);
                if !existing.same_item(stack) {
                    continue;
                }

                let max = self.slot_limit(slot).min(stack.max_stack_size());
                let total = existing.count() + stack.count();
                if total <= max {
                    stack.set_count(0);
                    existing.set_count(total);
                } else if existing.count() < max {
                    stack.shrink(max - existing.count());
                    existing.set_count(max);
                } else {
                    continue;
                }
                self.set_in(slot, existing);
                moved = true;
            }
        }

        if !stack.is_empty() {
            for index in Self::search_order(start, end, reverse) {
                let slot = self.slots[index];
                if !self.stack_in(slot).is_empty() {
                    continue;
                }
                let limit = self.slot_limit(slot);
                let placed = stack.split(stack.count().min(limit));
                self.put_in(slot, placed);
                moved = true;
                break;
            }
        }

        moved
    }
}
