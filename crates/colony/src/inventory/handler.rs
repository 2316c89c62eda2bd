use crate::ItemStack;

/// Slot limit used when a handler declares none.
pub const DEFAULT_SLOT_LIMIT: u32 = 64;

/// Indexed item storage.
pub trait ItemHandler {
    fn slots(&self) -> usize;

    /// Stack in `slot`; empty when the slot is out of range.
    fn stack(&self, slot: usize) -> ItemStack;

    /// Replaces the stack in `slot`. Out-of-range slots are ignored.
    fn set_stack(&mut self, slot: usize, stack: ItemStack);

    fn slot_limit(&self, _slot: usize) -> u32 {
        DEFAULT_SLOT_LIMIT
    }
}

/// [`ItemHandler`] over a fixed number of slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecItemHandler {
    stacks: Vec<ItemStack>,
}

impl VecItemHandler {
    pub fn new(slots: usize) -> Self {
        Self {
            stacks: vec![ItemStack::EMPTY; slots],
        }
    }

    /// Total item count across slots holding `item`.
    pub fn count_of(&self, item: crate::ItemId) -> u32 {
        self.stacks
            .iter()
            .filter(|s| !s.is_empty() && s.item() == item)
            .map(ItemStack::count)
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemStack> {
        self.stacks.iter()
    }
}

impl ItemHandler for VecItemHandler {
    fn slots(&self) -> usize {
        self.stacks.len()
    }

    fn stack(&self, slot: usize) -> ItemStack {
        self.stacks.get(slot).copied().unwrap_or(ItemStack::EMPTY)
    }

    fn set_stack(&mut self, slot: usize, stack: ItemStack) {
        if let Some(current) = self.stacks.get_mut(slot) {
            *current = stack;
        }
    }
}
