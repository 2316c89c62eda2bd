use std::fmt;

/// Item type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId(pub u32);

/// A stack of identical items.
///
/// A stack with a count of zero is empty regardless of its item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    item: ItemId,
    count: u32,
    max_stack_size: u32,
}

impl ItemStack {
    pub const EMPTY: ItemStack = ItemStack {
        item: ItemId(0),
        count: 0,
        max_stack_size: 0,
    };

    pub const fn new(item: ItemId, count: u32, max_stack_size: u32) -> Self {
        Self {
            item,
            count,
            max_stack_size,
        }
    }

    pub const fn item(&self) -> ItemId {
        self.item
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub const fn max_stack_size(&self) -> u32 {
        self.max_stack_size
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if more than one item fits in a stack of this kind.
    pub const fn is_stackable(&self) -> bool {
        self.max_stack_size > 1
    }

    /// Returns `true` if both stacks hold the same kind of item.
    pub fn same_item(&self, other: &ItemStack) -> bool {
        !self.is_empty() && !other.is_empty() && self.item == other.item
    }

    pub fn set_count(&mut self, count: u32) {
        self.count = count;
    }

    pub fn shrink(&mut self, amount: u32) {
        self.count = self.count.saturating_sub(amount);
    }

    /// Removes up to `amount` items from this stack and returns them.
    pub fn split(&mut self, amount: u32) -> ItemStack {
        let taken = amount.min(self.count);
        self.count -= taken;
        ItemStack {
            count: taken,
            ..*self
        }
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("empty")
        } else {
            write!(f, "{}x item#{}", self.count, self.item.0)
        }
    }
}
