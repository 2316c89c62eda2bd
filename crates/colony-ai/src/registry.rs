//! Target storage keyed by tier.

use std::collections::HashMap;

use crate::{AiState, Target, TargetId};

/// Registry that owns every target of one scheduler.
///
/// Targets live in an arena keyed by [`TargetId`]; each tier keeps the ids of
/// its targets in registration order, which is also their evaluation order.
///
/// The builtin tiers (`Init`, `AiBlockingPrio`, `StateBlockingPrio`, `Event`)
/// exist from construction on. Other tiers are created on first registration.
/// Tiers are never removed, so every registered target's tier is always
/// present.
pub struct TargetRegistry<C> {
    targets: HashMap<TargetId, Target<C>>,
    tiers: HashMap<AiState, Vec<TargetId>>,
    next_id: u64,
}

impl<C> TargetRegistry<C> {
    /// Creates a registry with the four builtin tiers, all empty.
    pub fn new() -> Self {
        let tiers = AiState::BUILTIN_TIERS
            .iter()
            .map(|&tier| (tier, Vec::new()))
            .collect();

        Self {
            targets: HashMap::new(),
            tiers,
            next_id: 0,
        }
    }

    /// Appends a target to the end of its tier.
    pub fn register(&mut self, target: Target<C>) -> TargetId {
        let id = TargetId::from_raw(self.next_id);
        self.next_id = self.next_id.saturating_add(1);

        self.tiers.entry(target.tier()).or_default().push(id);
        self.targets.insert(id, target);
        id
    }

    /// Removes a target from its tier and returns it.
    ///
    /// Returns `None` if the id is unknown or was already removed.
    pub fn unregister(&mut self, id: TargetId) -> Option<Target<C>> {
        let target = self.targets.remove(&id)?;

        let tier = self.tiers.get_mut(&target.tier());
        debug_assert!(
            tier.is_some(),
            "tier {} missing for registered target {}",
            target.tier(),
            id
        );
        if let Some(ids) = tier
            && let Some(pos) = ids.iter().position(|&other| other == id)
        {
            ids.remove(pos);
        }

        Some(target)
    }

    pub fn get(&self, id: TargetId) -> Option<&Target<C>> {
        self.targets.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TargetId) -> Option<&mut Target<C>> {
        self.targets.get_mut(&id)
    }

    /// Returns the ids registered under `tier`, in evaluation order.
    ///
    /// A tier that was never created reads as empty.
    pub fn tier(&self, tier: AiState) -> &[TargetId] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `tier` has been created.
    pub fn has_tier(&self, tier: AiState) -> bool {
        self.tiers.contains_key(&tier)
    }

    /// Iterates over the targets registered under `tier`, in evaluation order.
    pub fn targets_in(&self, tier: AiState) -> impl Iterator<Item = &Target<C>> + '_ {
        self.tier(tier).iter().filter_map(|id| self.targets.get(id))
    }

    /// Returns the total number of registered targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Returns true if no targets are registered.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns an iterator over tiers and their sizes (for debugging).
    pub fn tiers(&self) -> impl Iterator<Item = (AiState, usize)> + '_ {
        self.tiers.iter().map(|(&tier, ids)| (tier, ids.len()))
    }
}

impl<C> Default for TargetRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::goto;

    #[test]
    fn builtin_tiers_exist_and_are_empty() {
        let registry = TargetRegistry::<()>::new();
        for tier in AiState::BUILTIN_TIERS {
            assert!(registry.has_tier(tier));
            assert!(registry.tier(tier).is_empty());
        }
        assert!(!registry.has_tier(AiState::Idle));
        assert!(registry.tier(AiState::Idle).is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn registration_order_is_preserved_per_tier() {
        let mut registry = TargetRegistry::<()>::new();
        let a = registry.register(goto(AiState::Idle, AiState::Decide));
        let b = registry.register(goto(AiState::Event, AiState::Decide));
        let c = registry.register(goto(AiState::Idle, AiState::Dump));

        assert_eq!(registry.tier(AiState::Idle), &[a, c]);
        assert_eq!(registry.tier(AiState::Event), &[b]);
        assert_eq!(registry.len(), 3);
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn unregister_removes_only_that_target() {
        let mut registry = TargetRegistry::<()>::new();
        let a = registry.register(goto(AiState::Idle, AiState::Decide).named("a"));
        let b = registry.register(goto(AiState::Idle, AiState::Dump).named("b"));

        let removed = registry.unregister(a).expect("a is registered");
        assert_eq!(removed.name(), "a");
        assert_eq!(registry.tier(AiState::Idle), &[b]);
        assert!(registry.has_tier(AiState::Idle));

        // Second removal is a no-op
        assert!(registry.unregister(a).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_count_up_from_zero() {
        let mut registry = TargetRegistry::<()>::new();
        let ids: Vec<u64> = (0..3)
            .map(|_| registry.register(goto(AiState::Idle, AiState::Decide)).get())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn id_counter_saturates_instead_of_overflowing() {
        let mut registry = TargetRegistry::<()>::new();
        registry.next_id = u64::MAX - 1;

        let last = registry.register(goto(AiState::Idle, AiState::Decide));
        let after = registry.register(goto(AiState::Idle, AiState::Dump));
        assert_eq!(last.get(), u64::MAX - 1);
        assert_eq!(after.get(), u64::MAX);
        assert_eq!(registry.next_id, u64::MAX);
    }

    #[test]
    fn reregistered_target_gets_a_fresh_id() {
        let mut registry = TargetRegistry::<()>::new();
        let a = registry.register(goto(AiState::Event, AiState::Decide));
        let target = registry.unregister(a).unwrap();
        let again = registry.register(target);

        assert_ne!(a, again);
        assert_eq!(registry.tier(AiState::Event), &[again]);
    }
}
