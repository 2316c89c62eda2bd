//! Builder utilities for ergonomic target construction.
//!
//! Most targets never fail, so writing `Ok(...)` in every predicate and action
//! is noise. These helpers wrap infallible closures into a [`Target`].

use crate::{AiState, Target, Transition};

/// Creates a target that runs `action` every time its tier is evaluated.
#[inline]
pub fn always<C: 'static, A>(tier: AiState, mut action: A) -> Target<C>
where
    A: FnMut(&mut C) -> Transition + 'static,
{
    Target::new(tier, move |ctx| Ok(action(ctx)))
}

/// Creates a target that runs `action` when `predicate` holds.
#[inline]
pub fn when<C: 'static, P, A>(tier: AiState, predicate: P, mut action: A) -> Target<C>
where
    P: Fn(&C) -> bool + 'static,
    A: FnMut(&mut C) -> Transition + 'static,
{
    Target::new(tier, move |ctx| Ok(action(ctx))).with_predicate(move |ctx| Ok(predicate(ctx)))
}

/// Creates a target that switches straight to `next`.
///
/// Shorthand for `always(tier, move |_| Transition::To(next))`.
#[inline]
pub fn goto<C: 'static>(tier: AiState, next: AiState) -> Target<C> {
    Target::new(tier, move |_| Ok(Transition::To(next)))
}

/// Creates a target that switches to `next` when `predicate` holds.
#[inline]
pub fn when_goto<C: 'static, P>(tier: AiState, predicate: P, next: AiState) -> Target<C>
where
    P: Fn(&C) -> bool + 'static,
{
    goto(tier, next).with_predicate(move |ctx| Ok(predicate(ctx)))
}
