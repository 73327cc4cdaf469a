//! Stackable status effects attached to combatants.
//!
//! ## Key Types
//!
//! - `ModifierKind`: closed set of effect kinds, each with a fixed side,
//!   target and stacking rule
//! - `Modifier`: one instance held by a combatant
//! - `ModifierSet`: a combatant's modifiers in insertion order

pub mod kind;
pub mod set;

pub use kind::{ModifierKind, ModifierSide, ModifierTarget};
pub use set::{Modifier, ModifierChange, ModifierIds, ModifierSet};
