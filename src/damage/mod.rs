//! Damage resolution.
//!
//! A pure function from an attack's base numbers and the two combatants'
//! modifier sets to a `DamageDescriptor`. No battle state is read or
//! written here; the battle applies the descriptor afterwards.

pub mod resolve;

pub use resolve::{
    resolve_damage, AttackCategory, Contribution, DamageBase, DamageDescriptor, DamageRole,
};
