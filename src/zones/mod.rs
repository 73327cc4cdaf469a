//! Zone containers for card locations.
//!
//! The player's cards live in four ordered zones: deck, hand, discard and
//! exile. Zones hold `CardId`s only; the `CardRepository` owns the
//! instances.
//!
//! ## Key Types
//!
//! - `ZoneKind`: which of the four zones
//! - `ZonePosition`: insertion point within an ordered zone
//! - `Zones`: the containers and their move/draw/shuffle operations
//! - `DrawOutcome`: what a draw did (cards, reshuffle point, skipped draws)

pub mod container;

pub use container::{DrawOutcome, ZoneKind, ZonePosition, Zones};
