//! Immutable battle projections.
//!
//! A `BattleSnapshot` is a plain value built from the battle's persistent
//! containers. Nothing in it points back into the live battle, so a snapshot
//! taken now is unaffected by any later resolution.

pub mod patch;
pub mod view;

pub use patch::SnapshotPatch;
pub use view::{BattleSnapshot, CardView, EnemyView};
