//! Scripted enemies and their action scheduler.
//!
//! ## Key Types
//!
//! - `EnemyAction`: what an enemy does on one turn
//! - `EnemyPolicy`: how an enemy picks actions for upcoming turns
//! - `ActionPlan`: per-enemy queue of planned actions, one slot per turn
//! - `Enemy` / `EnemyTemplate`: runtime enemy state and its blueprint

pub mod action;
pub mod enemy;
pub mod plan;
pub mod policy;

pub use action::{EnemyAction, PlannedAction, SkipReason};
pub use enemy::{Enemy, EnemyStatus, EnemyTemplate, StunTrigger};
pub use plan::ActionPlan;
pub use policy::EnemyPolicy;
