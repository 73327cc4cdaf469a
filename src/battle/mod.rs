//! The battle state machine.
//!
//! ## Phases
//!
//! `Setup → TurnPending → PlayerAct → EnemyTurn → TurnPending → …`
//!
//! Transitions happen only through resolved intents; even the enemy turn is
//! part of resolving `EndTurn`.
//!
//! ## Atomicity
//!
//! `Battle::resolve` runs the intent against a clone and swaps it in only
//! when the intent succeeds. A rejected intent leaves the battle exactly as
//! it was, including the RNG position.

pub mod builder;
mod enemy_turn;
pub mod phase;
mod play;
pub mod player;
pub mod recorder;
mod resolve;
pub mod scheduled;
pub mod state;

pub use builder::BattleBuilder;
pub use phase::{BattleStatus, Phase};
pub use player::Player;
pub use recorder::Recorder;
pub use scheduled::{ScheduledEvent, ScheduledQueue};
pub use state::Battle;
