//! Core engine types: identities, RNG, configuration, errors.
//!
//! These are shared by every other module and depend on nothing above
//! them except the few types they name in error messages.

pub mod config;
pub mod entity;
pub mod error;
pub mod rng;

pub use config::{BattleConfig, Pacing};
pub use entity::{CombatantId, EnemyId, ModifierId};
pub use error::{IntentError, ReplayError, SessionError};
pub use rng::{BattleRng, BattleRngState};
