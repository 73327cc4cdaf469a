//! Orchestration over the battle and its logs.
//!
//! `BattleSession` is what a presentation layer talks to. It appends intents
//! to the log, resolves them, keeps the resolved log, and implements undo and
//! retry by truncating the intent log and replaying from the start.

pub mod controller;
pub mod interaction;

pub use controller::{BattleSession, PlayProgress, SessionConfig};
pub use interaction::{InteractionRequest, RequestKind, RequestOutcome};
