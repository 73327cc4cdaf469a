//! Intent log, resolved log, and replay.
//!
//! ## Key Types
//!
//! - `Intent` / `Deferred`: requests as recorded, with lazily bound ids
//! - `IntentLog`: the append-only intent sequence and its resolver table
//! - `ResolvedEntry` / `AnimationBatch` / `Instruction`: what resolution
//!   produced, ready for presentation
//! - `Replayer`: rebuilds a battle from a factory and a log prefix

pub mod instruction;
pub mod intent;
pub mod log;
pub mod replay;
pub mod resolved;

pub use instruction::{Instruction, Presentation, ScheduleOutcome, Stage};
pub use intent::{
    CustomEffect, CustomIntent, Deferred, FromResolved, Intent, IntentOrigin, ResolvedIntent,
    ResolvedOperation, ResolverHandle, SubOperation,
};
pub use log::{IntentLog, LoggedIntent, ResolverFn, ResolverScope};
pub use replay::{BattleFactory, Replay, Replayer};
pub use resolved::{AnimationBatch, BatchId, ResolvedEntry, ResolvedLog};
