//! # ccg-battle
//!
//! A deterministic action-resolution and replay engine for turn-based card
//! battles.
//!
//! ## Design Principles
//!
//! 1. **Intents In, History Out**: Every change to a battle is an `Intent`
//!    appended to a log. Resolving it produces a `ResolvedEntry`: ordered
//!    animation batches, each sealed with a snapshot of the state after it.
//!
//! 2. **All Or Nothing**: An intent resolves against a scratch copy of the
//!    battle and is committed only if it succeeds. A rejected intent leaves
//!    no trace in the state or the logs.
//!
//! 3. **Replay Is The Truth**: Undo, retry and reconstruction truncate the
//!    intent log and re-run it from a freshly built battle. The same seed and
//!    log always give the same entries.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: Zones, plans and snapshots use `im-rs`,
//!   so scratch copies and per-batch snapshots share structure.
//!
//! - **No Clock**: Wait hints are data attached to instructions. The engine
//!   never sleeps and never reads time.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, RNG, configuration, errors
//! - `cards`: Card definitions, instances, the battle repository
//! - `zones`: Deck, hand, discard and exile
//! - `modifiers`: Modifier kinds and per-combatant sets
//! - `damage`: Damage pipeline with ordered modifier contributions
//! - `enemies`: Enemy state, policies and action plans
//! - `battle`: Battle state and intent resolution
//! - `snapshot`: Read-only projections and patches
//! - `history`: Intents, instructions, logs and replay
//! - `session`: Undo, retry and interaction requests over a battle
//! - `scenarios`: A ready-made training battle

pub mod core;
pub mod cards;
pub mod zones;
pub mod modifiers;
pub mod damage;
pub mod enemies;
pub mod battle;
pub mod snapshot;
pub mod history;
pub mod session;
pub mod scenarios;

// Re-export commonly used types
pub use crate::core::{
    BattleConfig, Pacing,
    CombatantId, EnemyId, ModifierId,
    BattleRng, BattleRngState,
    IntentError, ReplayError, SessionError,
};

pub use crate::cards::{
    CardId, Card, CardDefinition, CardEffect, CardLibrary, CardTag, DefinitionId,
};

pub use crate::zones::{ZoneKind, Zones};

pub use crate::modifiers::{ModifierKind, ModifierSet};

pub use crate::damage::{resolve_damage, DamageBase, DamageDescriptor};

pub use crate::enemies::{ActionPlan, Enemy, EnemyAction, EnemyPolicy, EnemyTemplate};

pub use crate::battle::{Battle, BattleBuilder, BattleStatus, Phase};

pub use crate::snapshot::{BattleSnapshot, SnapshotPatch};

pub use crate::history::{
    AnimationBatch, Instruction, Intent, IntentLog, Presentation, ResolvedEntry, ResolvedLog,
    Replayer, Stage,
};

pub use crate::session::{BattleSession, SessionConfig};
