//! Battle configuration.
//!
//! Battles are configured at build time by providing:
//! - `BattleConfig`: seed, zone capacities, resource pools, planning horizon
//! - `Pacing`: author-specified wait hints per presentation stage
//!
//! The engine never reads a clock. Wait durations are copied into the
//! instructions it emits and interpreted only by the presentation layer.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::history::Stage;

/// Wait hints (milliseconds) attached to emitted instructions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacing {
    /// Wait for stages without an explicit entry.
    pub default_ms: u32,

    /// Per-stage waits.
    pub stages: FxHashMap<Stage, u32>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(150)
            .with_stage(Stage::BattleStart, 600)
            .with_stage(Stage::TurnStart, 300)
            .with_stage(Stage::TurnEnd, 300)
            .with_stage(Stage::CardMove, 200)
            .with_stage(Stage::Damage, 400)
            .with_stage(Stage::Defeat, 600)
            .with_stage(Stage::EnemyHighlight, 500)
            .with_stage(Stage::MemoryCard, 500)
            .with_stage(Stage::HandOverflow, 700)
            .with_stage(Stage::Victory, 800)
            .with_stage(Stage::PlayerDefeat, 800)
    }
}

impl Pacing {
    /// Create a pacing table where every stage waits `default_ms`.
    #[must_use]
    pub fn new(default_ms: u32) -> Self {
        Self {
            default_ms,
            stages: FxHashMap::default(),
        }
    }

    /// A table with no waits at all (tests, headless simulation).
    #[must_use]
    pub fn instant() -> Self {
        Self::new(0)
    }

    /// Set the wait for one stage.
    #[must_use]
    pub fn with_stage(mut self, stage: Stage, wait_ms: u32) -> Self {
        self.stages.insert(stage, wait_ms);
        self
    }

    /// Wait hint for a stage.
    #[must_use]
    pub fn wait_for(&self, stage: Stage) -> u32 {
        self.stages.get(&stage).copied().unwrap_or(self.default_ms)
    }
}

/// Complete battle configuration.
///
/// ```
/// use ccg_battle::core::BattleConfig;
///
/// let config = BattleConfig::new(42)
///     .with_hand_capacity(8)
///     .with_draw_per_turn(4);
///
/// assert_eq!(config.hand_capacity, 8);
/// assert_eq!(config.draw_per_turn, 4);
/// assert_eq!(config.plan_horizon, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Seed for every random stream in the battle.
    pub seed: u64,

    /// Maximum cards the hand holds before draws stop.
    pub hand_capacity: usize,

    /// Energy restored at each turn start.
    pub max_energy: u32,

    /// Cards drawn by the first `StartTurn` a session issues.
    pub opening_draw: u32,

    /// Cards drawn by every later `StartTurn` a session issues.
    pub draw_per_turn: u32,

    /// How many upcoming turns each enemy keeps planned.
    pub plan_horizon: u32,

    /// Stun stacks needed to skip an enemy's action, unless the enemy
    /// template overrides it.
    pub stun_threshold: u32,

    /// Wait hints for emitted instructions.
    pub pacing: Pacing,

    /// Compare recomputed entries against recorded ones on reconstruction.
    pub verify_replays: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

impl BattleConfig {
    /// Create a configuration with default rules and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            hand_capacity: 10,
            max_energy: 3,
            opening_draw: 5,
            draw_per_turn: 5,
            plan_horizon: 2,
            stun_threshold: 3,
            pacing: Pacing::default(),
            verify_replays: true,
        }
    }

    /// Set the hand capacity.
    #[must_use]
    pub fn with_hand_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Hand capacity must be at least 1");
        self.hand_capacity = capacity;
        self
    }

    /// Set the per-turn energy.
    #[must_use]
    pub fn with_max_energy(mut self, energy: u32) -> Self {
        self.max_energy = energy;
        self
    }

    /// Set the opening draw.
    #[must_use]
    pub fn with_opening_draw(mut self, count: u32) -> Self {
        self.opening_draw = count;
        self
    }

    /// Set the per-turn draw.
    #[must_use]
    pub fn with_draw_per_turn(mut self, count: u32) -> Self {
        self.draw_per_turn = count;
        self
    }

    /// Set the planning horizon.
    #[must_use]
    pub fn with_plan_horizon(mut self, turns: u32) -> Self {
        assert!(turns > 0, "Planning horizon must be at least 1 turn");
        self.plan_horizon = turns;
        self
    }

    /// Set the default stun threshold.
    #[must_use]
    pub fn with_stun_threshold(mut self, stacks: u32) -> Self {
        assert!(stacks > 0, "Stun threshold must be at least 1");
        self.stun_threshold = stacks;
        self
    }

    /// Set the pacing table.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Enable or disable replay verification.
    #[must_use]
    pub fn with_verify_replays(mut self, verify: bool) -> Self {
        self.verify_replays = verify;
        self
    }

    /// Cards to draw for the given turn number (1-based).
    #[must_use]
    pub fn draw_for_turn(&self, turn: u32) -> u32 {
        if turn <= 1 {
            self.opening_draw
        } else {
            self.draw_per_turn
        }
    }
}
