//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Once;

use ccg_battle::battle::Battle;
use ccg_battle::cards::CardId;
use ccg_battle::core::{BattleConfig, IntentError};
use ccg_battle::history::{Intent, IntentLog, IntentOrigin, Presentation, ResolvedEntry};
use ccg_battle::scenarios::TrainingScenario;
use ccg_battle::session::{BattleSession, SessionConfig};

static TRACING: Once = Once::new();

/// Route engine logs to the test harness. `RUST_LOG=ccg_battle=debug` shows them.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A started training session.
pub fn session(seed: u64) -> BattleSession<impl Fn() -> Battle + Clone> {
    init_tracing();
    BattleSession::start(TrainingScenario::factory(seed), SessionConfig::default())
}

/// A started session over a custom training configuration.
pub fn session_with(config: BattleConfig) -> BattleSession<impl Fn() -> Battle + Clone> {
    init_tracing();
    let scenario = TrainingScenario::with_config(config);
    BattleSession::start(move || scenario.build(), SessionConfig::default())
}

/// Resolve intents on a bare battle, keeping the log alongside.
pub struct Driver {
    pub battle: Battle,
    pub log: IntentLog,
}

impl Driver {
    pub fn new(seed: u64) -> Self {
        init_tracing();
        Self {
            battle: TrainingScenario::new(seed).build(),
            log: IntentLog::new(),
        }
    }

    /// Battle start plus the opening turn.
    pub fn started(seed: u64) -> Self {
        let mut driver = Self::new(seed);
        driver.submit(Intent::BattleStart, IntentOrigin::System).unwrap();
        driver
            .submit(Intent::StartTurn { draw: 5 }, IntentOrigin::System)
            .unwrap();
        driver
    }

    pub fn submit(&mut self, intent: Intent, origin: IntentOrigin) -> Result<ResolvedEntry, IntentError> {
        let index = self.log.push(intent, origin);
        let result = self.battle.resolve(
            index,
            origin,
            &self.log.entries()[index].intent,
            &self.log.scope(index),
        );
        if result.is_err() {
            self.log.truncate(index);
        }
        result
    }

    pub fn player(&mut self, intent: Intent) -> Result<ResolvedEntry, IntentError> {
        self.submit(intent, IntentOrigin::Player)
    }
}

/// First hand card created from `definition`.
pub fn in_hand(battle: &Battle, definition: ccg_battle::cards::DefinitionId) -> Option<CardId> {
    battle
        .hand()
        .find(|&card| battle.repository().get_unchecked(card).definition == definition)
}

/// Every presentation detail of an entry, in order.
pub fn details(entry: &ResolvedEntry) -> Vec<&Presentation> {
    entry.instructions().map(|instruction| &instruction.detail).collect()
}
