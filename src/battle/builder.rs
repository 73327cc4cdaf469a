//! Battle construction.

use std::sync::Arc;

use super::phase::{BattleStatus, Phase};
use super::player::Player;
use super::recorder::Recorder;
use super::scheduled::ScheduledQueue;
use super::state::Battle;
use crate::cards::{CardLibrary, CardRepository, DefinitionId};
use crate::core::{BattleConfig, BattleRng, EnemyId};
use crate::enemies::{Enemy, EnemyAction, EnemyPolicy, EnemyTemplate};
use crate::modifiers::ModifierIds;
use crate::zones::Zones;

/// Builder for a battle in its `Setup` phase.
///
/// `build` takes `&self`, so one builder can serve as a battle factory.
///
/// ```
/// use std::sync::Arc;
/// use ccg_battle::battle::{BattleBuilder, Phase};
/// use ccg_battle::cards::{CardCategory, CardDefinition, CardEffect, CardLibrary, DefinitionId};
/// use ccg_battle::core::BattleConfig;
/// use ccg_battle::damage::DamageBase;
/// use ccg_battle::enemies::{EnemyAction, EnemyPolicy, EnemyTemplate};
///
/// let mut library = CardLibrary::new();
/// library.register(
///     CardDefinition::new(DefinitionId::new(1), "Strike", CardCategory::Attack, 1)
///         .with_effect(CardEffect::strike(6)),
/// );
///
/// let battle = BattleBuilder::new(BattleConfig::new(7), Arc::new(library))
///     .player_hp(30)
///     .card(DefinitionId::new(1), 8)
///     .enemy(EnemyTemplate::new("Slime", 12, EnemyPolicy::Cycle(vec![
///         EnemyAction::attack(DamageBase::single(3)),
///     ])))
///     .build();
///
/// assert_eq!(battle.phase(), Phase::Setup);
/// assert_eq!(battle.zones().total(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct BattleBuilder {
    config: Arc<BattleConfig>,
    library: Arc<CardLibrary>,
    player_hp: u32,
    deck: Vec<DefinitionId>,
    enemies: Vec<EnemyTemplate>,
}

impl BattleBuilder {
    /// Start a builder.
    #[must_use]
    pub fn new(config: BattleConfig, library: Arc<CardLibrary>) -> Self {
        Self {
            config: Arc::new(config),
            library,
            player_hp: 50,
            deck: Vec::new(),
            enemies: Vec::new(),
        }
    }

    /// Set the player's HP.
    #[must_use]
    pub fn player_hp(mut self, hp: u32) -> Self {
        assert!(hp > 0, "Player needs at least 1 HP");
        self.player_hp = hp;
        self
    }

    /// Add copies of a card to the deck.
    #[must_use]
    pub fn card(mut self, definition: DefinitionId, copies: usize) -> Self {
        assert!(
            self.library.contains(definition),
            "{definition} is not in the card library"
        );
        self.deck.extend(std::iter::repeat(definition).take(copies));
        self
    }

    /// Add an enemy.
    #[must_use]
    pub fn enemy(mut self, template: EnemyTemplate) -> Self {
        for definition in memory_cards(&template.policy) {
            assert!(
                self.library.contains(definition),
                "{} leaves {definition}, which is not in the card library",
                template.name
            );
        }
        self.enemies.push(template);
        self
    }

    /// Build the battle.
    #[must_use]
    pub fn build(&self) -> Battle {
        assert!(!self.enemies.is_empty(), "A battle needs at least one enemy");

        let mut repository = CardRepository::new(Arc::clone(&self.library));
        let deck: Vec<_> = self.deck.iter().map(|&def| repository.create(def)).collect();

        let mut modifier_ids = ModifierIds::default();
        let enemies = self
            .enemies
            .iter()
            .enumerate()
            .map(|(idx, template)| {
                let id = EnemyId::new(idx as u32);
                Enemy::from_template(id, template, &self.config, &mut modifier_ids)
            })
            .collect();

        Battle {
            repository,
            zones: Zones::with_deck(deck),
            player: Player::new(self.player_hp, self.config.max_energy),
            enemies,
            turn: 0,
            phase: Phase::Setup,
            status: BattleStatus::InProgress,
            rng: BattleRng::new(self.config.seed).for_context("deck"),
            modifier_ids,
            scheduled: ScheduledQueue::new(),
            recorder: Recorder::new(),
            wait_override: None,
            config: Arc::clone(&self.config),
        }
    }
}

fn memory_cards(policy: &EnemyPolicy) -> Vec<DefinitionId> {
    let from_actions = |actions: &mut dyn Iterator<Item = &EnemyAction>| -> Vec<DefinitionId> {
        actions
            .filter_map(|action| match action {
                EnemyAction::Attack { memory, .. } => *memory,
                _ => None,
            })
            .collect()
    };

    match policy {
        EnemyPolicy::Cycle(actions) => from_actions(&mut actions.iter()),
        EnemyPolicy::Weighted(entries) => from_actions(&mut entries.iter().map(|(a, _)| a)),
        EnemyPolicy::Opening { opening, then } => {
            let mut found = from_actions(&mut opening.iter());
            found.extend(memory_cards(then));
            found
        }
    }
}
