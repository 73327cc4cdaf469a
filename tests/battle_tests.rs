//! Battle resolution tests against the training scenario.

mod common;

use ccg_battle::battle::{BattleStatus, Phase};
use ccg_battle::core::{BattleConfig, CombatantId, IntentError, Pacing};
use ccg_battle::enemies::{EnemyAction, EnemyStatus, PlannedAction, SkipReason};
use ccg_battle::history::{
    CustomEffect, CustomIntent, Intent, Presentation, ScheduleOutcome, Stage,
};
use ccg_battle::modifiers::ModifierKind;
use ccg_battle::scenarios::TrainingScenario;
use ccg_battle::zones::ZoneKind;

use common::{details, Driver};

fn generate(definition: ccg_battle::cards::DefinitionId, count: u32) -> Intent {
    Intent::Custom(
        CustomIntent::new("generate").with(CustomEffect::GenerateCard { definition, count }),
    )
}

/// Boosted heavy strike kills the Slime; the defeat gets its own batch.
#[test]
fn test_heavy_strike_defeats_slime() {
    let mut driver = Driver::started(3);
    let card = driver.battle.repository().next_id();
    driver
        .player(Intent::Custom(
            CustomIntent::new("setup")
                .with(CustomEffect::ApplyModifier {
                    target: CombatantId::Player,
                    kind: ModifierKind::Strength,
                    magnitude: 10,
                })
                .with(CustomEffect::GenerateCard {
                    definition: TrainingScenario::HEAVY_STRIKE,
                    count: 1,
                }),
        ))
        .unwrap();

    let entry = driver
        .player(Intent::play_targeted(card, TrainingScenario::SLIME))
        .unwrap();

    let first = &entry.batches[0];
    assert!(first.has_stage(Stage::CardMove));
    assert!(first.patch.zones().contains(&ZoneKind::Hand));
    assert!(first.patch.zones().contains(&ZoneKind::Discard));
    assert_eq!(first.patch.player.as_ref().map(|p| p.energy), Some(1));

    let damage_at = entry
        .batches
        .iter()
        .position(|batch| batch.has_stage(Stage::Damage))
        .unwrap();
    let damage = &entry.batches[damage_at].instructions[0];
    let Presentation::Damage {
        descriptor,
        hits,
        hp_lost,
        ..
    } = &damage.detail
    else {
        panic!("expected damage, got {:?}", damage.detail);
    };
    assert_eq!(descriptor.amount, 30);
    assert_eq!(*hits, 1);
    assert_eq!(*hp_lost, 10);
    assert_eq!(damage.wait_ms, 650);

    assert!(entry.batches[damage_at + 1].has_stage(Stage::Defeat));
    let slime = driver.battle.enemy(TrainingScenario::SLIME).unwrap();
    assert_eq!(slime.hp, 0);
    assert_eq!(slime.status, EnemyStatus::Defeated);
    assert!(slime.plan.is_empty());
    assert_eq!(driver.battle.status(), BattleStatus::InProgress);
}

/// Batches carry snapshots that chain through their patches.
#[test]
fn test_patches_chain() {
    let mut driver = Driver::new(8);
    let mut entries = vec![driver.player(Intent::BattleStart).unwrap()];
    entries.push(driver.player(Intent::StartTurn { draw: 5 }).unwrap());
    entries.push(driver.player(Intent::EndTurn).unwrap());

    let batches: Vec<_> = entries.iter().flat_map(|entry| &entry.batches).collect();
    assert_eq!(batches[0].patch, ccg_battle::snapshot::SnapshotPatch::full(&batches[0].snapshot));

    for pair in batches.windows(2) {
        assert!(pair[1].id > pair[0].id);
        assert_eq!(pair[1].patch.apply(&pair[0].snapshot), pair[1].snapshot);
    }
    assert_eq!(
        entries.last().unwrap().final_snapshot(),
        Some(&driver.battle.snapshot())
    );
}

/// Moving and generating cards never loses or duplicates one.
#[test]
fn test_zone_conservation() {
    let mut driver = Driver::started(5);
    let check = |driver: &Driver, expected: usize| {
        let snapshot = driver.battle.snapshot();
        assert_eq!(snapshot.total_cards(), expected);
        assert_eq!(driver.battle.zones().total(), expected);
    };
    check(&driver, TrainingScenario::DECK_SIZE);

    driver.player(generate(TrainingScenario::ECHO, 2)).unwrap();
    check(&driver, TrainingScenario::DECK_SIZE + 2);

    for _ in 0..3 {
        driver.player(Intent::EndTurn).unwrap();
        if driver.battle.is_finished() {
            break;
        }
        driver.player(Intent::StartTurn { draw: 5 }).unwrap();
        let generated = driver.battle.repository().len();
        check(&driver, generated);
    }
}

/// A generated card over capacity is placed and announced.
#[test]
fn test_generated_card_overflows_hand() {
    let config = BattleConfig::new(4)
        .with_pacing(Pacing::instant())
        .with_hand_capacity(5);
    let mut session = common::session_with(config);
    assert_eq!(session.snapshot().hand.len(), 5);

    let card = session.battle().repository().next_id();
    let entry = session.submit(generate(TrainingScenario::ECHO, 1)).unwrap();

    assert!(details(entry).iter().any(|detail| matches!(
        detail,
        Presentation::HandOverflow { card: Some(c), hand: 6, capacity: 5, .. } if *c == card
    )));
    assert_eq!(session.snapshot().hand.len(), 6);
}

/// Draws stop at capacity and report how many were skipped.
#[test]
fn test_draw_blocked_by_capacity() {
    let config = BattleConfig::new(4)
        .with_pacing(Pacing::instant())
        .with_hand_capacity(3);
    let mut session = common::session_with(config);

    let opening = &session.resolved().entries()[1];
    assert!(details(opening).iter().any(|detail| matches!(
        detail,
        Presentation::HandOverflow { card: None, blocked: 2, hand: 3, capacity: 3 }
    )));
    assert_eq!(session.snapshot().hand.len(), 3);
    assert_eq!(session.snapshot().deck.len(), TrainingScenario::DECK_SIZE - 3);

    session.end_turn().unwrap();
    assert!(session.snapshot().hand.len() <= 3);
}

/// Stunning the Thief rewrites only its current slot.
#[test]
fn test_stun_overrides_front_slot() {
    let mut driver = Driver::started(11);
    let before = driver.battle.snapshot();

    let entry = driver
        .player(Intent::Custom(CustomIntent::new("stun").with(
            CustomEffect::ApplyModifier {
                target: CombatantId::Enemy(TrainingScenario::THIEF),
                kind: ModifierKind::Stun,
                magnitude: 2,
            },
        )))
        .unwrap();
    assert!(details(&entry)
        .iter()
        .any(|detail| matches!(detail, Presentation::Stun { turn: Some(1), .. })));

    let after = driver.battle.snapshot();
    let thief = after.enemy(TrainingScenario::THIEF).unwrap();
    assert_eq!(
        thief.plan.front(),
        Some(&PlannedAction {
            turn: 1,
            action: EnemyAction::Skip {
                reason: SkipReason::Stunned
            },
        })
    );
    assert_eq!(
        thief.planned(2),
        before.enemy(TrainingScenario::THIEF).unwrap().planned(2)
    );
    assert_eq!(thief.modifiers.magnitude(ModifierKind::Stun), 0);
    assert_eq!(
        after.enemy(TrainingScenario::SLIME),
        before.enemy(TrainingScenario::SLIME)
    );

    // The Thief's opening attack (2 × 2) never lands.
    let mut control = Driver::started(11);
    control.player(Intent::EndTurn).unwrap();
    driver.player(Intent::EndTurn).unwrap();
    assert_eq!(driver.battle.player().hp, control.battle.player().hp + 4);
}

/// Stacks below the threshold stay on the enemy.
#[test]
fn test_stun_below_threshold_waits() {
    let mut driver = Driver::started(11);

    driver
        .player(Intent::Custom(CustomIntent::new("stun").with(
            CustomEffect::ApplyModifier {
                target: CombatantId::Enemy(TrainingScenario::SLIME),
                kind: ModifierKind::Stun,
                magnitude: 2,
            },
        )))
        .unwrap();

    let slime = driver.battle.enemy(TrainingScenario::SLIME).unwrap();
    assert_eq!(slime.modifiers.magnitude(ModifierKind::Stun), 2);
    assert!(!slime.plan.front().unwrap().action.is_skip());
}

/// A delayed strike fizzles when its target is gone.
#[test]
fn test_scheduled_event_fizzles() {
    let mut driver = Driver::started(2);
    let fuse = driver.battle.repository().next_id();
    driver.player(generate(TrainingScenario::FUSE, 1)).unwrap();
    let entry = driver
        .player(Intent::play_targeted(fuse, TrainingScenario::SLIME))
        .unwrap();
    assert!(details(&entry).iter().any(|detail| matches!(
        detail,
        Presentation::Scheduled { outcome: ScheduleOutcome::Queued, .. }
    )));
    assert_eq!(driver.battle.scheduled().len(), 1);

    driver
        .player(Intent::Custom(CustomIntent::new("finish").with(
            CustomEffect::DamageEnemy {
                enemy: TrainingScenario::SLIME,
                amount: 10,
            },
        )))
        .unwrap();
    driver.player(Intent::EndTurn).unwrap();
    let entry = driver.player(Intent::StartTurn { draw: 5 }).unwrap();

    assert!(details(&entry).iter().any(|detail| matches!(
        detail,
        Presentation::Scheduled { outcome: ScheduleOutcome::Fizzled, .. }
    )));
    assert!(driver.battle.scheduled().is_empty());
}

/// A delayed strike fires at the start of the due turn.
#[test]
fn test_scheduled_event_fires() {
    let mut driver = Driver::started(2);
    let fuse = driver.battle.repository().next_id();
    driver.player(generate(TrainingScenario::FUSE, 1)).unwrap();
    driver
        .player(Intent::play_targeted(fuse, TrainingScenario::WRAITH))
        .unwrap();

    driver.player(Intent::EndTurn).unwrap();
    let entry = driver.player(Intent::StartTurn { draw: 5 }).unwrap();

    let fired = entry
        .batches
        .iter()
        .position(|batch| batch.has_stage(Stage::Scheduled))
        .unwrap();
    assert!(entry.batches[fired + 1].has_stage(Stage::Damage));
    // 12 less one Hard Shell.
    assert_eq!(driver.battle.enemy(TrainingScenario::WRAITH).unwrap().hp, 13);
}

/// Wraith attacks leave Echo cards in hand.
#[test]
fn test_memory_card_generated() {
    let mut driver = Driver::started(6);

    let entry = driver.player(Intent::EndTurn).unwrap();

    let echo = details(&entry).into_iter().find_map(|detail| match detail {
        Presentation::MemoryCard { enemy, card } => Some((*enemy, *card)),
        _ => None,
    });
    let (enemy, card) = echo.expect("wraith should leave a memory card");
    assert_eq!(enemy, TrainingScenario::WRAITH);
    assert_eq!(
        driver.battle.repository().get_unchecked(card).definition,
        TrainingScenario::ECHO
    );
    assert_eq!(driver.battle.snapshot().locate(card), Some(ZoneKind::Hand));
}

/// Rejected intents report why and leave the battle untouched.
#[test]
fn test_intent_errors() {
    let mut driver = Driver::started(9);
    let before = driver.battle.snapshot();

    let missing = ccg_battle::cards::CardId::new(999);
    assert_eq!(
        driver.player(Intent::play(missing, vec![])),
        Err(IntentError::UnknownCard(missing))
    );

    let in_deck = before.deck[0].id;
    assert_eq!(
        driver.player(Intent::play(in_deck, vec![])),
        Err(IntentError::CardNotInHand(in_deck))
    );

    assert_eq!(
        driver.player(Intent::StartTurn { draw: 5 }),
        Err(IntentError::WrongPhase {
            intent: "start-turn",
            phase: Phase::PlayerAct
        })
    );

    assert_eq!(driver.battle.snapshot(), before);
    assert_eq!(driver.log.len(), 2);
}

#[test]
fn test_not_affordable_rolls_back() {
    let mut driver = Driver::started(9);
    let first = driver.battle.repository().next_id();
    driver
        .player(generate(TrainingScenario::HEAVY_STRIKE, 2))
        .unwrap();
    let second = ccg_battle::cards::CardId::new(first.raw() + 1);

    driver
        .player(Intent::play_targeted(first, TrainingScenario::WRAITH))
        .unwrap();
    let before = driver.battle.snapshot();

    assert_eq!(
        driver.player(Intent::play_targeted(second, TrainingScenario::WRAITH)),
        Err(IntentError::NotAffordable {
            card: second,
            cost: 2,
            available: 1
        })
    );
    assert_eq!(driver.battle.snapshot(), before);
}

#[test]
fn test_missing_and_illegal_targets() {
    let mut driver = Driver::started(9);
    let card = driver.battle.repository().next_id();
    driver.player(generate(TrainingScenario::STRIKE, 1)).unwrap();

    assert_eq!(
        driver.player(Intent::play(card, vec![])),
        Err(IntentError::MissingTarget(card))
    );

    driver
        .player(Intent::Custom(CustomIntent::new("kill").with(
            CustomEffect::DamageEnemy {
                enemy: TrainingScenario::SLIME,
                amount: 50,
            },
        )))
        .unwrap();
    assert_eq!(
        driver.player(Intent::play_targeted(card, TrainingScenario::SLIME)),
        Err(IntentError::IllegalTarget(TrainingScenario::SLIME))
    );
    assert_eq!(
        driver.player(Intent::Custom(CustomIntent::new("again").with(
            CustomEffect::DamageEnemy {
                enemy: TrainingScenario::SLIME,
                amount: 1,
            },
        ))),
        Err(IntentError::IllegalTarget(TrainingScenario::SLIME))
    );
}

/// Clearing every enemy wins; later intents are refused.
#[test]
fn test_victory_ends_battle() {
    let mut driver = Driver::started(1);
    let mut custom = CustomIntent::new("wipe");
    for enemy in [
        TrainingScenario::SLIME,
        TrainingScenario::WRAITH,
        TrainingScenario::THIEF,
    ] {
        custom = custom.with(CustomEffect::DamageEnemy { enemy, amount: 100 });
    }

    let entry = driver.player(Intent::Custom(custom)).unwrap();

    assert_eq!(driver.battle.status(), BattleStatus::Victory);
    assert!(entry.batches.last().unwrap().has_stage(Stage::Victory));
    assert_eq!(
        driver.player(Intent::EndTurn),
        Err(IntentError::BattleFinished)
    );
}

/// The Thief escapes on its third turn.
#[test]
fn test_thief_escapes() {
    let mut driver = Driver::started(1);

    for _ in 0..3 {
        driver.player(Intent::EndTurn).unwrap();
        driver.player(Intent::StartTurn { draw: 5 }).unwrap();
    }

    assert_eq!(
        driver.battle.enemy(TrainingScenario::THIEF).unwrap().status,
        EnemyStatus::Escaped
    );
    assert!(driver.battle.legal_targets().iter().all(|&id| id != TrainingScenario::THIEF));
}

/// Retained cards stay in hand across the end of a turn.
#[test]
fn test_retain_survives_end_turn() {
    let mut driver = Driver::started(13);
    let meditate = driver.battle.repository().next_id();
    driver.player(generate(TrainingScenario::MEDITATE, 1)).unwrap();

    driver.player(Intent::EndTurn).unwrap();

    let snapshot = driver.battle.snapshot();
    assert_eq!(snapshot.locate(meditate), Some(ZoneKind::Hand));
    assert_eq!(snapshot.phase, Phase::TurnPending);
}

/// A memory card landing in a full hand is placed and announced.
#[test]
fn test_memory_card_overflows_hand() {
    let config = BattleConfig::new(6)
        .with_pacing(Pacing::instant())
        .with_hand_capacity(1);
    let mut session = common::session_with(config);
    let meditate = session.battle().repository().next_id();
    session.submit(generate(TrainingScenario::MEDITATE, 1)).unwrap();
    let retained = session
        .battle()
        .hand()
        .filter(|&card| {
            session
                .battle()
                .repository()
                .get_unchecked(card)
                .has_tag(ccg_battle::cards::CardTag::Retain)
        })
        .count();

    let entries = session.end_turn().unwrap();

    let end_turn = &entries[0];
    let overflow = details(end_turn).into_iter().find_map(|detail| match detail {
        Presentation::HandOverflow {
            card: Some(card),
            hand,
            capacity,
            ..
        } => Some((*card, *hand, *capacity)),
        _ => None,
    });
    let (card, hand, capacity) = overflow.expect("memory card should overflow the hand");
    assert_eq!((hand, capacity), (retained + 1, 1));
    assert!(details(end_turn).iter().any(|detail| matches!(
        detail,
        Presentation::MemoryCard { enemy, card: c } if *enemy == TrainingScenario::WRAITH && *c == card
    )));

    let snapshot = end_turn.final_snapshot().unwrap();
    assert_eq!(snapshot.hand.len(), retained + 1);
    assert_eq!(snapshot.locate(meditate), Some(ZoneKind::Hand));
    assert_eq!(snapshot.locate(card), Some(ZoneKind::Hand));
}

/// Huge delays saturate instead of wrapping; the event just never comes due.
#[test]
fn test_schedule_delay_saturates() {
    let mut driver = Driver::started(2);

    driver
        .player(Intent::Custom(CustomIntent::new("far").with(
            CustomEffect::ScheduleStun {
                enemy: TrainingScenario::SLIME,
                magnitude: 1,
                delay: u32::MAX,
            },
        )))
        .unwrap();

    let pending = driver.battle.scheduled().view();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].due_turn, u32::MAX);

    driver.player(Intent::EndTurn).unwrap();
    driver.player(Intent::StartTurn { draw: 5 }).unwrap();
    assert_eq!(driver.battle.scheduled().len(), 1);
}

/// Energy gains saturate at the top of the range.
#[test]
fn test_energy_gain_saturates() {
    use std::sync::Arc;

    use ccg_battle::battle::BattleBuilder;
    use ccg_battle::cards::{CardCategory, CardDefinition, CardEffect, CardLibrary, DefinitionId};
    use ccg_battle::enemies::{EnemyPolicy, EnemyTemplate};

    let surge = DefinitionId::new(1);
    let mut library = CardLibrary::new();
    library.register(
        CardDefinition::new(surge, "Surge", CardCategory::Skill, 0)
            .with_effect(CardEffect::GainEnergy(u32::MAX)),
    );
    let builder = BattleBuilder::new(BattleConfig::new(1).with_pacing(Pacing::instant()), Arc::new(library))
        .card(surge, 2)
        .enemy(EnemyTemplate::new("Dummy", 5, EnemyPolicy::Cycle(vec![EnemyAction::idle()])));
    let mut driver = Driver {
        battle: builder.build(),
        log: ccg_battle::history::IntentLog::new(),
    };
    driver.player(Intent::BattleStart).unwrap();
    driver.player(Intent::StartTurn { draw: 2 }).unwrap();

    let hand: Vec<_> = driver.battle.hand().collect();
    for card in hand {
        driver.player(Intent::play(card, vec![])).unwrap();
    }

    assert_eq!(driver.battle.player().energy, u32::MAX);
}
