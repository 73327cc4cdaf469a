//! Replay determinism tests.

mod common;

use proptest::prelude::*;

use ccg_battle::battle::Battle;
use ccg_battle::core::{IntentError, ReplayError};
use ccg_battle::history::{
    Deferred, Intent, IntentLog, IntentOrigin, ResolvedIntent, ResolvedOperation, Replayer,
    SubOperation,
};
use ccg_battle::scenarios::TrainingScenario;
use ccg_battle::session::{BattleSession, PlayProgress};

/// Drive a session with a list of choice bytes.
///
/// 0 ends the turn; anything else plays a playable card picked by the byte,
/// answering every request with the option the byte picks.
fn drive<F>(session: &mut BattleSession<F>, choices: &[u8])
where
    F: ccg_battle::history::BattleFactory,
{
    for &choice in choices {
        if session.battle().is_finished() {
            break;
        }
        let playable = session.battle().playable_cards();
        if choice == 0 || playable.is_empty() {
            if session.end_turn().is_err() {
                break;
            }
            continue;
        }

        let card = playable[usize::from(choice) % playable.len()];
        let mut progress = session.play(card);
        while let Ok(PlayProgress::Pending(_)) = progress {
            let options = &session.pending_request().unwrap().options;
            let pick = options[usize::from(choice) % options.len()];
            progress = session.resolve_request(pick);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Replaying a recorded log reproduces every entry.
    #[test]
    fn prop_replay_reproduces_entries(
        seed in any::<u64>(),
        choices in prop::collection::vec(0u8..8, 0..40),
    ) {
        let mut session = common::session(seed);
        drive(&mut session, &choices);

        let replayer = Replayer::new(TrainingScenario::factory(seed));
        let replay = replayer.verify(session.intents(), session.resolved()).unwrap();

        prop_assert_eq!(replay.snapshot, session.snapshot());
        prop_assert_eq!(replay.entries.len(), session.resolved().len());
    }

    /// Reconstructing any prefix matches the recorded snapshot at that point.
    #[test]
    fn prop_reconstruct_matches_recorded(
        seed in any::<u64>(),
        choices in prop::collection::vec(0u8..8, 1..24),
        at in any::<prop::sample::Index>(),
    ) {
        let mut session = common::session(seed);
        drive(&mut session, &choices);

        let index = at.index(session.intents().len());
        let replay = session.reconstruct_at(index + 1).unwrap();
        let recorded = session.resolved().entries()[index].final_snapshot().cloned();

        prop_assert_eq!(Some(replay.snapshot), recorded);
    }
}

/// A different seed is caught as divergence.
#[test]
fn test_verify_detects_divergence() {
    let mut session = common::session(40);
    drive(&mut session, &[1, 2, 0, 3]);

    let replayer = Replayer::new(TrainingScenario::factory(41));
    let err = replayer
        .verify(session.intents(), session.resolved())
        .unwrap_err();

    assert!(matches!(
        err,
        ReplayError::Diverged { .. } | ReplayError::Rejected { .. }
    ));
}

/// Resolvers are re-evaluated against the replayed state.
#[test]
fn test_resolver_reevaluated_on_replay() {
    let mut session = common::session(17);
    let strike = session.battle().repository().next_id();
    session
        .submit(Intent::Custom(
            ccg_battle::history::CustomIntent::new("strike").with(
                ccg_battle::history::CustomEffect::GenerateCard {
                    definition: TrainingScenario::STRIKE,
                    count: 1,
                },
            ),
        ))
        .unwrap();

    let weakest = session.resolver(|battle: &Battle| {
        battle
            .enemies()
            .iter()
            .filter(|enemy| enemy.is_active())
            .min_by_key(|enemy| enemy.hp)
            .map_or(0, |enemy| i64::from(enemy.id.raw()))
    });
    let entry = session
        .submit(Intent::play(
            strike,
            vec![SubOperation::TargetEnemy(Deferred::Resolver(weakest))],
        ))
        .unwrap();
    assert_eq!(
        entry.intent,
        ResolvedIntent::PlayCard {
            card: strike,
            operations: vec![ResolvedOperation::TargetEnemy(TrainingScenario::SLIME)],
        }
    );

    let replay = session.reconstruct_at(session.intents().len()).unwrap();
    assert_eq!(replay.entries.last().unwrap().intent, entry_intent(&session));
    assert_eq!(replay.snapshot, session.snapshot());
}

fn entry_intent<F: ccg_battle::history::BattleFactory>(session: &BattleSession<F>) -> ResolvedIntent {
    session.resolved().entries().last().unwrap().intent.clone()
}

/// A resolver producing an id outside the id space rejects the intent.
#[test]
fn test_resolver_out_of_range_rejects() {
    let mut driver = common::Driver::started(3);
    let handle = driver.log.resolver(|_| i64::from(u32::MAX) + 7);

    let result = driver.player(Intent::PlayCard {
        card: Deferred::Resolver(handle),
        operations: vec![],
    });

    assert_eq!(result, Err(IntentError::InvalidId(i64::from(u32::MAX) + 7)));
}

#[test]
#[should_panic(expected = "produced negative id")]
fn test_negative_resolver_panics() {
    let mut driver = common::Driver::started(3);
    let handle = driver.log.resolver(|_| -1);

    let _ = driver.player(Intent::PlayCard {
        card: Deferred::Resolver(handle),
        operations: vec![],
    });
}

/// Frozen intents replay to the same result as their deferred originals.
#[test]
fn test_frozen_log_replays_identically() {
    let mut session = common::session(23);
    drive(&mut session, &[3, 5, 0, 2, 2, 0, 7]);

    let mut frozen = IntentLog::new();
    for (logged, entry) in session.intents().entries().iter().zip(session.resolved().entries()) {
        frozen.push(Intent::from(entry.intent.clone()), logged.origin);
    }

    let replayer = Replayer::new(TrainingScenario::factory(23));
    let replay = replayer.verify(&frozen, session.resolved()).unwrap();
    assert_eq!(replay.snapshot, session.snapshot());
    assert_eq!(frozen.len(), session.intents().len());
    assert!(frozen
        .entries()
        .iter()
        .any(|logged| logged.origin == IntentOrigin::System));
}

/// Rebuilding at any point and resolving the same suffix reproduces the log.
#[test]
fn test_reconstruct_then_resume() {
    let mut session = common::session(61);
    drive(&mut session, &[1, 4, 0, 6, 2, 0, 5, 1]);
    let log = session.intents();
    let recorded = session.resolved().entries();

    for at in 0..log.len() {
        let mut replay = session.reconstruct_at(at).unwrap();
        for (index, logged) in log.entries().iter().enumerate().skip(at) {
            let entry = replay
                .battle
                .resolve(index, logged.origin, &logged.intent, &log.scope(index))
                .unwrap();
            assert_eq!(entry, recorded[index], "entry {index} after rebuilding at {at}");
        }
        assert_eq!(replay.battle.snapshot(), session.snapshot());
    }
}
