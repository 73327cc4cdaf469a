//! Benchmarks for resolution and replay.
//!
//! Undo and retry rebuild the battle from the start of the log, so replay
//! cost grows with log length. These track that hot path.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ccg_battle::history::Replayer;
use ccg_battle::scenarios::TrainingScenario;
use ccg_battle::session::{BattleSession, PlayProgress, SessionConfig};

/// Play a fixed number of turns, spending energy on the first playable card.
fn recorded_session(seed: u64, turns: u32) -> BattleSession<impl Fn() -> ccg_battle::Battle + Clone> {
    let mut session = BattleSession::start(TrainingScenario::factory(seed), SessionConfig::default());
    for _ in 0..turns {
        while let Some(&card) = session.battle().playable_cards().first() {
            let mut progress = session.play(card);
            while let Ok(PlayProgress::Pending(_)) = progress {
                let pick = session.pending_request().map_or(0, |request| request.options[0]);
                progress = session.resolve_request(pick);
            }
            if progress.is_err() || session.battle().is_finished() {
                break;
            }
        }
        if session.battle().is_finished() || session.end_turn().is_err() {
            break;
        }
    }
    session
}

fn bench_build(c: &mut Criterion) {
    let scenario = TrainingScenario::new(42);

    c.bench_function("build_training_battle", |b| {
        b.iter(|| black_box(scenario.build()));
    });
}

fn bench_opening(c: &mut Criterion) {
    c.bench_function("start_session", |b| {
        b.iter(|| {
            let session =
                BattleSession::start(TrainingScenario::factory(black_box(42)), SessionConfig::default());
            black_box(session.resolved().len())
        });
    });
}

fn bench_replay(c: &mut Criterion) {
    let session = recorded_session(42, 6);
    let replayer = Replayer::new(TrainingScenario::factory(42));
    let len = session.intents().len();

    c.bench_function("replay_six_turns", |b| {
        b.iter(|| {
            let replay = replayer.replay(black_box(session.intents()), len);
            black_box(replay.map(|replay| replay.entries.len()))
        });
    });

    c.bench_function("verify_six_turns", |b| {
        b.iter(|| {
            let replay = replayer.verify(session.intents(), black_box(session.resolved()));
            black_box(replay.is_ok())
        });
    });
}

fn bench_undo(c: &mut Criterion) {
    c.bench_function("undo_after_six_turns", |b| {
        b.iter_batched(
            || recorded_session(7, 6),
            |mut session| {
                let _ = session.undo();
                black_box(session.intents().len())
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_build, bench_opening, bench_replay, bench_undo);
criterion_main!(benches);
