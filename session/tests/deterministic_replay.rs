use gem_cascade_core::{Grid, Hint, LevelConfig, RandomKinds};
use gem_cascade_session::{query, Session, SessionStatus};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn deterministic_replay_produces_identical_sessions() {
    let first = replay(0x5eed);
    let second = replay(0x5eed);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(!first.moves.is_empty(), "replay should play at least one move");
    assert!(first.status.is_finished(), "replay should run to completion");
}

#[test]
fn replay_scores_match_the_move_log() {
    let outcome = replay(0xc0ffee);
    let logged: u32 = outcome.moves.iter().map(|record| record.score_delta).sum();
    assert_eq!(logged, outcome.score);
    assert!(outcome.moves.iter().all(|record| record.score_delta % 10 == 0));
}

#[derive(Debug, PartialEq, Eq)]
struct MoveRecord {
    hint: Hint,
    score_delta: u32,
    rounds: usize,
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    moves: Vec<MoveRecord>,
    reshuffles: u32,
    score: u32,
    status: SessionStatus,
    grid: Grid,
}

fn replay(seed: u64) -> ReplayOutcome {
    let level = LevelConfig::new(3, 8, 8, 6, 300, 14);
    let mut kinds = RandomKinds::new(ChaCha8Rng::seed_from_u64(seed));
    let mut session = Session::start(level, &mut kinds).expect("valid level");
    let mut moves = Vec::new();
    let mut reshuffles = 0;

    while !query::status(&session).is_finished() {
        let Some(hint) = session.hint() else {
            reshuffles += 1;
            session.reshuffle(&mut kinds).expect("session in progress");
            continue;
        };
        let report = session
            .play(hint.first(), hint.second(), &mut kinds)
            .expect("hinted swap");
        assert!(report.accepted, "hints always produce a run");
        moves.push(MoveRecord {
            hint,
            score_delta: report.score_delta,
            rounds: report.rounds.len(),
        });
    }

    ReplayOutcome {
        moves,
        reshuffles,
        score: query::score(&session),
        status: query::status(&session),
        grid: query::grid(&session).clone(),
    }
}
