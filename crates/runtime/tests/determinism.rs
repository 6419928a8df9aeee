//! A fixed seed must reproduce a whole combat session bit for bit.

use tactics_core::{
    MissionKind, MissionState, Objective, ObjectiveCondition, Position, ShotKind,
};
use tactics_runtime::CombatSession;

fn build_session(seed: u64) -> CombatSession {
    let mut session = CombatSession::builder()
        .seed(seed)
        .mission(
            MissionState::new(MissionKind::Elimination)
                .with_objective(Objective::new("sweep", ObjectiveCondition::AllEnemiesDead)),
        )
        .build();

    session
        .spawn_from_template("rookie", Position::new(0, 0))
        .unwrap();
    session
        .spawn_from_template("sharpshooter", Position::new(0, 2))
        .unwrap();
    session
        .spawn_from_template("muton", Position::new(7, 1))
        .unwrap();
    session
}

/// The same command script against the same seed.
fn run_script(session: &mut CombatSession) {
    let rookie = session.turn_order()[1];
    let muton = session.turn_order()[0];
    let sharpshooter = session.turn_order()[2];

    for _ in 0..4 {
        session
            .resolve_attack(rookie, muton, ShotKind::Standard)
            .unwrap();
        session
            .resolve_attack(sharpshooter, muton, ShotKind::Aimed)
            .unwrap();
        session.advance_turn().unwrap();
        if session.mission_status().is_terminal() {
            break;
        }
    }
}

#[test]
fn same_seed_same_battle() {
    let mut first = build_session(0xC0FFEE);
    let mut second = build_session(0xC0FFEE);

    run_script(&mut first);
    run_script(&mut second);

    assert_eq!(first.state(), second.state());
    assert_eq!(first.events(), second.events());
}

#[test]
fn every_roll_consumes_a_nonce() {
    let mut session = build_session(5);
    let rookie = session.turn_order()[1];
    let muton = session.turn_order()[0];

    assert_eq!(session.state().turn.nonce, 0);
    session
        .resolve_attack(rookie, muton, ShotKind::Standard)
        .unwrap();
    // At least the hit roll drew; a hit also draws a crit roll.
    let after_attack = session.state().turn.nonce;
    assert!(after_attack >= 1);

    // Blocked attempts draw nothing.
    session
        .resolve_attack(rookie, muton, ShotKind::Standard)
        .unwrap();
    assert_eq!(session.state().turn.nonce, after_attack);
}
