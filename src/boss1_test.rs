use super::{boss1_movement, check_boss1_hit, propagate_quadrants};
use crate::def::{ActorKind, BOSS, FUNC_EXPLOSION, MOVE_EXPLOSION};
use crate::env::Sound;
use crate::test_util::{setup_boss, spawn_walker, test_env, test_world};

#[test]
fn test_boss_hit_pool_and_iframes() {
    let mut w = test_world();
    let mut env = test_env();
    setup_boss(&mut w, 1, 160, 80);

    assert!(!check_boss1_hit(BOSS + 2, 10, &mut w, &mut env));
    assert_eq!(w.actor(BOSS).health, 90);
    assert!(env.sounds.contains(&Sound::BossHit));

    // invulnerability window swallows the follow-up
    assert!(!check_boss1_hit(BOSS, 10, &mut w, &mut env));
    assert_eq!(w.actor(BOSS).health, 90);
}

#[test]
fn test_boss_lethal_hit_flags_death() {
    let mut w = test_world();
    let mut env = test_env();
    setup_boss(&mut w, 1, 160, 80);
    w.mut_actor(BOSS).health = 5;
    assert!(check_boss1_hit(BOSS, 10, &mut w, &mut env));
    assert_eq!(w.actor(BOSS).health, 0);
    assert_eq!(w.game.boss_dead, 1);
}

#[test]
fn test_boss_death_sequence_runs_once() {
    let mut w = test_world();
    let mut env = test_env();
    setup_boss(&mut w, 1, 160, 80);
    let minion = spawn_walker(&mut w, 32, 160, 3);
    w.game.boss_dead = 1;

    boss1_movement(BOSS, &mut w, &mut env);
    for slot in BOSS..=BOSS + 3 {
        assert_eq!(w.actor(slot).move_type, MOVE_EXPLOSION);
        assert_eq!(w.actor(slot).func_num, FUNC_EXPLOSION);
        assert!(w.actor(slot).temp1 >= 10);
    }
    assert!(!w.actor(minion).active);
    assert_eq!(w.game.boss_dead, 2);
    assert!(!w.game.boss_active);
    assert!(env.sounds.contains(&Sound::BossDeath));

    // a second call must not restart anything
    let sounds_before = env.sounds.len();
    boss1_movement(BOSS, &mut w, &mut env);
    assert_eq!(env.sounds.len(), sounds_before);
    assert_eq!(w.game.boss_dead, 2);
}

#[test]
fn test_quadrant_followers_track_primary() {
    let mut w = test_world();
    setup_boss(&mut w, 1, 160, 80);
    w.update_actor(BOSS, |b| {
        b.x = 100;
        b.y = 60;
    });
    propagate_quadrants(BOSS, &mut w);
    assert_eq!((w.actor(BOSS + 1).x, w.actor(BOSS + 1).y), (116, 60));
    assert_eq!((w.actor(BOSS + 2).x, w.actor(BOSS + 2).y), (100, 76));
    assert_eq!((w.actor(BOSS + 3).x, w.actor(BOSS + 3).y), (116, 76));
}

#[test]
fn test_boss_chases_and_throws_spread() {
    let mut w = test_world();
    let mut env = test_env();
    setup_boss(&mut w, 1, 160, 80);
    w.mut_actor(BOSS).temp1 = 1;

    boss1_movement(BOSS, &mut w, &mut env);
    // stepped toward Thor on the horizontal axis
    assert_eq!(w.actor(BOSS).x, 158);
    let shots = w
        .actors
        .iter()
        .filter(|a| a.active && a.kind == ActorKind::Shot)
        .count();
    assert_eq!(shots, 3);
    assert!(env.sounds.contains(&Sound::Swish));
    assert_eq!(w.actor(BOSS).temp1, 80);
}
