use super::{boss3_movement, check_boss3_hit};
use crate::def::{ActorKind, BOSS, SOLID_INTANGIBLE};
use crate::env::Sound;
use crate::test_util::{setup_boss, test_env, test_world};

fn hidden_boss(w: &mut crate::def::World) {
    setup_boss(w, 3, 160, 80);
    w.update_actor(BOSS, |b| b.solid |= SOLID_INTANGIBLE);
}

#[test]
fn test_blink_in_fires_volley() {
    let mut w = test_world();
    let mut env = test_env();
    hidden_boss(&mut w);

    boss3_movement(BOSS, &mut w, &mut env);
    let b = *w.actor(BOSS);
    assert!(!b.is_intangible());
    assert_eq!(b.temp1, 1); // visible phase
    assert_eq!(b.temp2, 30);
    // body landed on a tile boundary inside the screen
    assert!(b.x % 16 == 0 && (0..=288).contains(&b.x));
    assert!(b.y % 16 == 0 && (0..=160).contains(&b.y));
    assert!(env.sounds.contains(&Sound::Woop));

    let volley: Vec<_> = w
        .actors
        .iter()
        .filter(|a| a.active && a.kind == ActorKind::Shot)
        .collect();
    assert_eq!(volley.len(), 4);
    for shot in volley {
        assert_eq!(shot.move_type, 4);
        assert_eq!(shot.i1.abs(), 3);
        assert_eq!(shot.i2.abs(), 3);
    }
}

#[test]
fn test_visible_phase_fades_back_out() {
    let mut w = test_world();
    let mut env = test_env();
    hidden_boss(&mut w);
    boss3_movement(BOSS, &mut w, &mut env); // blink in
    w.mut_actor(BOSS).temp2 = 1;

    boss3_movement(BOSS, &mut w, &mut env); // last visible tick
    assert_eq!(w.actor(BOSS).temp2, 0);
    boss3_movement(BOSS, &mut w, &mut env); // fade out
    let b = *w.actor(BOSS);
    assert!(b.is_intangible());
    assert_eq!(b.temp1, 0); // hidden phase
    assert_eq!(b.temp2, 50);
}

#[test]
fn test_enraged_volley_doubles() {
    let mut w = test_world();
    let mut env = test_env();
    hidden_boss(&mut w);
    w.mut_actor(BOSS).health = 20;
    boss3_movement(BOSS, &mut w, &mut env);
    let volley = w
        .actors
        .iter()
        .filter(|a| a.active && a.kind == ActorKind::Shot)
        .count();
    assert_eq!(volley, 8);
}

#[test]
fn test_hidden_boss_shrugs_off_hits() {
    let mut w = test_world();
    let mut env = test_env();
    hidden_boss(&mut w);
    assert!(!check_boss3_hit(BOSS, 10, &mut w, &mut env));
    assert_eq!(w.actor(BOSS).health, 100);
    assert!(env.sounds.contains(&Sound::Clang));
}

#[test]
fn test_visible_boss_takes_damage() {
    let mut w = test_world();
    let mut env = test_env();
    setup_boss(&mut w, 3, 160, 80);
    assert!(!check_boss3_hit(BOSS, 10, &mut w, &mut env));
    assert_eq!(w.actor(BOSS).health, 90);
    w.mut_actor(BOSS).vulnerable_countdown = 0;
    w.mut_actor(BOSS).health = 5;
    assert!(check_boss3_hit(BOSS, 10, &mut w, &mut env));
    assert_eq!(w.game.boss_dead, 1);
}
