use super::{special_tile, special_tile_thor};
use crate::def::{Dir, FUNC_EXPLOSION, MOVE_EXPLOSION, THOR};
use crate::test_util::{spawn_walker, test_env, test_world};

#[test]
fn test_thor_dispatch_reaches_door_handler() {
    let mut w = test_world();
    let mut env = test_env();
    w.screen.set_tile(6, 4, 201);
    w.game.thor_info.keys = 1;
    assert!(!special_tile_thor(THOR, 6, 4, 201, &mut w, &mut env));
    assert_eq!(w.game.thor_info.keys, 0);
}

#[test]
fn test_thor_passes_decorative_band() {
    let mut w = test_world();
    let mut env = test_env();
    assert!(special_tile_thor(THOR, 6, 4, 240, &mut w, &mut env));
}

#[test]
fn test_enemy_cannot_open_doors() {
    let mut w = test_world();
    let mut env = test_env();
    let k = spawn_walker(&mut w, 96, 64, 3);
    w.screen.set_tile(6, 4, 201);
    w.game.thor_info.keys = 1;
    assert!(!special_tile(k, 6, 4, 201, &mut w, &mut env));
    // the key stays in Thor's pocket
    assert_eq!(w.game.thor_info.keys, 1);
}

#[test]
fn test_pit_swallows_enemy() {
    let mut w = test_world();
    let mut env = test_env();
    let k = spawn_walker(&mut w, 96, 64, 3);
    assert!(!special_tile(k, 6, 4, 206, &mut w, &mut env));
    let a = *w.actor(k);
    assert_eq!(a.move_type, MOVE_EXPLOSION);
    assert_eq!(a.func_num, FUNC_EXPLOSION);
}

#[test]
fn test_healing_pad_is_inert_ground_for_enemies() {
    let mut w = test_world();
    let mut env = test_env();
    let k = spawn_walker(&mut w, 96, 64, 3);
    w.mut_actor(THOR).health = 100;
    assert!(special_tile(k, 6, 4, 204, &mut w, &mut env));
    assert_eq!(w.thor().health, 100);
}

#[test]
fn test_conveyor_pushes_enemy() {
    let mut w = test_world();
    let mut env = test_env();
    let k = spawn_walker(&mut w, 96, 64, 3);
    let cell = 4 * 20 + 6;
    w.screen.object_index[cell] = Dir::Down.index() as u8;
    assert!(special_tile(k, 6, 4, 207, &mut w, &mut env));
    assert_eq!(w.actor(k).y, 66);
}
