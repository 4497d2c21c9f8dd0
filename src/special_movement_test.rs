use super::SPECIAL_MOVEMENT_FUNC;
use crate::def::{Dir, THOR, TILE_SOLID};
use crate::env::Sound;
use crate::test_util::{test_env, test_world};

#[test]
fn test_locked_door_consumes_key() {
    let mut w = test_world();
    let mut env = test_env();
    w.screen.set_tile(5, 3, 201);
    w.game.thor_info.keys = 2;

    // opening tick: key spent, tile melts, move still rejected
    assert!(!SPECIAL_MOVEMENT_FUNC[1](THOR, 5, 3, &mut w, &mut env));
    assert_eq!(w.game.thor_info.keys, 1);
    assert_eq!(w.screen.tile(5, 3), TILE_SOLID);
    assert!(env.sounds.contains(&Sound::Door));
}

#[test]
fn test_locked_door_without_key_blocks() {
    let mut w = test_world();
    let mut env = test_env();
    w.screen.set_tile(5, 3, 201);
    assert!(!SPECIAL_MOVEMENT_FUNC[1](THOR, 5, 3, &mut w, &mut env));
    assert_eq!(w.screen.tile(5, 3), 201);
    assert!(env.sounds.is_empty());
}

#[test]
fn test_jewel_door_price() {
    let mut w = test_world();
    let mut env = test_env();
    w.screen.set_tile(5, 3, 202);
    w.game.thor_info.jewels = 9;
    assert!(!SPECIAL_MOVEMENT_FUNC[2](THOR, 5, 3, &mut w, &mut env));
    assert_eq!(w.screen.tile(5, 3), 202);

    w.game.thor_info.jewels = 10;
    assert!(!SPECIAL_MOVEMENT_FUNC[2](THOR, 5, 3, &mut w, &mut env));
    assert_eq!(w.game.thor_info.jewels, 0);
    assert_eq!(w.screen.tile(5, 3), TILE_SOLID);
}

#[test]
fn test_teleporter_jumps_to_twin_pad() {
    let mut w = test_world();
    let mut env = test_env();
    w.screen.set_tile(4, 4, 203);
    w.screen.set_tile(12, 8, 203);

    assert!(!SPECIAL_MOVEMENT_FUNC[3](THOR, 4, 4, &mut w, &mut env));
    assert_eq!(w.thor().x, 12 * 16);
    assert_eq!(w.thor().y, 8 * 16);
    assert!(env.sounds.contains(&Sound::Woop));
}

#[test]
fn test_teleporter_without_twin_is_inert() {
    let mut w = test_world();
    let mut env = test_env();
    w.screen.set_tile(4, 4, 203);
    assert!(SPECIAL_MOVEMENT_FUNC[3](THOR, 4, 4, &mut w, &mut env));
    assert_eq!(w.thor().x, 64);
}

#[test]
fn test_healing_pad() {
    let mut w = test_world();
    let mut env = test_env();
    w.mut_actor(THOR).health = 100;
    assert!(SPECIAL_MOVEMENT_FUNC[4](THOR, 4, 4, &mut w, &mut env));
    assert_eq!(w.thor().health, 101);
    assert!(env.sounds.contains(&Sound::Angel));

    // silent at full health
    env.sounds.clear();
    w.mut_actor(THOR).health = 150;
    assert!(SPECIAL_MOVEMENT_FUNC[4](THOR, 4, 4, &mut w, &mut env));
    assert_eq!(w.thor().health, 150);
    assert!(env.sounds.is_empty());
}

#[test]
fn test_switch_toggles_flag_and_flattens() {
    let mut w = test_world();
    let mut env = test_env();
    w.screen.set_tile(5, 2, 205);
    let cell = 2 * 20 + 5;
    assert!(SPECIAL_MOVEMENT_FUNC[5](THOR, 5, 2, &mut w, &mut env));
    assert!(w.game.flag(cell % 64));
    assert_eq!(w.screen.tile(5, 2), TILE_SOLID);
    assert!(env.sounds.contains(&Sound::Clang));
}

#[test]
fn test_pit_hurts_and_snaps_back() {
    let mut w = test_world();
    let mut env = test_env();
    w.game.pge = 0;
    w.update_actor(THOR, |t| {
        t.last_x[1] = 48;
        t.last_y[1] = 48;
    });
    assert!(!SPECIAL_MOVEMENT_FUNC[6](THOR, 4, 4, &mut w, &mut env));
    assert_eq!(w.thor().health, 148);
    assert_eq!(w.thor().x, 48);
    assert_eq!(w.thor().y, 48);
    assert!(env.sounds.contains(&Sound::Fall));
}

#[test]
fn test_conveyor_pushes() {
    let mut w = test_world();
    let mut env = test_env();
    let cell = 4 * 20 + 4;
    w.screen.object_index[cell] = Dir::Right.index() as u8;
    assert!(SPECIAL_MOVEMENT_FUNC[7](THOR, 4, 4, &mut w, &mut env));
    assert_eq!(w.thor().x, 66);
}

#[test]
fn test_ice_arms_slip_once() {
    let mut w = test_world();
    let mut env = test_env();
    assert!(SPECIAL_MOVEMENT_FUNC[8](THOR, 4, 4, &mut w, &mut env));
    assert!(w.game.slipping);
    assert_eq!(w.game.slip_count, 16);

    w.game.slip_count = 5;
    assert!(SPECIAL_MOVEMENT_FUNC[8](THOR, 4, 4, &mut w, &mut env));
    // already sliding: the countdown is not re-armed
    assert_eq!(w.game.slip_count, 5);
}

#[test]
fn test_sign_raises_script_request() {
    let mut w = test_world();
    let mut env = test_env();
    let cell = 3 * 20 + 7;
    w.screen.object_index[cell] = 42;
    assert!(!SPECIAL_MOVEMENT_FUNC[9](THOR, 7, 3, &mut w, &mut env));
    assert_eq!(w.game.script_request, Some(42));
}

#[test]
fn test_toll_tile() {
    let mut w = test_world();
    let mut env = test_env();
    w.game.thor_info.jewels = 4;
    assert!(!SPECIAL_MOVEMENT_FUNC[10](THOR, 4, 4, &mut w, &mut env));
    w.game.thor_info.jewels = 7;
    assert!(SPECIAL_MOVEMENT_FUNC[10](THOR, 4, 4, &mut w, &mut env));
    assert_eq!(w.game.thor_info.jewels, 2);
}
