use super::SHOT_MOVEMENT_FUNC;
use crate::def::{Actor, ActorKind, Dir, FUNC_EXPLOSION, MOVE_EXPLOSION, THOR};
use crate::env::Sound;
use crate::test_util::{spawn_walker, test_env, test_world};

fn spawn_shot(w: &mut crate::def::World, x: i32, y: i32, dir: Dir, creator: usize) -> usize {
    w.alloc_actor(Actor {
        kind: ActorKind::Shot,
        x,
        y,
        size_x: 8,
        size_y: 8,
        dir,
        last_dir: dir,
        frames_per_direction: 4,
        frame_speed: 4,
        frame_count: 4,
        hit_strength: 5,
        solid: 1,
        flying: true,
        creator: creator as u8,
        ..Actor::default()
    })
    .expect("shot slot")
}

#[test]
fn test_straight_shot_flies_and_bursts() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    let k = spawn_shot(&mut w, 160, 96, Dir::Right, shooter);

    SHOT_MOVEMENT_FUNC[1](k, &mut w, &mut env);
    assert_eq!(w.actor(k).x, 164);

    // wall ahead turns it into a burst effect
    w.screen.set_tile(11, 6, 20);
    w.screen.set_tile(11, 7, 20);
    for _ in 0..4 {
        SHOT_MOVEMENT_FUNC[1](k, &mut w, &mut env);
        if w.actor(k).move_type == MOVE_EXPLOSION {
            break;
        }
    }
    let s = *w.actor(k);
    assert_eq!(s.move_type, MOVE_EXPLOSION);
    assert_eq!(s.func_num, FUNC_EXPLOSION);
    assert!(s.is_intangible());
    assert_eq!(s.hit_strength, 0);
}

#[test]
fn test_ricochet_reverses_once() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    // spawned flush against a wall to its right
    let k = spawn_shot(&mut w, 168, 96, Dir::Right, shooter);
    w.screen.set_tile(11, 6, 20);
    w.screen.set_tile(11, 7, 20);

    let d = SHOT_MOVEMENT_FUNC[2](k, &mut w, &mut env);
    assert_eq!(d, Dir::Left);
    assert_eq!(w.actor(k).temp1, 1);
    assert_ne!(w.actor(k).move_type, MOVE_EXPLOSION);

    // still pointed at the wall: the spent bounce means it bursts now
    SHOT_MOVEMENT_FUNC[2](k, &mut w, &mut env);
    assert_eq!(w.actor(k).move_type, MOVE_EXPLOSION);
}

#[test]
fn test_homing_shot_closes_on_thor() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    let k = spawn_shot(&mut w, 160, 96, Dir::Left, shooter);
    SHOT_MOVEMENT_FUNC[3](k, &mut w, &mut env);
    let s = *w.actor(k);
    assert_eq!(s.x, 158);
    assert_eq!(s.y, 94);
    assert_eq!(s.temp2, 59);
}

#[test]
fn test_homing_shot_expires() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    let k = spawn_shot(&mut w, 160, 96, Dir::Left, shooter);
    w.mut_actor(k).temp2 = 1;
    SHOT_MOVEMENT_FUNC[3](k, &mut w, &mut env);
    assert_eq!(w.actor(k).move_type, MOVE_EXPLOSION);
}

#[test]
fn test_angle_shot_uses_deltas() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    let k = spawn_shot(&mut w, 160, 96, Dir::Right, shooter);
    w.update_actor(k, |s| {
        s.i1 = 3;
        s.i2 = -3;
    });
    SHOT_MOVEMENT_FUNC[4](k, &mut w, &mut env);
    assert_eq!(w.actor(k).x, 163);
    assert_eq!(w.actor(k).y, 93);
}

#[test]
fn test_bomb_detonates_after_fuse() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    let k = spawn_shot(&mut w, 200, 160, Dir::Down, shooter);
    w.mut_actor(k).temp1 = 1;
    SHOT_MOVEMENT_FUNC[7](k, &mut w, &mut env);
    assert_eq!(w.actor(k).move_type, MOVE_EXPLOSION);
    assert!(env.sounds.contains(&Sound::Boom));
    // too far from Thor to hurt him
    assert_eq!(w.thor().health, 150);
}

#[test]
fn test_mine_waits_for_thor() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    let k = spawn_shot(&mut w, 200, 160, Dir::Down, shooter);

    SHOT_MOVEMENT_FUNC[10](k, &mut w, &mut env); // arm
    assert_eq!(w.actor(k).temp1, 30);
    w.mut_actor(k).temp1 = 0;
    SHOT_MOVEMENT_FUNC[10](k, &mut w, &mut env); // thor far: stays
    assert_ne!(w.actor(k).move_type, MOVE_EXPLOSION);

    w.update_actor(THOR, |t| {
        t.x = 196;
        t.y = 156;
    });
    SHOT_MOVEMENT_FUNC[10](k, &mut w, &mut env);
    assert_eq!(w.actor(k).move_type, MOVE_EXPLOSION);
    assert_eq!(w.thor().health, 145);
    assert!(env.sounds.contains(&Sound::Boom));
}

#[test]
fn test_player_shot_damages_enemy_and_bursts() {
    let mut w = test_world();
    let mut env = test_env();
    let enemy = spawn_walker(&mut w, 160, 96, 3);
    let k = spawn_shot(&mut w, 140, 100, Dir::Right, THOR);
    w.mut_actor(k).hit_strength = 4;
    // closing in hits the enemy through the weapon validator
    for _ in 0..6 {
        SHOT_MOVEMENT_FUNC[1](k, &mut w, &mut env);
        if w.actor(k).move_type == MOVE_EXPLOSION {
            break;
        }
    }
    assert_eq!(w.actor(k).move_type, MOVE_EXPLOSION);
    assert_eq!(w.actor(enemy).health, 6);
}

#[test]
fn test_bouncer_budget() {
    let mut w = test_world();
    let mut env = test_env();
    let shooter = spawn_walker(&mut w, 16, 160, 3);
    let k = spawn_shot(&mut w, 168, 96, Dir::Right, shooter);
    w.screen.set_tile(11, 6, 20);
    w.screen.set_tile(11, 7, 20);

    // armed with 3 bounces; pinned against the wall it spends them all
    let d = SHOT_MOVEMENT_FUNC[12](k, &mut w, &mut env);
    assert_eq!(d, Dir::Left);
    assert_eq!(w.actor(k).temp1, 2);
    SHOT_MOVEMENT_FUNC[12](k, &mut w, &mut env);
    SHOT_MOVEMENT_FUNC[12](k, &mut w, &mut env);
    assert_ne!(w.actor(k).move_type, MOVE_EXPLOSION);
    SHOT_MOVEMENT_FUNC[12](k, &mut w, &mut env);
    assert_eq!(w.actor(k).move_type, MOVE_EXPLOSION);
}
