#[cfg(test)]
#[path = "./shot_movement_test.rs"]
mod shot_movement_test;

use crate::def::{Dir, FUNC_EXPLOSION, MOVE_EXPLOSION, SOLID_INTANGIBLE, THOR, World};
use crate::env::{GotEnv, Sound};
use crate::movement::{check_move1, check_move3, next_frame, thor_damaged};

pub type ShotMovementFn = fn(usize, &mut World, &mut dyn GotEnv) -> Dir;

/// Projectile dispatch table, indexed by the creator's shot_pattern. Slot 0
/// is a placeholder; actor data starts at 1.
pub static SHOT_MOVEMENT_FUNC: [ShotMovementFn; 14] = [
    shot_movement_none,
    shot_movement_one,
    shot_movement_two,
    shot_movement_three,
    shot_movement_four,
    shot_movement_five,
    shot_movement_six,
    shot_movement_seven,
    shot_movement_eight,
    shot_movement_nine,
    shot_movement_ten,
    shot_movement_eleven,
    shot_movement_twelve,
    shot_movement_thirteen,
];

/// Routes a shot candidate through the validator matching its side: the
/// player's weapon damages enemies (check_move1), everything else detonates
/// on Thor (check_move3).
fn shot_check(x: i32, y: i32, k: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    if w.actor(k).creator as usize == THOR {
        check_move1(x, y, k, w, env)
    } else {
        check_move3(x, y, k, w, env)
    }
}

/// Turns the shot into a short harmless burst effect. The slot (and the
/// creator's shot budget) is freed once the effect winds down.
fn explode_shot(k: usize, w: &mut World) {
    w.update_actor(k, |a| {
        a.move_type = MOVE_EXPLOSION;
        a.func_num = FUNC_EXPLOSION;
        a.solid |= SOLID_INTANGIBLE;
        a.hit_strength = 0;
        a.temp1 = 4;
        a.next_frame = 0;
        a.frame_count = a.frame_speed as i32;
    });
}

fn shot_movement_none(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    w.actor(k).dir
}

/// Straight flight, 4px per tick, bursts on anything it cannot pass.
fn shot_movement_one(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let (dx, dy) = a.last_dir.delta();
    if shot_check(a.x + dx * 4, a.y + dy * 4, k, w, env) {
        w.update_actor(k, next_frame);
    } else {
        explode_shot(k, w);
    }
    a.last_dir
}

/// Straight flight with a single ricochet. temp1 marks the bounce as spent.
fn shot_movement_two(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let (dx, dy) = a.last_dir.delta();
    if shot_check(a.x + dx * 4, a.y + dy * 4, k, w, env) {
        w.update_actor(k, next_frame);
        return a.last_dir;
    }
    if a.temp1 == 0 {
        w.mut_actor(k).temp1 = 1;
        return a.last_dir.opposite();
    }
    explode_shot(k, w);
    a.last_dir
}

/// Homing shot: 2px greedy steps toward Thor with a lifetime in temp2
/// (armed lazily). Expiry and blocks both burst it.
fn shot_movement_three(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp2 == 0 {
        w.mut_actor(k).temp2 = 60;
    }
    w.mut_actor(k).temp2 -= 1;
    if w.actor(k).temp2 <= 0 {
        explode_shot(k, w);
        return a.last_dir;
    }
    let t = *w.thor();
    let dx = (t.x - a.x).clamp(-2, 2);
    let dy = (t.y - a.y).clamp(-2, 2);
    let d = if dx.abs() > dy.abs() {
        if dx < 0 { Dir::Left } else { Dir::Right }
    } else if dy < 0 {
        Dir::Up
    } else {
        Dir::Down
    };
    if shot_check(a.x + dx, a.y + dy, k, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    explode_shot(k, w);
    a.last_dir
}

/// Angled throw: the per-tick displacement lives in i1/i2, set by whoever
/// spawned the shot (boss volleys use this).
fn shot_movement_four(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if shot_check(a.x + a.i1, a.y + a.i2, k, w, env) {
        w.update_actor(k, next_frame);
    } else {
        explode_shot(k, w);
    }
    a.last_dir
}

/// Slow straight drift, 2px per tick.
fn shot_movement_five(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let (dx, dy) = a.last_dir.delta();
    if shot_check(a.x + dx * 2, a.y + dy * 2, k, w, env) {
        w.update_actor(k, next_frame);
    } else {
        explode_shot(k, w);
    }
    a.last_dir
}

/// Wave rider: straight flight with a perpendicular wobble cycled by temp1.
fn shot_movement_six(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    const WOBBLE: [i32; 4] = [-2, 0, 2, 0];
    let a = *w.actor(k);
    let (dx, dy) = a.last_dir.delta();
    let swing = WOBBLE[(a.temp1 & 3) as usize];
    w.mut_actor(k).temp1 += 1;
    let (nx, ny) = if dx != 0 {
        (a.x + dx * 4, a.y + swing)
    } else {
        (a.x + swing, a.y + dy * 4)
    };
    if shot_check(nx, ny, k, w, env) {
        w.update_actor(k, next_frame);
    } else {
        explode_shot(k, w);
    }
    a.last_dir
}

/// Dropped bomb: sits still for temp1 ticks (armed lazily), then detonates
/// into a lingering damaging burst.
fn shot_movement_seven(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 == 0 {
        w.mut_actor(k).temp1 = 30;
    }
    w.update_actor(k, |a| {
        a.temp1 -= 1;
        next_frame(a);
    });
    if w.actor(k).temp1 <= 0 {
        env.play_sound(Sound::Boom, false);
        let t = *w.thor();
        if (t.center_x() - a.center_x()).abs() < 16 && (t.center_y() - a.center_y()).abs() < 16 {
            thor_damaged(k, w, env);
        }
        explode_shot(k, w);
        w.mut_actor(k).temp1 = 8;
    }
    a.last_dir
}

/// Boomerang: temp1 outward steps, then homes back onto its creator and is
/// silently reabsorbed.
fn shot_movement_eight(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 == 0 && a.temp2 == 0 {
        w.mut_actor(k).temp1 = 12;
    }
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        let (dx, dy) = a.last_dir.delta();
        if shot_check(a.x + dx * 4, a.y + dy * 4, k, w, env) {
            w.update_actor(k, next_frame);
            return a.last_dir;
        }
        w.mut_actor(k).temp1 = 0; // wall: start the return leg early
    }
    w.mut_actor(k).temp2 = 1;
    let c = *w.actor(a.creator as usize);
    let dx = (c.center_x() - a.center_x()).clamp(-4, 4);
    let dy = (c.center_y() - a.center_y()).clamp(-4, 4);
    if dx.abs() <= 4 && dy.abs() <= 4 && (c.x - a.x).abs() < 8 && (c.y - a.y).abs() < 8 {
        crate::movement::remove_shot(k, w);
        return a.last_dir;
    }
    // the return leg ignores walls
    w.update_actor(k, |s| {
        s.x += dx;
        s.y += dy;
        next_frame(s);
    });
    if dx.abs() > dy.abs() {
        if dx < 0 { Dir::Left } else { Dir::Right }
    } else if dy < 0 {
        Dir::Up
    } else {
        Dir::Down
    }
}

// quarter-scaled ring offsets, 8 spokes clockwise from north
const RING_X: [i32; 8] = [0, 3, 4, 3, 0, -3, -4, -3];
const RING_Y: [i32; 8] = [-4, -3, 0, 3, 4, 3, 0, -3];

/// Orbiter: circles its creator on an i1-radius ring (default 24px),
/// advancing one spoke every 4 ticks via temp1. Damages Thor on contact
/// through its own overlap check since it never routes through a
/// validator.
fn shot_movement_nine(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let radius = if a.i1 > 0 { a.i1 } else { 24 };
    let c = *w.actor(a.creator as usize);
    if !c.active {
        explode_shot(k, w);
        return a.last_dir;
    }
    let spoke = ((a.temp1 / 4) & 7) as usize;
    let nx = c.center_x() + RING_X[spoke] * radius / 4 - a.size_x / 2;
    let ny = c.center_y() + RING_Y[spoke] * radius / 4 - a.size_y / 2;
    w.update_actor(k, |s| {
        s.temp1 += 1;
        s.x = nx;
        s.y = ny;
        next_frame(s);
    });
    let t = *w.thor();
    if crate::geom::overlap(
        nx,
        ny,
        nx + a.size_x - 1,
        ny + a.size_y - 1,
        t.x,
        t.y,
        t.x + t.size_x - 1,
        t.y + t.size_y - 1,
    ) {
        thor_damaged(k, w, env);
    }
    a.last_dir
}

/// Proximity mine: arms over temp1 ticks, then detonates when Thor comes
/// within a tile.
fn shot_movement_ten(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp2 == 0 {
        w.update_actor(k, |s| {
            s.temp1 = 30;
            s.temp2 = 1;
        });
        return a.dir;
    }
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        return a.dir;
    }
    let t = *w.thor();
    if (t.center_x() - a.center_x()).abs() < 16 && (t.center_y() - a.center_y()).abs() < 16 {
        env.play_sound(Sound::Boom, false);
        thor_damaged(k, w, env);
        explode_shot(k, w);
    }
    a.dir
}

/// Jitter: a drunkard's walk with a temp2 lifetime.
fn shot_movement_eleven(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp2 == 0 {
        w.mut_actor(k).temp2 = 40;
    }
    w.mut_actor(k).temp2 -= 1;
    if w.actor(k).temp2 <= 0 {
        explode_shot(k, w);
        return a.last_dir;
    }
    let d = Dir::from_index(w.rnd.rand(3) as usize);
    let (dx, dy) = d.delta();
    if shot_check(a.x + dx * 2, a.y + dy * 2, k, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    a.last_dir
}

/// Bouncer: straight flight that reverses on impact, with a temp1 bounce
/// budget (armed to 3).
fn shot_movement_twelve(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 == 0 && a.temp2 == 0 {
        w.update_actor(k, |s| {
            s.temp1 = 3;
            s.temp2 = 1;
        });
    }
    let (dx, dy) = a.last_dir.delta();
    if shot_check(a.x + dx * 4, a.y + dy * 4, k, w, env) {
        w.update_actor(k, next_frame);
        return a.last_dir;
    }
    if w.actor(k).temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        return a.last_dir.opposite();
    }
    explode_shot(k, w);
    a.last_dir
}

/// Seeker arc: flies straight but re-aims at Thor's dominant axis every 4
/// ticks (temp1 cadence).
fn shot_movement_thirteen(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let mut d = a.last_dir;
    w.mut_actor(k).temp1 += 1;
    if w.actor(k).temp1 & 3 == 0 {
        let t = *w.thor();
        let dx = t.center_x() - a.center_x();
        let dy = t.center_y() - a.center_y();
        d = if dx.abs() > dy.abs() {
            if dx < 0 { Dir::Left } else { Dir::Right }
        } else if dy < 0 {
            Dir::Up
        } else {
            Dir::Down
        };
    }
    let (dx, dy) = d.delta();
    if shot_check(a.x + dx * 4, a.y + dy * 4, k, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    explode_shot(k, w);
    a.last_dir
}
