#[cfg(test)]
#[path = "./move_patterns_test.rs"]
mod move_patterns_test;

use crate::def::{ActorKind, Dir, MOVE_BOULDER_STOPPED, TILE_SOLID, World};
use crate::env::GotEnv;
use crate::movement::{
    actor_shoots, check_move0, check_move2, check_move4, check_special_move1, next_frame,
    remove_shot,
};

pub type MovementFn = fn(usize, &mut World, &mut dyn GotEnv) -> Dir;

/// Movement dispatch table. The index is actor state (Actor::move_type) and
/// may be rewritten by the behaviors themselves (see movement_fourteen).
/// Slots 32..=34 are deliberate stubs; actor data may reference them.
pub static MOVEMENT_FUNC: [MovementFn; 41] = [
    movement_zero,
    movement_one,
    movement_two,
    movement_three,
    movement_four,
    movement_five,
    movement_six,
    movement_seven,
    movement_eight,
    movement_nine,
    movement_ten,
    movement_eleven,
    movement_twelve,
    movement_thirteen,
    movement_fourteen,
    movement_fifteen,
    movement_sixteen,
    movement_seventeen,
    movement_eighteen,
    movement_nineteen,
    movement_twenty,
    movement_twentyone,
    movement_twentytwo,
    movement_twentythree,
    movement_twentyfour,
    movement_twentyfive,
    movement_twentysix,
    movement_twentyseven,
    movement_twentyeight,
    movement_twentynine,
    movement_thirty,
    movement_thirtyone,
    movement_thirtytwo,
    movement_thirtythree,
    movement_thirtyfour,
    movement_thirtyfive,
    movement_thirtysix,
    movement_thirtyseven,
    movement_thirtyeight,
    movement_thirtynine,
    movement_forty,
];

/*
=============================================================================

                SHARED HELPERS

=============================================================================
*/

/// One validated step of dist pixels in direction d, through the validator
/// matching the actor's ground/flying class.
fn walk(k: usize, d: Dir, dist: i32, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let a = *w.actor(k);
    let (dx, dy) = d.delta();
    let x = a.x + dx * dist;
    let y = a.y + dy * dist;
    if a.flying {
        check_move4(x, y, k, w, env)
    } else {
        check_move2(x, y, k, w, env)
    }
}

/// Attempt-then-random-redirect core shared by the wander family: continue
/// in last_dir, and on a blocked move pick a uniformly random direction in
/// 0..=rand_max. Blocked ticks skip the animation step.
fn walk_or_redirect(k: usize, dist: i32, rand_max: i32, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let d = w.actor(k).last_dir;
    if walk(k, d, dist, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    Dir::from_index(w.rnd.rand(rand_max) as usize)
}

/// Greedy single-axis step toward (tx, ty), displacement clamped to 2px.
/// horizontal_first selects which axis gets priority when both differ.
fn step_toward(
    k: usize,
    tx: i32,
    ty: i32,
    horizontal_first: bool,
    w: &mut World,
    env: &mut dyn GotEnv,
) -> Dir {
    let a = *w.actor(k);
    let dx = (tx - a.x).clamp(-2, 2);
    let dy = (ty - a.y).clamp(-2, 2);
    let horiz = (dx, Dir::from_index(if dx < 0 { 2 } else { 3 }), true);
    let vert = (dy, Dir::from_index(if dy < 0 { 0 } else { 1 }), false);
    let order = if horizontal_first {
        [horiz, vert]
    } else {
        [vert, horiz]
    };
    for (delta, d, is_horiz) in order {
        if delta == 0 {
            continue;
        }
        let (x, y) = if is_horiz {
            (a.x + delta, a.y)
        } else {
            (a.x, a.y + delta)
        };
        let ok = if a.flying {
            check_move4(x, y, k, w, env)
        } else {
            check_move2(x, y, k, w, env)
        };
        if ok {
            w.update_actor(k, next_frame);
            return d;
        }
    }
    a.last_dir
}

fn aligned_with_thor(k: usize, w: &World) -> Option<Dir> {
    let a = w.actor(k);
    let t = w.thor();
    if (t.center_y() - a.center_y()).abs() <= 8 {
        return Some(if t.center_x() < a.center_x() {
            Dir::Left
        } else {
            Dir::Right
        });
    }
    if (t.center_x() - a.center_x()).abs() <= 8 {
        return Some(if t.center_y() < a.center_y() {
            Dir::Up
        } else {
            Dir::Down
        });
    }
    None
}

/*
=============================================================================

                BEHAVIORS 0..=40

=============================================================================
*/

/// Player control. Resolves diagonal-priority input (both-axis keys set the
/// diag side channel 1..=4 for the wall-slide retry), falls back to
/// axis-aligned 2px steps, honors the icy-tile slip countdown that
/// overrides input, and arms a 5-tick re-move cooldown on full failure.
/// Returns the resolved direction, which is what the sprite animates with.
pub fn movement_zero(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let thor = *w.actor(k);

    if w.game.slipping {
        w.game.slip_count -= 1;
        if w.game.slip_count <= 0 {
            w.game.slipping = false;
            w.game.slip_flag = false;
        }
        let d = thor.last_dir;
        let (dx, dy) = d.delta();
        if check_move0(thor.x + dx * 2, thor.y + dy * 2, k, w, env) {
            w.update_actor(k, next_frame);
        }
        return d;
    }

    if thor.move_counter > 0 {
        return thor.dir;
    }

    let [up, down, left, right] = w.game.key_flag;
    w.game.diag = 0;
    let (d, moved) = if up && left {
        w.game.diag = 1;
        (
            Dir::Left,
            check_move0(thor.x - 2, thor.y - 2, k, w, env),
        )
    } else if up && right {
        w.game.diag = 2;
        (
            Dir::Right,
            check_move0(thor.x + 2, thor.y - 2, k, w, env),
        )
    } else if down && left {
        w.game.diag = 3;
        (
            Dir::Left,
            check_move0(thor.x - 2, thor.y + 2, k, w, env),
        )
    } else if down && right {
        w.game.diag = 4;
        (
            Dir::Right,
            check_move0(thor.x + 2, thor.y + 2, k, w, env),
        )
    } else if up {
        (Dir::Up, check_move0(thor.x, thor.y - 2, k, w, env))
    } else if down {
        (Dir::Down, check_move0(thor.x, thor.y + 2, k, w, env))
    } else if left {
        (Dir::Left, check_move0(thor.x - 2, thor.y, k, w, env))
    } else if right {
        (Dir::Right, check_move0(thor.x + 2, thor.y, k, w, env))
    } else {
        return thor.dir;
    };
    w.game.diag = 0;

    if moved {
        w.update_actor(k, next_frame);
    } else {
        w.mut_actor(k).move_counter = 5;
    }
    d
}

/// Restless wander: redirects randomly the moment a step fails.
pub fn movement_one(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    walk_or_redirect(k, 2, 3, w, env)
}

/// Horizontal pacer: reverses on a blocked step.
pub fn movement_two(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let mut d = w.actor(k).last_dir;
    if d != Dir::Left && d != Dir::Right {
        d = Dir::Left;
    }
    if walk(k, d, 2, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    d.opposite()
}

/// Walk/bump/random-turn: continue in last_dir, and on a blocked move pick
/// a uniformly random new direction in 0..=3.
pub fn movement_three(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    walk_or_redirect(k, 2, 3, w, env)
}

/// Tracker, horizontal correction first. Per-tick displacement is clamped
/// to 2px however far Thor is.
pub fn movement_four(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let (tx, ty) = (w.thor().x, w.thor().y);
    step_toward(k, tx, ty, true, w, env)
}

/// Tracker with alternating axis preference. temp1 is the flip-flop; the
/// alternation keeps the sprite from pinning diagonally against walls.
pub fn movement_five(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let toggle = w.actor(k).temp1 != 0;
    w.update_actor(k, |a| a.temp1 ^= 1);
    let (tx, ty) = (w.thor().x, w.thor().y);
    step_toward(k, tx, ty, toggle, w, env)
}

/// Two-phase wander: move for temp1 ticks, stand for temp2 ticks, then pick
/// a random direction. Scratch: temp1 moving countdown, temp2 paused
/// countdown.
pub fn movement_six(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp2 > 0 {
        w.mut_actor(k).temp2 -= 1;
        if w.actor(k).temp2 == 0 {
            let nd = Dir::from_index(w.rnd.rand(3) as usize);
            let moving = 16 + w.rnd.rand(32);
            w.mut_actor(k).temp1 = moving;
            return nd;
        }
        return a.dir; // paused: no move, no frame step
    }
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        let d = a.last_dir;
        if walk(k, d, 2, w, env) {
            w.update_actor(k, next_frame);
            return d;
        }
        // blocked: give up the moving phase early
    }
    let pause = 8 + w.rnd.rand(24);
    w.mut_actor(k).temp2 = pause;
    a.last_dir
}

/// Vertical pacer: reverses on a blocked step.
pub fn movement_seven(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let mut d = w.actor(k).last_dir;
    if d != Dir::Up && d != Dir::Down {
        d = Dir::Up;
    }
    if walk(k, d, 2, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    d.opposite()
}

/// Sentry: stands still and fires when Thor lines up with it.
pub fn movement_eight(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    if let Some(d) = aligned_with_thor(k, w) {
        w.mut_actor(k).dir = d;
        actor_shoots(k, w, env);
        w.update_actor(k, next_frame);
        return d;
    }
    w.actor(k).dir
}

fn bounce_step(k: usize, sx: i32, sy: i32, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let a = *w.actor(k);
    if a.flying {
        check_move4(a.x + sx * 2, a.y + sy * 2, k, w, env)
    } else {
        check_move2(a.x + sx * 2, a.y + sy * 2, k, w, env)
    }
}

/// Diagonal bouncer: moves both axes every tick, reflecting each axis
/// independently off blocks. Scratch: i1/i2 per-axis signs (+1/-1, armed
/// lazily).
pub fn movement_nine(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let mut sx = a.i1;
    let mut sy = a.i2;
    if sx == 0 {
        sx = if w.rnd.rand(1) == 0 { -1 } else { 1 };
        sy = if w.rnd.rand(1) == 0 { -1 } else { 1 };
    }
    if !bounce_step(k, sx, sy, w, env) {
        // reflect the blocked axis (or both on a corner)
        if bounce_step(k, -sx, sy, w, env) {
            sx = -sx;
        } else if bounce_step(k, sx, -sy, w, env) {
            sy = -sy;
        } else {
            sx = -sx;
            sy = -sy;
        }
    }
    w.update_actor(k, |a| {
        a.i1 = sx;
        a.i2 = sy;
        next_frame(a);
    });
    if sx < 0 { Dir::Left } else { Dir::Right }
}

/// Wanderer that switches to greedy tracking while Thor is within 48px.
pub fn movement_ten(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let t = *w.thor();
    if (t.x - a.x).abs() < 48 && (t.y - a.y).abs() < 48 {
        return step_toward(k, t.x, t.y, true, w, env);
    }
    walk_or_redirect(k, 2, 3, w, env)
}

/// Coward: greedy step directly away from Thor, clamped to 2px.
pub fn movement_eleven(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let t = *w.thor();
    let tx = a.x + (a.x - t.x).clamp(-2, 2);
    let ty = a.y + (a.y - t.y).clamp(-2, 2);
    step_toward(k, tx, ty, (a.x - t.x).abs() > (a.y - t.y).abs(), w, env)
}

/// Flying wanderer (fly-over threshold, random redirect on block).
pub fn movement_twelve(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    walk_or_redirect(k, 2, 3, w, env)
}

/// Fixed-leg pacer: temp1 steps remain in the current leg; reaching zero
/// (or a blocked step) reverses and reloads temp1 from temp2 (leg length,
/// armed lazily to 16).
pub fn movement_thirteen(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp2 == 0 {
        w.mut_actor(k).temp2 = 16;
    }
    let d = a.last_dir;
    if a.temp1 > 0 && walk(k, d, 2, w, env) {
        w.update_actor(k, |a| {
            a.temp1 -= 1;
            next_frame(a);
        });
        return d;
    }
    let leg = w.actor(k).temp2;
    w.mut_actor(k).temp1 = leg;
    d.opposite()
}

/// Rolling boulder: pure directional roll until blocked, at which point the
/// actor rewrites its own dispatch index to the stopped behavior. The
/// blocked exit does not move the actor and skips the animation step.
pub fn movement_fourteen(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let (dx, dy) = a.last_dir.delta();
    if check_move2(a.x + dx * 2, a.y + dy * 2, k, w, env) {
        w.update_actor(k, next_frame);
    } else {
        w.mut_actor(k).move_type = MOVE_BOULDER_STOPPED;
    }
    a.last_dir
}

/// Stopped boulder: a true no-op. Even frame cycling is skipped.
pub fn movement_fifteen(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    w.actor(k).dir
}

/// Stationary shooter: counts temp1 down, fires toward Thor's dominant
/// quadrant, then rearms temp1 randomly.
pub fn movement_sixteen(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        return a.dir;
    }
    let t = *w.thor();
    let dx = t.center_x() - a.center_x();
    let dy = t.center_y() - a.center_y();
    let d = if dx.abs() > dy.abs() {
        if dx < 0 { Dir::Left } else { Dir::Right }
    } else if dy < 0 {
        Dir::Up
    } else {
        Dir::Down
    };
    w.mut_actor(k).dir = d;
    actor_shoots(k, w, env);
    let rearm = 30 + w.rnd.rand(60);
    w.update_actor(k, |a| {
        a.temp1 = rearm;
        next_frame(a);
    });
    d
}

/// Wandering shooter: walks like movement_three but snaps off a shot
/// whenever Thor lines up.
pub fn movement_seventeen(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    if let Some(d) = aligned_with_thor(k, w) {
        w.mut_actor(k).dir = d;
        actor_shoots(k, w, env);
    }
    walk_or_redirect(k, 2, 3, w, env)
}

/// Circler: walks an 8-leg ring around its spawn point. Scratch: i1/i2
/// spawn anchor (captured on first run), temp1 leg index, temp2 steps left
/// in the current leg.
pub fn movement_eighteen(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    const LEGS: [Dir; 8] = [
        Dir::Right,
        Dir::Down,
        Dir::Down,
        Dir::Left,
        Dir::Left,
        Dir::Up,
        Dir::Up,
        Dir::Right,
    ];
    let a = *w.actor(k);
    if a.i1 == 0 && a.i2 == 0 {
        w.update_actor(k, |a| {
            a.i1 = a.x;
            a.i2 = a.y;
            a.temp2 = 8;
        });
    }
    let leg = (w.actor(k).temp1 as usize) & 7;
    let d = LEGS[leg];
    if walk(k, d, 2, w, env) {
        w.update_actor(k, |a| {
            a.temp2 -= 1;
            if a.temp2 <= 0 {
                a.temp2 = 8;
                a.temp1 = (a.temp1 + 1) & 7;
            }
            next_frame(a);
        });
    } else {
        // blocked legs are abandoned immediately
        w.update_actor(k, |a| {
            a.temp2 = 8;
            a.temp1 = (a.temp1 + 1) & 7;
        });
    }
    d
}

/// Lurker: idles temp1 ticks, then dashes 4px per tick in a random
/// direction until blocked, then idles again.
pub fn movement_nineteen(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        if w.actor(k).temp1 == 0 {
            let nd = Dir::from_index(w.rnd.rand(3) as usize);
            return nd;
        }
        return a.dir;
    }
    let d = a.last_dir;
    if walk(k, d, 4, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    let idle = 20 + w.rnd.rand(40);
    w.mut_actor(k).temp1 = idle;
    d
}

/// Trailer: walks toward Thor's previous (page-flipped) position, so it
/// follows the path rather than the player.
pub fn movement_twenty(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let page = w.game.pge ^ 1;
    let (tx, ty) = (w.thor().last_x[page], w.thor().last_y[page]);
    step_toward(k, tx, ty, true, w, env)
}

/// Emerger: rises intangible for temp1 ticks, then becomes solid and hands
/// itself to the wander behavior.
pub fn movement_twentyone(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 == 0 {
        w.update_actor(k, |a| {
            a.temp1 = 30;
            a.solid |= crate::def::SOLID_INTANGIBLE;
        });
        return a.dir;
    }
    w.update_actor(k, |a| {
        a.temp1 -= 1;
        next_frame(a);
    });
    if w.actor(k).temp1 == 0 {
        w.update_actor(k, |a| {
            a.solid &= !crate::def::SOLID_INTANGIBLE;
            a.move_type = 3;
        });
    }
    a.dir
}

/// Spear trap: an explicit 7-state phase machine. Scratch: temp2 phase
/// (0 idle-check, 1 extend, 2 strike, 3 hold, 4 retract, 5 reset, 6
/// pause-before-flip), temp3 extension steps, temp4 hold/pause countdown,
/// temp5 flip parity. On flip it teleports a full tile on both axes when
/// the destination tile is walkable.
pub fn movement_twentytwo(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    match a.temp2 {
        0 => {
            // idle-check: arm when Thor is ahead and roughly aligned
            let t = *w.thor();
            let (dx, dy) = a.last_dir.delta();
            let ahead = (t.center_x() - a.center_x()) * dx + (t.center_y() - a.center_y()) * dy;
            let perp = if dx != 0 {
                (t.center_y() - a.center_y()).abs()
            } else {
                (t.center_x() - a.center_x()).abs()
            };
            if ahead > 0 && ahead < 48 && perp <= 8 {
                w.mut_actor(k).temp2 = 1;
            }
        }
        1 => {
            // extend: 3 forward steps of 2px
            let (dx, dy) = a.last_dir.delta();
            check_move2(a.x + dx * 2, a.y + dy * 2, k, w, env);
            w.update_actor(k, |a| {
                a.temp3 += 1;
                next_frame(a);
                if a.temp3 >= 3 {
                    a.temp2 = 2;
                }
            });
        }
        2 => {
            // strike frame; contact damage comes from the extend steps
            w.update_actor(k, |a| {
                a.temp4 = 6;
                a.temp2 = 3;
                next_frame(a);
            });
        }
        3 => {
            w.update_actor(k, |a| {
                a.temp4 -= 1;
                if a.temp4 <= 0 {
                    a.temp2 = 4;
                }
            });
        }
        4 => {
            // retract without collision checks
            let (dx, dy) = a.last_dir.opposite().delta();
            check_special_move1(a.x + dx * 2, a.y + dy * 2, k, w);
            w.update_actor(k, |a| {
                a.temp3 -= 1;
                if a.temp3 <= 0 {
                    a.temp2 = 5;
                }
            });
        }
        5 => {
            w.update_actor(k, |a| {
                a.temp4 = 10;
                a.temp2 = 6;
            });
        }
        _ => {
            w.mut_actor(k).temp4 -= 1;
            if w.actor(k).temp4 <= 0 {
                let flip = a.temp5 & 1;
                let nx = a.x + if flip == 0 { 16 } else { -16 };
                let ny = a.y + if flip == 0 { 16 } else { -16 };
                if w.screen.bgtile(nx, ny) >= TILE_SOLID
                    && w.screen.bgtile(nx + a.size_x - 1, ny + a.size_y - 1) >= TILE_SOLID
                {
                    w.update_actor(k, |a| {
                        a.x = nx;
                        a.y = ny;
                    });
                }
                w.update_actor(k, |a| {
                    a.temp5 += 1;
                    a.temp2 = 0;
                    a.temp3 = 0;
                });
                let nd = a.last_dir.opposite();
                return nd;
            }
        }
    }
    a.last_dir
}

/// Zigzag patrol: axis move with a perpendicular wobble every other leg.
/// Scratch: temp1 wobble toggle, temp2 leg countdown.
pub fn movement_twentythree(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let base = a.last_dir;
    if a.temp2 > 0 {
        w.mut_actor(k).temp2 -= 1;
        let wobble = if a.temp1 & 1 == 0 {
            base
        } else if a.temp1 & 2 == 0 {
            base.turn_left()
        } else {
            base.turn_right()
        };
        if walk(k, wobble, 2, w, env) {
            w.update_actor(k, next_frame);
            return base;
        }
        return base.opposite();
    }
    let n = w.rnd.rand(3);
    w.update_actor(k, |a| {
        a.temp2 = 12;
        a.temp1 = n;
    });
    base
}

/// Charger: paces until Thor lines up, then rushes 4px per tick in that
/// direction until blocked, then stands stunned for temp2 ticks. Scratch:
/// temp1 charge flag, temp2 stun countdown.
pub fn movement_twentyfour(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp2 > 0 {
        w.mut_actor(k).temp2 -= 1;
        return a.dir; // stunned: no frame step
    }
    if a.temp1 != 0 {
        let d = a.last_dir;
        if walk(k, d, 4, w, env) {
            w.update_actor(k, next_frame);
            return d;
        }
        w.update_actor(k, |a| {
            a.temp1 = 0;
            a.temp2 = 24;
        });
        return d;
    }
    if let Some(d) = aligned_with_thor(k, w) {
        w.mut_actor(k).temp1 = 1;
        return d;
    }
    walk_or_redirect(k, 2, 3, w, env)
}

/// Blinker: fades out, reappears within 2 tiles of Thor on a walkable
/// cell, then pauses. Scratch: temp1 phase countdown, temp2 phase
/// (0 visible-pause, 1 gone).
pub fn movement_twentyfive(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        return a.dir;
    }
    if a.temp2 == 0 {
        // fade out
        w.update_actor(k, |a| {
            a.solid |= crate::def::SOLID_INTANGIBLE;
            a.temp2 = 1;
            a.temp1 = 16;
        });
        return a.dir;
    }
    // pick a landing spot near Thor
    let t = *w.thor();
    let ox = (w.rnd.rand(4) - 2) * 16;
    let oy = (w.rnd.rand(4) - 2) * 16;
    let nx = (t.x + ox).clamp(0, 320 - a.size_x);
    let ny = (t.y + oy).clamp(0, 192 - a.size_y);
    if w.screen.bgtile(nx, ny) >= TILE_SOLID
        && w.screen.bgtile(nx + a.size_x - 1, ny + a.size_y - 1) >= TILE_SOLID
    {
        w.update_actor(k, |a| {
            a.x = nx;
            a.y = ny;
            a.solid &= !crate::def::SOLID_INTANGIBLE;
            a.temp2 = 0;
            a.temp1 = 30;
        });
    }
    a.dir
}

/// Guardian: wanders but stays leashed within 32px of its spawn anchor
/// (i1/i2, captured on first run).
pub fn movement_twentysix(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.i1 == 0 && a.i2 == 0 {
        w.update_actor(k, |a| {
            a.i1 = a.x;
            a.i2 = a.y;
        });
    }
    let (ax, ay) = (w.actor(k).i1, w.actor(k).i2);
    if (a.x - ax).abs() > 32 || (a.y - ay).abs() > 32 {
        return step_toward(k, ax, ay, true, w, env);
    }
    walk_or_redirect(k, 2, 3, w, env)
}

/// Mimic: copies Thor's horizontal heading, paces vertically otherwise.
pub fn movement_twentyseven(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let td = w.thor().last_dir;
    if td == Dir::Left || td == Dir::Right {
        if walk(k, td, 2, w, env) {
            w.update_actor(k, next_frame);
            return td;
        }
        return w.actor(k).last_dir;
    }
    movement_seven(k, w, env)
}

// water tile ids a fish may occupy
const FISH_TILES: [u8; 5] = [100, 106, 110, 111, 113];

fn fish_tile_ok(w: &World, x: i32, y: i32, size_x: i32, size_y: i32) -> bool {
    FISH_TILES.contains(&w.screen.bgtile(x, y))
        && FISH_TILES.contains(&w.screen.bgtile(x + size_x - 1, y + size_y - 1))
}

/// Fish: swims randomly but only across the water tile allow-list, then
/// surfaces to shoot when its dive timer runs out. Scratch: temp1 mode
/// (0 swim, 1 surfaced), temp2 dive-back timer.
pub fn movement_twentyeight(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp2 == 0 {
        let t = 60 + w.rnd.rand(60);
        w.mut_actor(k).temp2 = t;
    }

    if a.temp1 == 1 {
        // surfaced: cycle the full animation once, shoot at the apex
        w.update_actor(k, next_frame);
        let f = *w.actor(k);
        if f.next_frame + 1 == f.frames_per_direction {
            let t = *w.thor();
            let d = if (t.x - a.x).abs() > (t.y - a.y).abs() {
                if t.x < a.x { Dir::Left } else { Dir::Right }
            } else if t.y < a.y {
                Dir::Up
            } else {
                Dir::Down
            };
            w.mut_actor(k).dir = d;
            actor_shoots(k, w, env);
            let dive = 60 + w.rnd.rand(60);
            w.update_actor(k, |a| {
                a.temp1 = 0;
                a.temp2 = dive;
                a.solid |= crate::def::SOLID_INTANGIBLE;
            });
        }
        return a.dir;
    }

    w.mut_actor(k).temp2 -= 1;
    if w.actor(k).temp2 <= 0 {
        // surface
        w.update_actor(k, |a| {
            a.temp1 = 1;
            a.next_frame = 0;
            a.frame_count = a.frame_speed as i32;
            a.solid &= !crate::def::SOLID_INTANGIBLE;
        });
        return a.dir;
    }

    // submerged swim, constrained to water tiles; no collision scans
    let d = a.last_dir;
    let (dx, dy) = d.delta();
    let (nx, ny) = (a.x + dx * 2, a.y + dy * 2);
    if fish_tile_ok(w, nx, ny, a.size_x, a.size_y) {
        w.update_actor(k, |a| {
            a.x = nx;
            a.y = ny;
            next_frame(a);
        });
        return d;
    }
    Dir::from_index(w.rnd.rand(3) as usize)
}

/// Horizontal darter: dashes between walls with a pause at each end.
/// Scratch: temp1 pause countdown.
pub fn movement_twentynine(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        return a.dir;
    }
    let mut d = a.last_dir;
    if d != Dir::Left && d != Dir::Right {
        d = Dir::Left;
    }
    if walk(k, d, 4, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    w.mut_actor(k).temp1 = 16;
    d.opposite()
}

/// Vertical darter: movement_twentynine along the y axis.
pub fn movement_thirty(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 > 0 {
        w.mut_actor(k).temp1 -= 1;
        return a.dir;
    }
    let mut d = a.last_dir;
    if d != Dir::Up && d != Dir::Down {
        d = Dir::Up;
    }
    if walk(k, d, 4, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    w.mut_actor(k).temp1 = 16;
    d.opposite()
}

/// Dropper: waits until Thor's column is within 8px, falls, then becomes a
/// wanderer.
pub fn movement_thirtyone(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 == 0 {
        let t = *w.thor();
        if (t.center_x() - a.center_x()).abs() <= 8 && t.y > a.y {
            w.mut_actor(k).temp1 = 1;
        }
        return Dir::Down;
    }
    if walk(k, Dir::Down, 4, w, env) {
        w.update_actor(k, next_frame);
    } else {
        w.mut_actor(k).move_type = 3;
    }
    Dir::Down
}

/// Stub slot kept on purpose: actor data may reference it.
pub fn movement_thirtytwo(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    w.actor(k).dir
}

/// Stub slot kept on purpose: actor data may reference it.
pub fn movement_thirtythree(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    w.actor(k).dir
}

/// Stub slot kept on purpose: actor data may reference it.
pub fn movement_thirtyfour(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    w.actor(k).dir
}

/// Drifter: slow flying drift with random right-angle turns.
pub fn movement_thirtyfive(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let d = if w.rnd.rand(15) == 0 {
        match a.last_dir {
            Dir::Up | Dir::Down => {
                if w.rnd.rand(1) == 0 {
                    Dir::Left
                } else {
                    Dir::Right
                }
            }
            _ => {
                if w.rnd.rand(1) == 0 {
                    Dir::Up
                } else {
                    Dir::Down
                }
            }
        }
    } else {
        a.last_dir
    };
    if walk(k, d, 1, w, env) {
        w.update_actor(k, next_frame);
        return d;
    }
    d.opposite()
}

/// Pinwheel: cycles Up, Right, Down, Left on a fixed cadence while moving.
/// Scratch: temp1 ticks left on the current arm.
pub fn movement_thirtysix(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    if a.temp1 <= 0 {
        w.mut_actor(k).temp1 = 8;
        return a.last_dir.turn_right();
    }
    w.mut_actor(k).temp1 -= 1;
    let d = a.last_dir;
    if walk(k, d, 2, w, env) {
        w.update_actor(k, next_frame);
    }
    d
}

/// Orbiter: holds a ~32px ring around Thor, approaching when outside it
/// and backing off when inside.
pub fn movement_thirtyseven(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let t = *w.thor();
    let dx = t.x - a.x;
    let dy = t.y - a.y;
    let dist = dx.abs().max(dy.abs());
    if dist > 40 {
        return step_toward(k, t.x, t.y, true, w, env);
    }
    if dist < 24 {
        return step_toward(k, a.x - dx, a.y - dy, true, w, env);
    }
    // on the ring: circle clockwise
    let d = if dx.abs() > dy.abs() {
        if dx > 0 { Dir::Up } else { Dir::Down }
    } else if dy > 0 {
        Dir::Right
    } else {
        Dir::Left
    };
    if walk(k, d, 2, w, env) {
        w.update_actor(k, next_frame);
    }
    d
}

// movement_thirtyeight macro-register aliases (storage stays on the generic
// scratch fields so the actor serializes flat):
//   temp1/temp2  recorded origin x/y
//   temp3        phase
//   temp4        wait timer
//   i1           optional timer parameter from spawn data
mod dart {
    pub const ARM: i32 = 0;
    pub const WAIT: i32 = 1;
    pub const OUT: i32 = 2;
    pub const BACK: i32 = 3;
}

/// Timed darter: records its origin and a timer on first activation, waits
/// it out motionless, darts along its heading until blocked, reverses, and
/// resets only when it lands exactly on the recorded origin again (a
/// position-equality check, not a timer).
pub fn movement_thirtyeight(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    match a.temp3 {
        dart::ARM => {
            let timer = if a.i1 > 0 { a.i1 } else { 30 + w.rnd.rand(60) };
            w.update_actor(k, |a| {
                a.temp1 = a.x;
                a.temp2 = a.y;
                a.temp4 = timer;
                a.temp3 = dart::WAIT;
            });
            a.last_dir
        }
        dart::WAIT => {
            w.mut_actor(k).temp4 -= 1;
            if w.actor(k).temp4 <= 0 {
                w.mut_actor(k).temp3 = dart::OUT;
            }
            a.last_dir
        }
        dart::OUT => {
            let d = a.last_dir;
            if walk(k, d, 4, w, env) {
                w.update_actor(k, next_frame);
                return d;
            }
            w.mut_actor(k).temp3 = dart::BACK;
            d.opposite()
        }
        _ => {
            let d = a.last_dir;
            if a.x == a.temp1 && a.y == a.temp2 {
                w.mut_actor(k).temp3 = dart::ARM;
                return d;
            }
            walk(k, d, 4, w, env);
            w.update_actor(k, next_frame);
            d
        }
    }
}

/// Shadow: mirrors Thor across the screen's vertical midline and walks
/// toward the mirrored point.
pub fn movement_thirtynine(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let t = *w.thor();
    let a = *w.actor(k);
    let tx = 320 - 16 - t.x;
    let ty = t.y;
    if a.x == tx && a.y == ty {
        return a.dir;
    }
    step_toward(k, tx, ty, true, w, env)
}

/// Explosion/effect wind-down: temp1 frames of animation, then the slot is
/// freed (shots return their budget to the creator).
pub fn movement_forty(k: usize, w: &mut World, _env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    w.update_actor(k, |a| {
        next_frame(a);
        a.temp1 -= 1;
    });
    if w.actor(k).temp1 <= 0 {
        if a.kind == ActorKind::Shot {
            remove_shot(k, w);
        } else {
            w.mut_actor(k).active = false;
        }
    }
    a.dir
}
