#[cfg(test)]
#[path = "./special_movement_test.rs"]
mod special_movement_test;

use crate::def::{Dir, THOR, THOR_HEALTH_MAX, TILES_HIGH, TILES_WIDE, TILE_SOLID, World};
use crate::env::{GotEnv, Sound};
use crate::movement::check_special_move1;

pub type SpecialMovementFn = fn(usize, usize, usize, &mut World, &mut dyn GotEnv) -> bool;

/// Interaction handlers, reached two ways: from the tile dispatch (ids
/// 201..=210 map to slots 1..=10) and from touching an actor whose func_num
/// is 1..=10 (teleport pads, healers, pushables carried as actors). The
/// return value is the is-passable verdict for the touching move. Side
/// effects stand even when the verdict rejects the move.
pub static SPECIAL_MOVEMENT_FUNC: [SpecialMovementFn; 11] = [
    special_movement_none,
    special_movement_one,
    special_movement_two,
    special_movement_three,
    special_movement_four,
    special_movement_five,
    special_movement_six,
    special_movement_seven,
    special_movement_eight,
    special_movement_nine,
    special_movement_ten,
];

fn special_movement_none(_k: usize, _col: usize, _row: usize, _w: &mut World, _env: &mut dyn GotEnv) -> bool {
    true
}

/// Locked door: consumes a key and melts into plain floor. The opening
/// move itself is still rejected; the next step walks through.
fn special_movement_one(_k: usize, col: usize, row: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    if w.game.thor_info.keys > 0 {
        w.game.thor_info.keys -= 1;
        w.screen.place_tile(col, row, TILE_SOLID);
        env.play_sound(Sound::Door, false);
    }
    false
}

/// Jewel door: like the locked door but paid in jewels.
fn special_movement_two(_k: usize, col: usize, row: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    if w.game.thor_info.jewels >= 10 {
        w.game.thor_info.jewels -= 10;
        w.screen.place_tile(col, row, TILE_SOLID);
        env.play_sound(Sound::Door, false);
    }
    false
}

/// Teleporter: jumps Thor to the matching pad elsewhere on the screen
/// (same tile id, different cell). With no twin the pad is inert.
fn special_movement_three(k: usize, col: usize, row: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let id = w.screen.tile(col, row);
    for r in 0..TILES_HIGH {
        for c in 0..TILES_WIDE {
            if (c, r) != (col, row) && w.screen.tile(c, r) == id {
                let who = if k < crate::def::MAX_ACTORS && w.actor(k).active { k } else { THOR };
                w.update_actor(who, |a| {
                    a.x = c as i32 * 16;
                    a.y = r as i32 * 16;
                });
                env.play_sound(Sound::Woop, false);
                return false;
            }
        }
    }
    true
}

/// Healing pad: restores 1 health per touching tick.
fn special_movement_four(_k: usize, _col: usize, _row: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    if w.thor().health < THOR_HEALTH_MAX {
        w.update_actor(THOR, |t| {
            t.health = (t.health + 1).min(THOR_HEALTH_MAX);
        });
        env.play_sound(Sound::Angel, false);
    }
    true
}

/// Floor switch: toggles the event flag keyed by the cell index and leaves
/// a pressed (plain) tile behind, so it fires once.
fn special_movement_five(_k: usize, col: usize, row: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let cell = row * TILES_WIDE + col;
    let n = cell % 64;
    let cur = w.game.flag(n);
    w.game.set_flag(n, !cur);
    w.screen.place_tile(col, row, TILE_SOLID);
    env.play_sound(Sound::Clang, false);
    true
}

/// Pit: hurts Thor and snaps him back to the position recorded on the
/// previous frame page.
fn special_movement_six(_k: usize, _col: usize, _row: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let page = w.game.pge ^ 1;
    w.update_actor(THOR, |t| {
        t.health = (t.health - 2).max(0);
        t.x = t.last_x[page];
        t.y = t.last_y[page];
    });
    env.play_sound(Sound::Fall, true);
    if w.thor().health == 0 {
        w.game.thor_dead = true;
    }
    false
}

/// Conveyor: shoves the actor 2px in the direction stored in the cell's
/// object_index. The push uses the tile-only validator, so it cannot
/// cascade into contact damage.
fn special_movement_seven(k: usize, col: usize, row: usize, w: &mut World, _env: &mut dyn GotEnv) -> bool {
    let cell = row * TILES_WIDE + col;
    let d = Dir::from_index(w.screen.object_index[cell] as usize);
    let (dx, dy) = d.delta();
    let a = *w.actor(k);
    check_special_move1(a.x + dx * 2, a.y + dy * 2, k, w);
    true
}

/// Ice: arms the slip countdown that overrides player input.
fn special_movement_eight(_k: usize, _col: usize, _row: usize, w: &mut World, _env: &mut dyn GotEnv) -> bool {
    if !w.game.slip_flag {
        w.game.slipping = true;
        w.game.slip_flag = true;
        w.game.slip_count = 16;
    }
    true
}

/// Sign: raises the script side channel with the index stored in the
/// cell's object_index; the sign itself blocks.
fn special_movement_nine(_k: usize, col: usize, row: usize, w: &mut World, _env: &mut dyn GotEnv) -> bool {
    let cell = row * TILES_WIDE + col;
    w.game.script_request = Some(w.screen.object_index[cell] as i32);
    false
}

/// Toll tile: passable only while carrying 5 jewels, which it takes.
fn special_movement_ten(_k: usize, _col: usize, _row: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    if w.game.thor_info.jewels >= 5 {
        w.game.thor_info.jewels -= 5;
        env.play_sound(Sound::Gulp, false);
        return true;
    }
    false
}
