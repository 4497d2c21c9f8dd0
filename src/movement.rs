#[cfg(test)]
#[path = "./movement_test.rs"]
mod movement_test;

use crate::boss1::{boss1_movement, check_boss1_hit};
use crate::boss2::{boss2_movement, check_boss2_hit};
use crate::boss3::{boss3_movement, check_boss3_hit};
use crate::def::{
    Actor, ActorKind, Dir, BOSS, FUNC_EXPLOSION, MAX_ACTORS, MOVE_EXPLOSION, SCORE_MAX,
    SCREEN_PIX_H, SCREEN_PIX_W, THOR, TILE_FLY, TILE_SPECIAL, World,
};
use crate::env::{GotEnv, Sound};
use crate::geom::overlap;
use crate::level::Screen;
use crate::move_patterns::{MOVEMENT_FUNC, movement_forty};
use crate::shot_movement::SHOT_MOVEMENT_FUNC;
use crate::special_movement::SPECIAL_MOVEMENT_FUNC;
use crate::special_tile::{special_tile, special_tile_thor};

// loot ids written into the object map
pub const OBJ_JEWEL: u8 = 1;
pub const OBJ_HEALTH: u8 = 2;
pub const OBJ_MAGIC: u8 = 3;
pub const OBJ_KEY: u8 = 4;

/*
=============================================================================

                PER-TICK DRIVER

=============================================================================
*/

/// Runs one actor for one game tick: decrements its pacing countdown and,
/// once expired, dispatches its movement behavior num_moves times. Boss
/// quadrant followers (slots 4..=6) are skipped here; the primary boss
/// propagates into them every tick.
pub fn move_actor(k: usize, w: &mut World, env: &mut dyn GotEnv) {
    if !w.actor(k).active {
        return;
    }

    w.update_actor(k, |a| {
        if a.vulnerable_countdown > 0 {
            a.vulnerable_countdown -= 1;
        }
        if a.shot_countdown > 0 {
            a.shot_countdown -= 1;
        }
        if a.move_counter > 0 {
            a.move_counter -= 1;
        }
    });

    if w.actor(k).move_countdown > 0 {
        w.mut_actor(k).move_countdown -= 1;
        return;
    }
    let speed = w.actor(k).speed as i32;
    w.mut_actor(k).move_countdown = speed;

    let num_moves = w.actor(k).num_moves.max(1);
    for _ in 0..num_moves {
        let a = *w.actor(k);
        if !a.active {
            break;
        }
        let d = match a.kind {
            ActorKind::Shot => {
                if a.move_type == MOVE_EXPLOSION {
                    movement_forty(k, w, env)
                } else {
                    let idx = (a.move_type as usize).min(SHOT_MOVEMENT_FUNC.len() - 1);
                    SHOT_MOVEMENT_FUNC[idx](k, w, env)
                }
            }
            ActorKind::BossPart => {
                if a.move_type == MOVE_EXPLOSION {
                    movement_forty(k, w, env)
                } else if k == BOSS {
                    match w.game.boss_num {
                        2 => boss2_movement(k, w, env),
                        3 => boss3_movement(k, w, env),
                        _ => boss1_movement(k, w, env),
                    }
                } else {
                    a.dir
                }
            }
            _ => {
                let idx = (a.move_type as usize).min(MOVEMENT_FUNC.len() - 1);
                MOVEMENT_FUNC[idx](k, w, env)
            }
        };

        let pge = w.game.pge;
        w.update_actor(k, |a| {
            a.last_dir = d;
            a.dir = if a.directions == 1 { Dir::Up } else { d };
            a.last_x[pge] = a.x;
            a.last_y[pge] = a.y;
        });
    }
}

/// Advances the animation counters. Behaviors call this on the exit paths
/// that animate; several deliberately skip it (noted per behavior).
pub fn next_frame(a: &mut Actor) {
    a.frame_count -= 1;
    if a.frame_count <= 0 {
        a.frame_count = a.frame_speed as i32;
        a.next_frame = if a.frames_per_direction > 0 {
            (a.next_frame + 1) % a.frames_per_direction
        } else {
            0
        };
    }
}

/*
=============================================================================

                DAMAGE AND DESTRUCTION

=============================================================================
*/

/// Applies contact/shot damage from actor k to Thor, honoring i-frames and
/// the raised shield (absorbs hits from the facing side only).
pub fn thor_damaged(k: usize, w: &mut World, env: &mut dyn GotEnv) {
    let hit = w.actor(k).hit_strength as i32;
    if hit == 0 {
        return;
    }
    let thor = *w.thor();
    if thor.vulnerable_countdown > 0 || thor.is_intangible() {
        return;
    }
    if w.game.shield_on && facing(&thor, w.actor(k)) {
        env.play_sound(Sound::Clang, false);
        return;
    }
    w.update_actor(THOR, |t| {
        t.health = (t.health - hit).max(0);
        t.vulnerable_countdown = 40;
    });
    env.play_sound(Sound::Ow, true);
    if w.thor().health == 0 {
        w.game.thor_dead = true;
    }
}

fn facing(thor: &Actor, other: &Actor) -> bool {
    let dx = other.center_x() - thor.center_x();
    let dy = other.center_y() - thor.center_y();
    let from = if dx.abs() > dy.abs() {
        if dx > 0 { Dir::Right } else { Dir::Left }
    } else if dy > 0 {
        Dir::Down
    } else {
        Dir::Up
    };
    thor.dir == from
}

/// Returns true if the hit killed the actor.
pub fn actor_damaged(k: usize, damage: i32, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let a = *w.actor(k);
    if !a.active || a.is_intangible() || a.vulnerable_countdown > 0 {
        return false;
    }
    if a.health > damage {
        w.update_actor(k, |a| {
            a.health -= damage;
            a.vulnerable_countdown = 8;
        });
        env.play_sound(Sound::EnemyHit, false);
        return false;
    }
    actor_destroyed(k, w, env);
    true
}

/// Scores the kill, rolls loot, and recycles the slot as a short explosion
/// effect (movement_forty winds it down and frees the slot).
pub fn actor_destroyed(k: usize, w: &mut World, env: &mut dyn GotEnv) {
    let a = *w.actor(k);
    if a.kind == ActorKind::Shot {
        remove_shot(k, w);
        return;
    }
    let score = w.game.thor_info.score;
    w.game.thor_info.score = (score + a.init_health * 10).min(SCORE_MAX);
    drop_object(k, w);
    env.play_sound(Sound::Boom, false);
    w.update_actor(k, |a| {
        a.move_type = MOVE_EXPLOSION;
        a.func_num = FUNC_EXPLOSION;
        a.solid |= crate::def::SOLID_INTANGIBLE;
        a.health = 0;
        a.hit_strength = 0;
        a.temp1 = 8;
        a.next_frame = 0;
        a.frame_count = a.frame_speed as i32;
    });
}

/// Frees a shot slot and returns the shot budget to its creator.
pub fn remove_shot(k: usize, w: &mut World) {
    let creator = w.actor(k).creator as usize;
    w.mut_actor(k).active = false;
    if creator != k && creator < MAX_ACTORS {
        let c = w.mut_actor(creator);
        if c.active && c.curr_num_shots > 0 {
            c.curr_num_shots -= 1;
        }
    }
}

/// drop_rating-weighted loot roll at the dead actor's center tile.
pub fn drop_object(k: usize, w: &mut World) {
    let a = *w.actor(k);
    if w.rnd.rand(99) >= a.drop_rating as i32 {
        return;
    }
    let object = match w.rnd.rand(9) {
        0..=3 => OBJ_JEWEL,
        4..=6 => OBJ_HEALTH,
        7..=8 => OBJ_MAGIC,
        _ => OBJ_KEY,
    };
    w.screen.drop_object_at(a.center_x(), a.center_y(), object);
}

/// Spawns a projectile for actor k if it has shot budget left. The shot
/// starts at a muzzle offset on the firing side and runs the creator's
/// shot_pattern behavior.
pub fn actor_shoots(k: usize, w: &mut World, env: &mut dyn GotEnv) {
    let a = *w.actor(k);
    if a.curr_num_shots >= a.num_shots_allowed || a.shot_countdown > 0 {
        return;
    }
    let (sx, sy) = match a.dir {
        Dir::Up => (a.center_x() - 4, a.y - 8),
        Dir::Down => (a.center_x() - 4, a.y + a.size_y),
        Dir::Left => (a.x - 8, a.center_y() - 4),
        Dir::Right => (a.x + a.size_x, a.center_y() - 4),
    };
    let shot = Actor {
        kind: ActorKind::Shot,
        move_type: a.shot_pattern,
        x: sx,
        y: sy,
        size_x: 8,
        size_y: 8,
        dir: a.dir,
        last_dir: a.dir,
        directions: 4,
        frames_per_direction: 4,
        frame_speed: 4,
        frame_count: 4,
        num_moves: 1,
        health: 1,
        hit_strength: a.strength,
        solid: 1,
        flying: true,
        creator: k as u8,
        ..Actor::default()
    };
    if let Some(slot) = w.alloc_actor(shot) {
        w.update_actor(k, |a| {
            a.curr_num_shots += 1;
            a.shot_countdown = 30;
            a.shot_actor = slot as u8;
        });
        env.play_sound(Sound::Swish, false);
    }
}

/*
=============================================================================

                MOVE-VALIDATION LAYER

=============================================================================
*/

fn in_bounds(x: i32, y: i32, a: &Actor) -> bool {
    x >= 0 && y >= 0 && x + a.size_x <= SCREEN_PIX_W && y + a.size_y <= SCREEN_PIX_H
}

// Thor's footprint is a reduced box near the feet, sampled at two points.
fn thor_tiles_clear(screen: &Screen, x: i32, y: i32, threshold: u8) -> bool {
    screen.bgtile(x + 2, y + 8) >= threshold && screen.bgtile(x + 13, y + 15) >= threshold
}

/// Thor move entry: crossing a level edge raises the screen-transition side
/// channel instead of validating tiles.
pub fn check_move0(x: i32, y: i32, k: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    if x < 0 {
        w.game.screen_exit = Some(Dir::Left);
        return true;
    }
    if x > SCREEN_PIX_W - 16 {
        w.game.screen_exit = Some(Dir::Right);
        return true;
    }
    if y < 0 {
        w.game.screen_exit = Some(Dir::Up);
        return true;
    }
    if y > SCREEN_PIX_H - 16 {
        w.game.screen_exit = Some(Dir::Down);
        return true;
    }
    check_thor_move(x, y, k, w, env)
}

/// Validates a Thor candidate position: feet-footprint tile sampling with
/// diagonal wall-sliding, special-tile triggers, then the enemy contact
/// scan. Special-tile side effects are deliberately not rolled back when a
/// later stage rejects the move.
pub fn check_thor_move(x: i32, y: i32, k: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let thor = *w.actor(k);
    let threshold = thor.solid_threshold();

    if !thor_tiles_clear(&w.screen, x, y, threshold) {
        // diagonal wall-slide: when exactly one of the two single-axis
        // candidates is open, retry with a 2px nudge on the open axis
        if w.game.diag != 0 && !w.game.diag_flag {
            let horiz_ok = thor_tiles_clear(&w.screen, x, thor.y, threshold);
            let vert_ok = thor_tiles_clear(&w.screen, thor.x, y, threshold);
            let nudge = match (w.game.diag, horiz_ok, vert_ok) {
                (1, true, false) => Some((-2, 0)), // up-left, up blocked
                (1, false, true) => Some((0, -2)), // up-left, left blocked
                (2, true, false) => Some((2, 0)),  // up-right, up blocked
                (2, false, true) => Some((0, -2)), // up-right, right blocked
                (3, true, false) => Some((-2, 0)), // down-left, down blocked
                (3, false, true) => Some((0, 2)),  // down-left, left blocked
                (4, true, false) => Some((2, 0)),  // down-right, down blocked
                (4, false, true) => Some((0, 2)),  // down-right, right blocked
                _ => None,
            };
            if let Some((nx, ny)) = nudge {
                w.game.diag_flag = true;
                let ok = check_thor_move(thor.x + nx, thor.y + ny, k, w, env);
                w.game.diag_flag = false;
                return ok;
            }
        }
        return false;
    }

    for (px, py) in [(x + 2, y + 8), (x + 13, y + 15)] {
        let icn = w.screen.bgtile(px, py);
        if icn > TILE_SPECIAL {
            let col = ((px + 1) >> 4) as usize;
            let row = ((py + 1) >> 4) as usize;
            if !special_tile_thor(k, col, row, icn, w, env) {
                return false;
            }
        }
    }

    for i in BOSS..MAX_ACTORS {
        if i == k || !w.actor(i).active {
            continue;
        }
        let o = *w.actor(i);
        if (o.x - x).abs() > 16 || (o.y - y).abs() > 16 {
            continue;
        }
        if !overlap(
            x,
            y,
            x + thor.size_x - 1,
            y + thor.size_y - 1,
            o.x,
            o.y,
            o.x + o.size_x - 1,
            o.y + o.size_y - 1,
        ) {
            continue;
        }
        if o.func_num == FUNC_EXPLOSION {
            continue;
        }
        if o.kind == ActorKind::Talker {
            w.game.script_request = Some(o.talk_index);
            continue;
        }
        if (1..=10).contains(&o.func_num) {
            let col = (((o.center_x()) + 1) >> 4) as usize;
            let row = (((o.center_y()) + 1) >> 4) as usize;
            let f = SPECIAL_MOVEMENT_FUNC[o.func_num as usize];
            if !f(i, col.min(19), row.min(11), w, env) {
                return false;
            }
            continue;
        }
        if !o.is_intangible() {
            thor_damaged(i, w, env);
        }
    }

    w.update_actor(k, |a| {
        a.x = x;
        a.y = y;
    });
    true
}

/// Thor-weapon validator: the weapon flies over low tiles and stops on the
/// first enemy or boss part it overlaps (damaging it).
pub fn check_move1(x: i32, y: i32, k: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let a = *w.actor(k);
    if !in_bounds(x, y, &a) {
        return false;
    }
    let corners = [
        (x, y),
        (x + a.size_x - 1, y),
        (x, y + a.size_y - 1),
        (x + a.size_x - 1, y + a.size_y - 1),
    ];
    for (px, py) in corners {
        if w.screen.bgtile(px, py) < TILE_FLY {
            return false;
        }
    }

    let mut hit = false;
    for i in BOSS..MAX_ACTORS {
        if i == k || !w.actor(i).active {
            continue;
        }
        let o = *w.actor(i);
        if o.kind == ActorKind::Shot || o.func_num == FUNC_EXPLOSION {
            continue;
        }
        // boss followers are intangible to movement but still take hits
        let boss_part = w.game.boss_active && (BOSS..=BOSS + 3).contains(&i);
        if o.is_intangible() && !boss_part {
            continue;
        }
        if (o.x - x).abs() > 16 || (o.y - y).abs() > 16 {
            continue;
        }
        if !overlap(
            x,
            y,
            x + a.size_x - 1,
            y + a.size_y - 1,
            o.x,
            o.y,
            o.x + o.size_x - 1,
            o.y + o.size_y - 1,
        ) {
            continue;
        }
        if boss_part {
            match w.game.boss_num {
                2 => check_boss2_hit(i, a.hit_strength as i32, w, env),
                3 => check_boss3_hit(i, a.hit_strength as i32, w, env),
                _ => check_boss1_hit(i, a.hit_strength as i32, w, env),
            };
        } else {
            actor_damaged(i, a.hit_strength as i32, w, env);
        }
        hit = true;
    }
    if hit {
        return false;
    }

    w.update_actor(k, |a| {
        a.x = x;
        a.y = y;
    });
    true
}

/// Walking-enemy validator: tile solidity, special tiles, then blocking
/// overlap against Thor (with contact damage) and other solid actors.
/// On rejection the actor position is untouched.
pub fn check_move2(x: i32, y: i32, k: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let a = *w.actor(k);
    if !in_bounds(x, y, &a) {
        return false;
    }
    let threshold = a.solid_threshold();
    let samples = [(x, y), (x + a.size_x - 1, y + a.size_y - 1)];
    for (px, py) in samples {
        if w.screen.bgtile(px, py) < threshold {
            return false;
        }
    }
    for (px, py) in samples {
        let icn = w.screen.bgtile(px, py);
        if icn > TILE_SPECIAL {
            let col = ((px + 1) >> 4) as usize;
            let row = ((py + 1) >> 4) as usize;
            if !special_tile(k, col, row, icn, w, env) {
                return false;
            }
        }
    }

    let t = *w.thor();
    if t.active
        && (t.x - x).abs() <= 16
        && (t.y - y).abs() <= 16
        && overlap(
            x,
            y,
            x + a.size_x - 1,
            y + a.size_y - 1,
            t.x,
            t.y,
            t.x + t.size_x - 1,
            t.y + t.size_y - 1,
        )
    {
        thor_damaged(k, w, env);
        return false;
    }

    for i in BOSS..MAX_ACTORS {
        if i == k || !w.actor(i).active {
            continue;
        }
        let o = *w.actor(i);
        if o.kind == ActorKind::Shot || o.is_intangible() {
            continue;
        }
        if (o.x - x).abs() > 16 || (o.y - y).abs() > 16 {
            continue;
        }
        if overlap(
            x,
            y,
            x + a.size_x - 1,
            y + a.size_y - 1,
            o.x,
            o.y,
            o.x + o.size_x - 1,
            o.y + o.size_y - 1,
        ) {
            return false;
        }
    }

    w.update_actor(k, |a| {
        a.x = x;
        a.y = y;
    });
    true
}

/// Enemy-shot validator: flies over low tiles, detonates on Thor (contact
/// damage), blocked only by actors whose collision class stops shots. The
/// creator is excluded from the scan.
pub fn check_move3(x: i32, y: i32, k: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let a = *w.actor(k);
    if !in_bounds(x, y, &a) {
        return false;
    }
    let samples = [(x, y), (x + a.size_x - 1, y + a.size_y - 1)];
    for (px, py) in samples {
        if w.screen.bgtile(px, py) < TILE_FLY {
            return false;
        }
    }

    let t = *w.thor();
    if t.active
        && (t.x - x).abs() <= 16
        && (t.y - y).abs() <= 16
        && overlap(
            x,
            y,
            x + a.size_x - 1,
            y + a.size_y - 1,
            t.x,
            t.y,
            t.x + t.size_x - 1,
            t.y + t.size_y - 1,
        )
    {
        thor_damaged(k, w, env);
        return false;
    }

    for i in BOSS..MAX_ACTORS {
        if i == k || i == a.creator as usize || !w.actor(i).active {
            continue;
        }
        let o = *w.actor(i);
        if o.kind == ActorKind::Shot || o.is_intangible() {
            continue;
        }
        if o.solid & crate::def::SOLID_CLASS != crate::def::SOLID_BLOCKS_SHOTS {
            continue;
        }
        if (o.x - x).abs() > 16 || (o.y - y).abs() > 16 {
            continue;
        }
        if overlap(
            x,
            y,
            x + a.size_x - 1,
            y + a.size_y - 1,
            o.x,
            o.y,
            o.x + o.size_x - 1,
            o.y + o.size_y - 1,
        ) {
            return false;
        }
    }

    w.update_actor(k, |a| {
        a.x = x;
        a.y = y;
    });
    true
}

/// Flying-enemy validator: like check_move2 with the fly-over threshold and
/// no special-tile triggers.
pub fn check_move4(x: i32, y: i32, k: usize, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let a = *w.actor(k);
    if !in_bounds(x, y, &a) {
        return false;
    }
    let samples = [(x, y), (x + a.size_x - 1, y + a.size_y - 1)];
    for (px, py) in samples {
        if w.screen.bgtile(px, py) < TILE_FLY {
            return false;
        }
    }

    let t = *w.thor();
    if t.active
        && (t.x - x).abs() <= 16
        && (t.y - y).abs() <= 16
        && overlap(
            x,
            y,
            x + a.size_x - 1,
            y + a.size_y - 1,
            t.x,
            t.y,
            t.x + t.size_x - 1,
            t.y + t.size_y - 1,
        )
    {
        thor_damaged(k, w, env);
        return false;
    }

    for i in BOSS..MAX_ACTORS {
        if i == k || !w.actor(i).active {
            continue;
        }
        let o = *w.actor(i);
        if o.kind == ActorKind::Shot || o.is_intangible() {
            continue;
        }
        if (o.x - x).abs() > 16 || (o.y - y).abs() > 16 {
            continue;
        }
        if overlap(
            x,
            y,
            x + a.size_x - 1,
            y + a.size_y - 1,
            o.x,
            o.y,
            o.x + o.size_x - 1,
            o.y + o.size_y - 1,
        ) {
            return false;
        }
    }

    w.update_actor(k, |a| {
        a.x = x;
        a.y = y;
    });
    true
}

/// Tile-only validator used by special-tile pushes (conveyors, knockback):
/// skips the actor scan entirely so a push cannot cascade into damage.
pub fn check_special_move1(x: i32, y: i32, k: usize, w: &mut World) -> bool {
    let a = *w.actor(k);
    if !in_bounds(x, y, &a) {
        return false;
    }
    let threshold = a.solid_threshold();
    let samples = [(x, y), (x + a.size_x - 1, y + a.size_y - 1)];
    for (px, py) in samples {
        if w.screen.bgtile(px, py) < threshold {
            return false;
        }
    }
    w.update_actor(k, |a| {
        a.x = x;
        a.y = y;
    });
    true
}
