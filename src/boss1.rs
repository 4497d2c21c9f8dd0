#[cfg(test)]
#[path = "./boss1_test.rs"]
mod boss1_test;

use crate::def::{
    Actor, ActorKind, BOSS, Dir, FIRST_ENEMY, FUNC_EXPLOSION, MAX_ACTORS, MOVE_EXPLOSION,
    SOLID_INTANGIBLE, World,
};
use crate::env::{GotEnv, Sound};
use crate::movement::check_move2;

/*
=============================================================================

                SHARED BOSS PLUMBING

=============================================================================
*/

/// Mirrors the primary slot into the three quadrant followers every tick.
/// The followers never decide anything themselves; slots k+1..=k+3 are
/// pure render extensions of the 32x32 body.
pub fn propagate_quadrants(k: usize, w: &mut World) {
    const OFFSETS: [(i32, i32); 3] = [(16, 0), (0, 16), (16, 16)];
    let p = *w.actor(k);
    for (j, (ox, oy)) in OFFSETS.iter().enumerate() {
        w.update_actor(k + 1 + j, |q| {
            q.x = p.x + ox;
            q.y = p.y + oy;
            q.dir = p.dir;
            q.last_dir = p.last_dir;
            q.next_frame = p.next_frame;
        });
    }
}

/// Death playout shared by all bosses. The first tick with the death flag
/// pending converts all four body slots into independently-timed explosion
/// effects and removes the remaining minions; after that the conversion has
/// already rerouted dispatch, so any further call is a no-op.
pub fn boss_death_explosions(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    if w.game.boss_dead == 1 {
        env.play_sound(Sound::BossDeath, true);
        for slot in k..=k + 3 {
            let frames = 10 + w.rnd.rand(30);
            w.update_actor(slot, |a| {
                a.active = true;
                a.kind = ActorKind::BossPart;
                a.move_type = MOVE_EXPLOSION;
                a.func_num = FUNC_EXPLOSION;
                a.solid |= SOLID_INTANGIBLE;
                a.hit_strength = 0;
                a.temp1 = frames;
                a.next_frame = 0;
                a.frame_count = a.frame_speed as i32;
            });
        }
        for i in FIRST_ENEMY..MAX_ACTORS {
            if w.actor(i).active && w.actor(i).kind != ActorKind::Shot {
                w.mut_actor(i).active = false;
            }
        }
        w.game.boss_dead = 2;
        w.game.boss_active = false;
        tracing::debug!(boss = w.game.boss_num, "boss defeated");
    }
    w.actor(k).dir
}

/// Spawns an angle shot (per-tick deltas in i1/i2) from the boss center.
pub fn boss_throw(k: usize, i1: i32, i2: i32, w: &mut World) {
    let a = *w.actor(k);
    let dir = if i1.abs() > i2.abs() {
        if i1 < 0 { Dir::Left } else { Dir::Right }
    } else if i2 < 0 {
        Dir::Up
    } else {
        Dir::Down
    };
    let shot = Actor {
        kind: ActorKind::Shot,
        move_type: 4,
        x: a.center_x() - 4,
        y: a.center_y() - 4,
        size_x: 8,
        size_y: 8,
        dir,
        last_dir: dir,
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
        i1,
        i2,
        ..Actor::default()
    };
    w.alloc_actor(shot);
}

/// One greedy 32x32-body step toward (tx, ty), horizontal axis first.
pub fn boss_step_toward(k: usize, tx: i32, ty: i32, step: i32, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    let a = *w.actor(k);
    let dx = (tx - a.x).clamp(-step, step);
    let dy = (ty - a.y).clamp(-step, step);
    if dx != 0 && check_move2(a.x + dx, a.y, k, w, env) {
        return if dx < 0 { Dir::Left } else { Dir::Right };
    }
    if dy != 0 && check_move2(a.x, a.y + dy, k, w, env) {
        return if dy < 0 { Dir::Up } else { Dir::Down };
    }
    a.last_dir
}

/*
=============================================================================

                BOSS 1

=============================================================================
*/

/// First boss: a straight chaser that throws a three-way spread on a
/// cadence held in temp1. Below 30 health it speeds up and halves the
/// cadence.
pub fn boss1_movement(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    if w.game.boss_dead >= 1 {
        return boss_death_explosions(k, w, env);
    }
    let a = *w.actor(k);
    let enraged = a.health < 30;
    let step = if enraged { 4 } else { 2 };
    let (tx, ty) = (w.thor().x, w.thor().y);
    let d = boss_step_toward(k, tx, ty, step, w, env);
    w.update_actor(k, crate::movement::next_frame);

    w.mut_actor(k).temp1 -= 1;
    if w.actor(k).temp1 <= 0 {
        let b = *w.actor(k);
        let t = *w.thor();
        let ax = (t.center_x() - b.center_x()).clamp(-4, 4);
        let ay = (t.center_y() - b.center_y()).clamp(-4, 4);
        boss_throw(k, ax, ay, w);
        // the spread wings swap a component for its perpendicular
        boss_throw(k, ay, ax, w);
        boss_throw(k, -ay, -ax, w);
        env.play_sound(Sound::Swish, false);
        w.mut_actor(k).temp1 = if enraged { 40 } else { 80 };
    }

    propagate_quadrants(k, w);
    d
}

/// Damage entry for any of the four body slots; the health pool lives on
/// the primary.
pub fn check_boss1_hit(_i: usize, damage: i32, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let b = *w.actor(BOSS);
    if w.game.boss_dead >= 1 || b.vulnerable_countdown > 0 {
        return false;
    }
    if b.health > damage {
        w.update_actor(BOSS, |b| {
            b.health -= damage;
            b.vulnerable_countdown = 20;
        });
        env.play_sound(Sound::BossHit, false);
        return false;
    }
    w.update_actor(BOSS, |b| b.health = 0);
    w.game.boss_dead = 1;
    true
}
