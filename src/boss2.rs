#[cfg(test)]
#[path = "./boss2_test.rs"]
mod boss2_test;

use crate::boss1::{boss_death_explosions, boss_step_toward, propagate_quadrants};
use crate::def::{Actor, ActorKind, BOSS, Dir, World};
use crate::env::{GotEnv, Sound};
use crate::movement::{check_move2, next_frame};

/// Second boss, two phases keyed off its health. Above half health it
/// sweeps the screen horizontally and drops timed bombs behind itself
/// (temp1 cadence). At half health it switches to chasing Thor directly
/// and summoning walker minions (temp2 cadence).
pub fn boss2_movement(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    if w.game.boss_dead >= 1 {
        return boss_death_explosions(k, w, env);
    }
    let a = *w.actor(k);

    let d = if a.health > 50 {
        // sweep phase
        let mut d = a.last_dir;
        if d != Dir::Left && d != Dir::Right {
            d = Dir::Left;
        }
        let (dx, _) = d.delta();
        if check_move2(a.x + dx * 2, a.y, k, w, env) {
            w.update_actor(k, next_frame);
        } else {
            d = d.opposite();
        }

        w.mut_actor(k).temp1 -= 1;
        if w.actor(k).temp1 <= 0 {
            drop_bomb(k, w);
            w.mut_actor(k).temp1 = 60;
        }
        d
    } else {
        // chase phase
        let (tx, ty) = (w.thor().x, w.thor().y);
        let d = boss_step_toward(k, tx, ty, 2, w, env);
        w.update_actor(k, next_frame);

        w.mut_actor(k).temp2 -= 1;
        if w.actor(k).temp2 <= 0 {
            summon_minion(k, w, env);
            w.mut_actor(k).temp2 = 120;
        }
        d
    };

    propagate_quadrants(k, w);
    d
}

/// Lays a stationary timed bomb (shot behavior 7) under the boss.
fn drop_bomb(k: usize, w: &mut World) {
    let a = *w.actor(k);
    let bomb = Actor {
        kind: ActorKind::Shot,
        move_type: 7,
        x: a.center_x() - 4,
        y: a.y + 32,
        size_x: 8,
        size_y: 8,
        dir: Dir::Down,
        last_dir: Dir::Down,
        directions: 4,
        frames_per_direction: 4,
        frame_speed: 6,
        frame_count: 6,
        num_moves: 1,
        health: 1,
        hit_strength: a.strength,
        solid: 1,
        flying: true,
        creator: k as u8,
        ..Actor::default()
    };
    w.alloc_actor(bomb);
}

/// Summons a wandering walker next to the boss.
fn summon_minion(k: usize, w: &mut World, env: &mut dyn GotEnv) {
    let a = *w.actor(k);
    let minion = Actor {
        kind: ActorKind::Normal,
        move_type: 3,
        x: a.x + if w.rnd.rand(1) == 0 { -16 } else { 32 },
        y: a.y + 8,
        size_x: 16,
        size_y: 16,
        dir: Dir::Down,
        last_dir: Dir::Down,
        directions: 4,
        frames_per_direction: 4,
        frame_speed: 8,
        frame_count: 8,
        num_moves: 1,
        speed: 1,
        health: 10,
        init_health: 10,
        hit_strength: 5,
        solid: 1,
        drop_rating: 10,
        ..Actor::default()
    };
    if w.alloc_actor(minion).is_some() {
        env.play_sound(Sound::Woop, false);
    }
}

/// Damage entry; crossing the half-health line flips the boss into its
/// chase phase, which boss2_movement reads straight off the health value.
pub fn check_boss2_hit(_i: usize, damage: i32, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let b = *w.actor(BOSS);
    if w.game.boss_dead >= 1 || b.vulnerable_countdown > 0 {
        return false;
    }
    if b.health > damage {
        let was_sweeping = b.health > 50;
        w.update_actor(BOSS, |b| {
            b.health -= damage;
            b.vulnerable_countdown = 20;
        });
        env.play_sound(Sound::BossHit, false);
        if was_sweeping && w.actor(BOSS).health <= 50 {
            tracing::debug!("boss2 enters chase phase");
        }
        return false;
    }
    w.update_actor(BOSS, |b| b.health = 0);
    w.game.boss_dead = 1;
    true
}
