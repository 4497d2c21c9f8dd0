#[cfg(test)]
#[path = "./boss3_test.rs"]
mod boss3_test;

use crate::boss1::{boss_death_explosions, boss_throw, propagate_quadrants};
use crate::def::{BOSS, Dir, SOLID_INTANGIBLE, TILE_SOLID, World};
use crate::env::{GotEnv, Sound};
use crate::movement::next_frame;

// temp1 phase values
const HIDDEN: i32 = 0;
const VISIBLE: i32 = 1;

/// Third boss: teleporting artillery. It sits intangible and invisible to
/// collision (temp2 counting down), blinks in at a random walkable spot,
/// fires a four-way diagonal volley, lingers briefly, and vanishes again.
/// Below 30 health the hidden period shrinks and the volley doubles.
pub fn boss3_movement(k: usize, w: &mut World, env: &mut dyn GotEnv) -> Dir {
    if w.game.boss_dead >= 1 {
        return boss_death_explosions(k, w, env);
    }
    let a = *w.actor(k);
    let enraged = a.health < 30;

    if a.temp2 > 0 {
        w.update_actor(k, |b| {
            b.temp2 -= 1;
            next_frame(b);
        });
        propagate_quadrants(k, w);
        return a.dir;
    }

    if a.temp1 == HIDDEN {
        // blink in somewhere the 32x32 body fits
        for _ in 0..20 {
            let nx = w.rnd.rand(17) * 16;
            let ny = w.rnd.rand(9) * 16;
            if w.screen.bgtile(nx, ny) >= TILE_SOLID
                && w.screen.bgtile(nx + 31, ny + 31) >= TILE_SOLID
            {
                w.update_actor(k, |b| {
                    b.x = nx;
                    b.y = ny;
                });
                break;
            }
        }
        w.update_actor(k, |b| {
            b.solid &= !SOLID_INTANGIBLE;
            b.temp1 = VISIBLE;
            b.temp2 = 30;
        });
        env.play_sound(Sound::Woop, false);

        boss_throw(k, 3, 3, w);
        boss_throw(k, 3, -3, w);
        boss_throw(k, -3, 3, w);
        boss_throw(k, -3, -3, w);
        if enraged {
            boss_throw(k, 4, 0, w);
            boss_throw(k, -4, 0, w);
            boss_throw(k, 0, 4, w);
            boss_throw(k, 0, -4, w);
        }
        tracing::debug!(x = w.actor(k).x, y = w.actor(k).y, "boss3 volley");
    } else {
        // fade out and rearm the hidden timer
        let hidden = if enraged { 20 } else { 50 };
        w.update_actor(k, |b| {
            b.solid |= SOLID_INTANGIBLE;
            b.temp1 = HIDDEN;
            b.temp2 = hidden;
        });
    }

    propagate_quadrants(k, w);
    a.dir
}

/// Damage entry: the boss can only be hurt while blinked in; hits during
/// the hidden phase ring off harmlessly.
pub fn check_boss3_hit(_i: usize, damage: i32, w: &mut World, env: &mut dyn GotEnv) -> bool {
    let b = *w.actor(BOSS);
    if w.game.boss_dead >= 1 || b.vulnerable_countdown > 0 {
        return false;
    }
    if b.is_intangible() {
        env.play_sound(Sound::Clang, false);
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
