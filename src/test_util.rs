use std::collections::HashMap;

use crate::def::{Actor, ActorKind, Dir, World, new_world};
use crate::env::{DialogKind, GotEnv, Sound};

/// Recording environment for tests: serves scripts from an in-memory table
/// and logs every outbound call.
pub struct TestEnv {
    pub scripts: HashMap<String, String>,
    pub sounds: Vec<Sound>,
    pub says: Vec<(String, u8, DialogKind)>,
    pub asks: Vec<(String, Vec<String>)>,
    pub pauses: Vec<i32>,
}

pub fn test_env() -> TestEnv {
    TestEnv {
        scripts: HashMap::new(),
        sounds: Vec::new(),
        says: Vec::new(),
        asks: Vec::new(),
        pauses: Vec::new(),
    }
}

impl GotEnv for TestEnv {
    fn play_sound(&mut self, sound: Sound, _exclusive: bool) {
        self.sounds.push(sound);
    }

    fn read_script_table(&mut self, key: &str) -> Option<String> {
        self.scripts.get(key).cloned()
    }

    fn show_say(&mut self, text: &str, speaker_icon: u8, kind: DialogKind) {
        self.says.push((text.to_string(), speaker_icon, kind));
    }

    fn show_ask(&mut self, title: &str, options: &[String]) {
        self.asks.push((title.to_string(), options.to_vec()));
    }

    fn script_pause(&mut self, ticks: i32) {
        self.pauses.push(ticks);
    }
}

/// World with an all-walkable screen and Thor standing mid-screen.
pub fn test_world() -> World {
    let mut w = new_world(42);
    w.update_actor(crate::def::THOR, |t| {
        t.active = true;
        t.kind = ActorKind::Normal;
        t.x = 64;
        t.y = 64;
        t.size_x = 16;
        t.size_y = 16;
        t.dir = Dir::Down;
        t.last_dir = Dir::Down;
        t.directions = 4;
        t.frames_per_direction = 4;
        t.frame_speed = 4;
        t.frame_count = 4;
        t.health = 150;
        t.solid = 1;
        t.num_moves = 1;
    });
    w
}

pub fn walker_template(x: i32, y: i32, move_type: u8) -> Actor {
    Actor {
        kind: ActorKind::Normal,
        move_type,
        x,
        y,
        size_x: 16,
        size_y: 16,
        dir: Dir::Down,
        last_dir: Dir::Down,
        directions: 4,
        frames_per_direction: 4,
        frame_speed: 4,
        frame_count: 4,
        num_moves: 1,
        health: 10,
        init_health: 10,
        hit_strength: 5,
        solid: 1,
        ..Actor::default()
    }
}

/// Allocates a plain walker enemy in the first free slot.
pub fn spawn_walker(w: &mut World, x: i32, y: i32, move_type: u8) -> usize {
    w.alloc_actor(walker_template(x, y, move_type))
        .expect("free actor slot")
}

/// Installs a live boss into the reserved slots: the 32x32 primary plus
/// its three intangible quadrant followers.
pub fn setup_boss(w: &mut World, boss_num: u8, x: i32, y: i32) {
    use crate::def::{BOSS, SOLID_INTANGIBLE};
    w.game.boss_active = true;
    w.game.boss_num = boss_num;
    w.game.boss_dead = 0;
    w.update_actor(BOSS, |b| {
        *b = Actor {
            active: true,
            kind: ActorKind::BossPart,
            x,
            y,
            size_x: 32,
            size_y: 32,
            dir: Dir::Down,
            last_dir: Dir::Down,
            directions: 4,
            frames_per_direction: 4,
            frame_speed: 4,
            frame_count: 4,
            num_moves: 1,
            health: 100,
            init_health: 100,
            hit_strength: 10,
            strength: 10,
            solid: 1,
            ..Actor::default()
        };
    });
    for (j, (ox, oy)) in [(16, 0), (0, 16), (16, 16)].iter().enumerate() {
        w.update_actor(BOSS + 1 + j, |q| {
            *q = Actor {
                active: true,
                kind: ActorKind::BossPart,
                x: x + ox,
                y: y + oy,
                size_x: 16,
                size_y: 16,
                solid: 1 | SOLID_INTANGIBLE,
                ..Actor::default()
            };
        });
    }
}
