#[cfg(test)]
#[path = "./def_test.rs"]
mod def_test;

use serde::{Deserialize, Serialize};

use crate::level::{Screen, new_screen};
use crate::util::{Rnd, new_rnd};

pub const SCREEN_PIX_W: i32 = 320;
pub const SCREEN_PIX_H: i32 = 192;
pub const TILE_SIZE: i32 = 16;
pub const TILES_WIDE: usize = 20;
pub const TILES_HIGH: usize = 12;

// Tile id bands. Ids below an actor's threshold block it; walkers need
// TILE_SOLID, fliers only TILE_FLY. Ids above TILE_SPECIAL trigger the
// special-tile dispatch.
pub const TILE_FLY: u8 = 80;
pub const TILE_SOLID: u8 = 140;
pub const TILE_SPECIAL: u8 = 200;

pub const MAX_ACTORS: usize = 35;

// Reserved actor slots.
pub const THOR: usize = 0;
pub const HAMMER: usize = 1;
pub const SHIELD: usize = 2;
pub const BOSS: usize = 3; // quadrant followers occupy 4..=6
pub const FIRST_ENEMY: usize = 7;

// solid bitfield: low 7 bits collision class, bit 7 currently intangible
pub const SOLID_INTANGIBLE: u8 = 0x80;
pub const SOLID_CLASS: u8 = 0x7f;
pub const SOLID_BLOCKS_SHOTS: u8 = 2;

// func_num sentinel marking an explosion effect
pub const FUNC_EXPLOSION: u8 = 255;

pub const THOR_HEALTH_MAX: i32 = 150;
pub const MAGIC_MAX: i32 = 150;
pub const JEWELS_MAX: i32 = 999;
pub const KEYS_MAX: i32 = 99;
pub const SCORE_MAX: i32 = 999_999;

// explosion/effect behavior slot in the movement table
pub const MOVE_EXPLOSION: u8 = 40;
pub const MOVE_BOULDER_STOPPED: u8 = 15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Dir {
    #[default]
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Dir {
    pub fn from_index(i: usize) -> Dir {
        match i & 3 {
            0 => Dir::Up,
            1 => Dir::Down,
            2 => Dir::Left,
            _ => Dir::Right,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }

    pub fn turn_right(self) -> Dir {
        match self {
            Dir::Up => Dir::Right,
            Dir::Right => Dir::Down,
            Dir::Down => Dir::Left,
            Dir::Left => Dir::Up,
        }
    }

    pub fn turn_left(self) -> Dir {
        match self {
            Dir::Up => Dir::Left,
            Dir::Left => Dir::Down,
            Dir::Down => Dir::Right,
            Dir::Right => Dir::Up,
        }
    }

    /// Unit displacement for this direction (screen y grows downward).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    #[default]
    Normal,
    BossPart,
    Shot,
    Talker,
}

/// The central mutable entity. Field order is the persistence order; every
/// movement behavior must be resumable from these fields plus the tile grid
/// alone. temp1..temp6 and i1..i6 are generic scratch registers whose meaning
/// is defined per behavior (see move_patterns.rs) and must stay generic here.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Actor {
    pub active: bool,
    pub actor_num: u8,
    pub kind: ActorKind,
    pub move_type: u8,
    pub func_num: u8,

    pub x: i32,
    pub y: i32,
    pub size_x: i32,
    pub size_y: i32,

    pub dir: Dir,
    pub last_dir: Dir,
    pub directions: u8,
    pub frames_per_direction: u8,
    pub num_moves: u8,
    pub move_counter: u8,
    pub move_countdown: i32,
    pub speed: u8,
    pub speed_count: i32,
    pub next_frame: u8,
    pub frame_count: i32,
    pub frame_speed: u8,

    pub health: i32,
    pub init_health: i32,
    pub hit_strength: u8,
    pub strength: u8,
    pub vulnerable_countdown: i32,
    pub solid: u8,
    pub drop_rating: u8,
    pub flying: bool,

    pub shot_type: u8,
    pub shot_pattern: u8,
    pub shot_actor: u8,
    pub curr_num_shots: u8,
    pub num_shots_allowed: u8,
    pub shot_countdown: i32,
    pub creator: u8,

    // script index fired when Thor touches a Talker
    pub talk_index: i32,

    pub temp1: i32,
    pub temp2: i32,
    pub temp3: i32,
    pub temp4: i32,
    pub temp5: i32,
    pub temp6: i32,
    pub i1: i32,
    pub i2: i32,
    pub i3: i32,
    pub i4: i32,
    pub i5: i32,
    pub i6: i32,

    // double-buffered previous positions, indexed by GameState::pge
    pub last_x: [i32; 2],
    pub last_y: [i32; 2],
}

impl Actor {
    pub fn center_x(&self) -> i32 {
        self.x + self.size_x / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.size_y / 2
    }

    pub fn solid_threshold(&self) -> u8 {
        if self.flying { TILE_FLY } else { TILE_SOLID }
    }

    pub fn is_intangible(&self) -> bool {
        self.solid & SOLID_INTANGIBLE != 0
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct ThorInfo {
    pub jewels: i32,
    pub keys: i32,
    pub magic: i32,
    pub score: i32,
    pub inventory: u16,
    pub selected_item: u8,
}

/// All shared per-session state outside the actor array. Passed explicitly
/// into every movement/validation/script call; there are no globals.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameState {
    pub thor_info: ThorInfo,
    pub flags: u64, // 64 boolean event flags
    pub current_area: u8,

    // directional input sampled by the host, read by movement_zero
    pub key_flag: [bool; 4],

    // transient movement flags
    pub diag: u8, // 1=up-left 2=up-right 3=down-left 4=down-right, 0=none
    pub diag_flag: bool,
    pub slipping: bool,
    pub slip_count: i32,
    pub slip_flag: bool,

    // position-history page flip, toggled by the host once per frame
    pub pge: usize,

    pub boss_active: bool,
    pub boss_num: u8,
    pub boss_dead: u8, // 0 alive, 1 death pending setup, >=2 exploding

    pub shield_on: bool,
    pub thor_dead: bool,

    // side channels consumed by the host after each tick
    pub screen_exit: Option<Dir>,
    pub script_request: Option<i32>,
    pub exec_event: Option<i32>,
}

impl GameState {
    pub fn flag(&self, n: usize) -> bool {
        n < 64 && self.flags & (1 << n) != 0
    }

    pub fn set_flag(&mut self, n: usize, val: bool) {
        if n < 64 {
            if val {
                self.flags |= 1 << n;
            } else {
                self.flags &= !(1 << n);
            }
        }
    }
}

/// Owning context for one loaded screen: the actor slots, the tile grid and
/// the shared game state. Everything in the core takes this by reference.
pub struct World {
    pub actors: Vec<Actor>,
    pub screen: Screen,
    pub game: GameState,
    pub rnd: Rnd,
}

pub fn new_world(seed: u64) -> World {
    World {
        actors: vec![Actor::default(); MAX_ACTORS],
        screen: new_screen(),
        game: GameState::default(),
        rnd: new_rnd(seed),
    }
}

impl World {
    pub fn actor(&self, k: usize) -> &Actor {
        &self.actors[k]
    }

    pub fn mut_actor(&mut self, k: usize) -> &mut Actor {
        &mut self.actors[k]
    }

    pub fn update_actor<F: FnOnce(&mut Actor)>(&mut self, k: usize, f: F) {
        f(&mut self.actors[k])
    }

    pub fn thor(&self) -> &Actor {
        &self.actors[THOR]
    }

    /// Claims the first free general slot (>= FIRST_ENEMY).
    pub fn alloc_actor(&mut self, template: Actor) -> Option<usize> {
        for k in FIRST_ENEMY..MAX_ACTORS {
            if !self.actors[k].active {
                let mut a = template;
                a.active = true;
                a.actor_num = k as u8;
                self.actors[k] = a;
                return Some(k);
            }
        }
        None
    }
}
