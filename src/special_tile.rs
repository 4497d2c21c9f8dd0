#[cfg(test)]
#[path = "./special_tile_test.rs"]
mod special_tile_test;

use crate::def::{TILE_SPECIAL, World};
use crate::env::GotEnv;
use crate::movement::actor_destroyed;
use crate::special_movement::SPECIAL_MOVEMENT_FUNC;

// handler slots behind the tile id bands
const TILE_DOOR_KEY: u8 = 201;
const TILE_DOOR_JEWEL: u8 = 202;
const TILE_TELEPORT: u8 = 203;
const TILE_HEAL: u8 = 204;
const TILE_SWITCH: u8 = 205;
const TILE_PIT: u8 = 206;
const TILE_CONVEYOR: u8 = 207;
const TILE_ICE: u8 = 208;
const TILE_SIGN: u8 = 209;
const TILE_TOLL: u8 = 210;

/// Special-tile dispatch for Thor: ids 201..=210 map straight onto the
/// interaction handlers; higher ids are decorative and pass.
pub fn special_tile_thor(
    k: usize,
    col: usize,
    row: usize,
    icn: u8,
    w: &mut World,
    env: &mut dyn GotEnv,
) -> bool {
    if (TILE_DOOR_KEY..=TILE_TOLL).contains(&icn) {
        let f = SPECIAL_MOVEMENT_FUNC[(icn - TILE_SPECIAL) as usize];
        return f(k, col, row, w, env);
    }
    true
}

/// Special-tile dispatch for everything that is not Thor. Enemies cannot
/// operate doors, signs or tolls (those block), pits swallow them, and
/// conveyors push them; the rest of the band is inert ground to them.
pub fn special_tile(
    k: usize,
    col: usize,
    row: usize,
    icn: u8,
    w: &mut World,
    env: &mut dyn GotEnv,
) -> bool {
    match icn {
        TILE_DOOR_KEY | TILE_DOOR_JEWEL | TILE_SIGN | TILE_TOLL => false,
        TILE_PIT => {
            actor_destroyed(k, w, env);
            false
        }
        TILE_CONVEYOR => SPECIAL_MOVEMENT_FUNC[(TILE_CONVEYOR - TILE_SPECIAL) as usize](
            k, col, row, w, env,
        ),
        _ => true,
    }
}
