#![crate_name = "got"]
#![crate_type = "lib"]

pub mod boss1;
pub mod boss2;
pub mod boss3;
pub mod config;
pub mod def;
pub mod env;
pub mod geom;
pub mod level;
pub mod move_patterns;
pub mod movement;
pub mod script;
pub mod shot_movement;
pub mod special_movement;
pub mod special_tile;
#[cfg(test)]
pub mod test_util;
pub mod util;
