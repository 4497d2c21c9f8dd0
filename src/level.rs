#[cfg(test)]
#[path = "./level_test.rs"]
mod level_test;

use serde::{Deserialize, Serialize};

use crate::def::{TILES_HIGH, TILES_WIDE, TILE_SOLID};

/// One loaded screen: the 20x12 tile grid plus the parallel pickup maps.
/// icon is indexed [row][col]; the object maps are flat row-major cells.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Screen {
    pub icon: Vec<Vec<u8>>,
    pub object_map: Vec<u8>,
    pub object_index: Vec<u8>,
}

pub fn new_screen() -> Screen {
    Screen {
        // TILE_SOLID is the first plain walkable id
        icon: vec![vec![TILE_SOLID; TILES_WIDE]; TILES_HIGH],
        object_map: vec![0; TILES_WIDE * TILES_HIGH],
        object_index: vec![0; TILES_WIDE * TILES_HIGH],
    }
}

impl Screen {
    pub fn tile(&self, col: usize, row: usize) -> u8 {
        self.icon[row][col]
    }

    pub fn set_tile(&mut self, col: usize, row: usize, id: u8) {
        self.icon[row][col] = id;
    }

    /// Rewrites a tile and clears any object placed on that cell.
    pub fn place_tile(&mut self, col: usize, row: usize, id: u8) {
        self.icon[row][col] = id;
        let cell = row * TILES_WIDE + col;
        self.object_map[cell] = 0;
        self.object_index[cell] = 0;
    }

    /// Tile id under a pixel coordinate. Out-of-range coordinates read as
    /// tile 0 (always blocking).
    pub fn bgtile(&self, x: i32, y: i32) -> u8 {
        if x < 0 || x >= 319 || y < 0 || y >= 191 {
            return 0;
        }
        let col = ((x + 1) >> 4) as usize;
        let row = ((y + 1) >> 4) as usize;
        self.icon[row][col]
    }

    pub fn cell_of(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= 319 || y < 0 || y >= 191 {
            return None;
        }
        let col = ((x + 1) >> 4) as usize;
        let row = ((y + 1) >> 4) as usize;
        Some(row * TILES_WIDE + col)
    }

    /// Drops an object on the cell under (x, y) if the cell is free and the
    /// ground there is plain walkable.
    pub fn drop_object_at(&mut self, x: i32, y: i32, object: u8) -> bool {
        if let Some(cell) = Screen::cell_of(x, y) {
            let (row, col) = (cell / TILES_WIDE, cell % TILES_WIDE);
            if self.object_map[cell] == 0 && self.icon[row][col] >= TILE_SOLID {
                self.object_map[cell] = object;
                return true;
            }
        }
        false
    }
}
