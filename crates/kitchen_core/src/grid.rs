use serde::{Deserialize, Serialize};

use crate::types::{Position, Tile};

/// Static tile layout. Immutable once the map is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a grid from row-major tiles. Panics if the tile count does not
    /// match `width * height`; that is a map-authoring error.
    pub fn new(width: i32, height: i32, tiles: Vec<Tile>) -> Self {
        assert!(
            tiles.len() == (width as usize) * (height as usize),
            "grid tile count {} does not match {width}x{height}",
            tiles.len(),
        );
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }

    pub fn tile(&self, position: Position) -> Option<Tile> {
        if !self.in_bounds(position) {
            return None;
        }
        let index = (position.y as usize) * (self.width as usize) + (position.x as usize);
        Some(self.tiles[index])
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_walkable)
    }
}
