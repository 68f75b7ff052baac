//! Read-only tile-grid interface and a concrete row-major tile map.
//!
//! The physics pipeline only ever asks the world two questions: how big is
//! the grid, and is a given cell solid. [`WorldGrid`] captures exactly that,
//! so the simulation core never couples to level-loading or rendering
//! concerns. Callers clip coordinates to `[0, width) x [0, height)` before
//! querying.

use serde::{Deserialize, Serialize};

/// Read-only solidity queries over a bounded tile grid.
pub trait WorldGrid {
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    /// Solidity of the cell at `(x, y)`. Must only be called in range.
    fn is_solid(&self, x: i32, y: i32) -> bool;
}

/// One grid cell. A tile is solid exactly when it carries a texture id.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tile {
    texture: Option<u16>,
}

impl Tile {
    /// An empty, walkable tile.
    pub const EMPTY: Tile = Tile { texture: None };

    pub fn textured(texture: u16) -> Self {
        Self {
            texture: Some(texture),
        }
    }

    pub fn texture_id(&self) -> Option<u16> {
        self.texture
    }

    pub fn is_solid(&self) -> bool {
        self.texture.is_some()
    }
}

/// Row-major grid of tiles backing [`WorldGrid`].
#[derive(Debug, Clone)]
pub struct TileMap {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Build a map from row-major tiles. `tiles.len()` must equal
    /// `width * height`.
    pub fn new(width: i32, height: i32, tiles: Vec<Tile>) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        assert_eq!(
            tiles.len(),
            (width * height) as usize,
            "tile count must match grid dimensions"
        );
        Self {
            width,
            height,
            tiles,
        }
    }

    /// An all-empty map, useful as a starting point and in tests.
    pub fn empty(width: i32, height: i32) -> Self {
        Self::new(width, height, vec![Tile::EMPTY; (width * height) as usize])
    }

    /// The tile at `(x, y)`, or `None` out of range.
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(&self.tiles[(y * self.width + x) as usize])
    }

    /// Replace the tile at `(x, y)`. Panics out of range; the map is only
    /// mutated during level construction, never during simulation.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        assert!(
            x >= 0 && y >= 0 && x < self.width && y < self.height,
            "tile coordinates ({x}, {y}) out of range"
        );
        self.tiles[(y * self.width + x) as usize] = tile;
    }
}

impl WorldGrid for TileMap {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(Tile::is_solid)
    }
}
