//! Level loading from JSON.
//!
//! A level file carries the tile grid, the spawn point, and the player's
//! movement parameters. [`LevelConfig::build`] turns a validated config into
//! a ready-to-tick [`Simulation`] with the player entity spawned.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{Collider, Controllable, Transform, Velocity};
use crate::grid::{Tile, TileMap, WorldGrid};
use crate::math::Vec2;
use crate::sim::{SimConfig, Simulation};
use lodestone_ecs::prelude::Registry;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to parse level json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tile row {row} has {found} columns, expected {expected}")]
    DimensionMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("declared {declared} tile rows, found {found}")]
    RowCountMismatch { declared: usize, found: usize },

    #[error("spawnpoint ({x}, {y}) lies outside the {width}x{height} grid")]
    SpawnOutOfBounds {
        x: f32,
        y: f32,
        width: i32,
        height: i32,
    },

    #[error("entity capacity {0} cannot hold the player")]
    CapacityTooSmall(u32),

    #[error(transparent)]
    Ecs(#[from] lodestone_ecs::EcsError),
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Player movement parameters as stored in the level file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub max_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub radius: f32,
    /// Initial facing angle in radians.
    #[serde(default)]
    pub angle: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_speed: 3.0,
            acceleration: 20.0,
            deceleration: 20.0,
            radius: 0.3,
            angle: 0.0,
        }
    }
}

/// A deserialized level file.
///
/// `tiles` is row-major, `tiles[y][x]`; the value `0` is an empty cell and
/// any other value is a solid cell carrying that texture id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Vec<u16>>,
    pub spawnpoint: [f32; 2],
    #[serde(default)]
    pub player: PlayerConfig,
}

impl LevelConfig {
    /// Parse and validate a level from JSON text.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), LevelError> {
        if self.tiles.len() != self.height as usize {
            return Err(LevelError::RowCountMismatch {
                declared: self.height as usize,
                found: self.tiles.len(),
            });
        }
        for (row, cells) in self.tiles.iter().enumerate() {
            if cells.len() != self.width as usize {
                return Err(LevelError::DimensionMismatch {
                    row,
                    found: cells.len(),
                    expected: self.width as usize,
                });
            }
        }

        let [x, y] = self.spawnpoint;
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return Err(LevelError::SpawnOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Materialize the tile grid.
    pub fn tile_map(&self) -> TileMap {
        let mut tiles = Vec::with_capacity((self.width * self.height) as usize);
        for row in &self.tiles {
            for &cell in row {
                tiles.push(if cell == 0 {
                    Tile::EMPTY
                } else {
                    Tile::textured(cell)
                });
            }
        }
        TileMap::new(self.width, self.height, tiles)
    }

    /// Build a simulation with the player spawned at the spawn point.
    ///
    /// A spawn point inside a solid cell is allowed but logged; the first
    /// tick's collision pass will push the player out.
    pub fn build(&self, capacity: u32, sim_config: SimConfig) -> Result<Simulation<TileMap>, LevelError> {
        if capacity == 0 {
            return Err(LevelError::CapacityTooSmall(capacity));
        }

        let grid = self.tile_map();
        let [sx, sy] = self.spawnpoint;
        if grid.is_solid(sx.floor() as i32, sy.floor() as i32) {
            tracing::warn!(x = sx, y = sy, "spawnpoint lies inside a solid cell");
        }

        let mut registry = Registry::with_capacity(capacity as usize);
        registry.register::<Transform>("transform");
        registry.register::<Velocity>("velocity");
        registry.register::<Collider>("collider");
        registry.register::<Controllable>("controllable");

        let player = registry.spawn()?;
        registry.add(player, Transform::new(Vec2::new(sx, sy), self.player.angle))?;
        registry.add(
            player,
            Velocity::new(
                self.player.max_speed,
                self.player.acceleration,
                self.player.deceleration,
            ),
        )?;
        registry.add(player, Collider::new(self.player.radius))?;
        registry.add(player, Controllable)?;

        Ok(Simulation::new(registry, grid, sim_config))
    }
}
