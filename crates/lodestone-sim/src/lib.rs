//! Deterministic tile-grid simulation core.
//!
//! Builds on [`lodestone_ecs`] and adds the pieces a top-down tile world
//! needs: exact 2D narrow-phase geometry, movement components, a tile grid,
//! a four-phase physics tick, and a fixed-timestep driver that loads levels
//! from JSON.
//!
//! ```
//! use lodestone_sim::prelude::*;
//!
//! let level = r#"{
//!     "width": 4, "height": 4,
//!     "tiles": [
//!         [1, 1, 1, 1],
//!         [1, 0, 0, 1],
//!         [1, 0, 0, 1],
//!         [1, 1, 1, 1]
//!     ],
//!     "spawnpoint": [1.5, 1.5]
//! }"#;
//!
//! let mut sim = LevelConfig::from_json(level)
//!     .expect("valid level")
//!     .build(16, SimConfig::default())
//!     .expect("buildable level");
//!
//! let input = InputState { forward: true, ..InputState::IDLE };
//! sim.run_ticks(60, &input);
//! assert_eq!(sim.tick_count(), 60);
//! ```

#![deny(unsafe_code)]

pub mod components;
pub mod grid;
pub mod level;
pub mod math;
pub mod physics;
pub mod sim;

pub mod prelude {
    pub use crate::components::{Collider, Controllable, Transform, Velocity};
    pub use crate::grid::{Tile, TileMap, WorldGrid};
    pub use crate::level::{LevelConfig, LevelError, PlayerConfig};
    pub use crate::math::{Circle, Rect, Vec2};
    pub use crate::physics::{InputState, PhysicsSystem};
    pub use crate::sim::{SimConfig, Simulation, TickDiagnostics};
    pub use lodestone_ecs::prelude::{EcsError, Entity, Registry, SparseSet};
}
