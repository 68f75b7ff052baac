//! Simulation component types.
//!
//! Components are plain data attached independently per entity through the
//! [`Registry`](lodestone_ecs::registry::Registry); behavior lives in the
//! physics pipeline, not here.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Position and facing angle (radians) of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub angle: f32,
    pub position: Vec2,
}

impl Transform {
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { angle, position }
    }
}

/// Current velocity plus the parameters that shape it each tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Speed cap; `current` never exceeds this magnitude.
    pub max: f32,
    /// Speed gained per second while steering.
    pub acceleration: f32,
    /// Speed lost per second while coasting.
    pub deceleration: f32,
    pub current: Vec2,
}

impl Velocity {
    /// A velocity at rest with the given parameters.
    pub fn new(max: f32, acceleration: f32, deceleration: f32) -> Self {
        Self {
            max,
            acceleration,
            deceleration,
            current: Vec2::ZERO,
        }
    }
}

/// Bounding-circle radius used for grid collision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
}

impl Collider {
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

/// Tag marking an entity as driven by player input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Controllable;
