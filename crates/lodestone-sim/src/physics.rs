//! Per-tick physics and grid collision pipeline.
//!
//! One [`PhysicsSystem::step`] runs four phases in a fixed order:
//!
//! 1. **Steering** -- entities tagged [`Controllable`] turn by the input's
//!    turn rate and derive a desired direction from the held movement keys,
//!    relative to their facing angle.
//! 2. **Acceleration** -- every [`Velocity`] accelerates toward its desired
//!    direction or decays toward rest, capped at its `max` speed.
//! 3. **Integration** -- every entity with both [`Transform`] and
//!    [`Velocity`] moves by `current * dt`.
//! 4. **Grid resolution** -- every entity with both [`Transform`] and
//!    [`Collider`] is pushed out of solid cells by the summed per-cell MTVs,
//!    applied once after the full cell scan.
//!
//! The pipeline is synchronous and allocation-light: scratch buffers are
//! reused across ticks. The grid is only ever read, never written.

use std::time::{Duration, Instant};

use lodestone_ecs::prelude::{Entity, Registry};

use crate::components::{Collider, Controllable, Transform, Velocity};
use crate::grid::WorldGrid;
use crate::math::{Circle, Rect, Vec2};

/// Squared-length threshold below which a steering sum counts as zero.
const DIRECTION_EPSILON: f32 = 1e-6;

// ---------------------------------------------------------------------------
// InputState
// ---------------------------------------------------------------------------

/// Discrete input sampled once per tick.
///
/// Movement flags select facing-relative unit directions; `turn` is an
/// angular rate in radians per second applied to the facing angle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn: f32,
}

impl InputState {
    /// No keys held, no turning.
    pub const IDLE: InputState = InputState {
        forward: false,
        back: false,
        strafe_left: false,
        strafe_right: false,
        turn: 0.0,
    };
}

// ---------------------------------------------------------------------------
// PhysicsSystem
// ---------------------------------------------------------------------------

/// Runs the four-phase tick pipeline over a [`Registry`] and a [`WorldGrid`].
///
/// Holds scratch buffers so a steady-state tick does not allocate.
#[derive(Debug, Default)]
pub struct PhysicsSystem {
    /// Desired direction per controllable entity, rebuilt each tick.
    steering: Vec<(Entity, Vec2)>,
    /// Scratch: integration deltas.
    deltas: Vec<(Entity, Vec2)>,
    /// Scratch: collider radii.
    colliders: Vec<(Entity, f32)>,
}

impl PhysicsSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Returns the wall-clock time spent in each phase, in execution order,
    /// for the driver's tick diagnostics.
    pub fn step<G: WorldGrid>(
        &mut self,
        registry: &mut Registry,
        grid: &G,
        input: &InputState,
        dt: f32,
    ) -> Vec<(&'static str, Duration)> {
        let mut phase_times = Vec::with_capacity(4);

        let start = Instant::now();
        self.steer(registry, input, dt);
        phase_times.push(("steer", start.elapsed()));

        let start = Instant::now();
        self.accelerate(registry, dt);
        phase_times.push(("accelerate", start.elapsed()));

        let start = Instant::now();
        self.integrate(registry, dt);
        phase_times.push(("integrate", start.elapsed()));

        let start = Instant::now();
        self.resolve_grid(registry, grid);
        phase_times.push(("resolve_grid", start.elapsed()));

        phase_times
    }

    /// Phase 1: turn controllable entities and record desired directions.
    fn steer(&mut self, registry: &mut Registry, input: &InputState, dt: f32) {
        use std::f32::consts::{FRAC_PI_2, PI};

        self.steering.clear();
        let Some(tags) = registry.store::<Controllable>() else {
            return;
        };
        let tagged: Vec<Entity> = tags.iter().map(|(entity, _)| entity).collect();

        for entity in tagged {
            let Some(transform) = registry.get_mut::<Transform>(entity) else {
                continue;
            };
            transform.angle += input.turn * dt;
            let facing = transform.angle;

            let mut direction = Vec2::ZERO;
            if input.forward {
                direction += Vec2::from_angle(facing);
            }
            if input.back {
                direction += Vec2::from_angle(facing + PI);
            }
            if input.strafe_right {
                direction += Vec2::from_angle(facing + FRAC_PI_2);
            }
            if input.strafe_left {
                direction += Vec2::from_angle(facing - FRAC_PI_2);
            }

            let direction = if direction.length_squared() > DIRECTION_EPSILON {
                direction.normalized()
            } else {
                Vec2::ZERO
            };
            self.steering.push((entity, direction));
        }
    }

    /// Phase 2: accelerate toward the desired direction or decay to rest.
    fn accelerate(&mut self, registry: &mut Registry, dt: f32) {
        let steering = &self.steering;
        let Some(velocities) = registry.store_mut::<Velocity>() else {
            return;
        };

        for (entity, velocity) in velocities.iter_mut() {
            let direction = steering
                .iter()
                .find(|(e, _)| *e == entity)
                .map_or(Vec2::ZERO, |(_, d)| *d);

            if direction == Vec2::ZERO {
                let speed = velocity.current.length() - velocity.deceleration * dt;
                if speed <= 0.0 {
                    // Snap to the exact zero vector; a zero-length direction
                    // must not be renormalized.
                    velocity.current = Vec2::ZERO;
                } else {
                    velocity.current = velocity.current.normalized() * speed;
                }
            } else {
                velocity.current += direction * velocity.acceleration * dt;
                if velocity.current.length() > velocity.max {
                    velocity.current = velocity.current.normalized() * velocity.max;
                }
            }
        }
    }

    /// Phase 3: move every entity with both a transform and a velocity.
    fn integrate(&mut self, registry: &mut Registry, dt: f32) {
        self.deltas.clear();
        if let Some(velocities) = registry.store::<Velocity>() {
            for (entity, velocity) in velocities.iter() {
                self.deltas.push((entity, velocity.current * dt));
            }
        }
        for &(entity, delta) in &self.deltas {
            if let Some(transform) = registry.get_mut::<Transform>(entity) {
                transform.position += delta;
            }
        }
    }

    /// Phase 4: push colliders out of solid grid cells.
    fn resolve_grid<G: WorldGrid>(&mut self, registry: &mut Registry, grid: &G) {
        self.colliders.clear();
        if let Some(colliders) = registry.store::<Collider>() {
            for (entity, collider) in colliders.iter() {
                self.colliders.push((entity, collider.radius));
            }
        }
        for &(entity, radius) in &self.colliders {
            let Some(transform) = registry.get_mut::<Transform>(entity) else {
                continue;
            };
            let circle = Circle {
                pos: transform.position,
                radius,
            };
            transform.position += resolve_against_grid(&circle, grid);
        }
    }
}

/// Accumulated MTV pushing `circle` out of every solid cell it touches.
///
/// The scan covers the integer cell range `[floor(c - r), ceil(c + r))` on
/// both axes, clipped to the grid bounds, and the per-cell resolutions are
/// summed and returned as one push. A circle penetrating several adjacent
/// solid cells at once can therefore overshoot; this is a deliberate
/// single-pass model, not an iterative contact solver.
pub fn resolve_against_grid<G: WorldGrid>(circle: &Circle, grid: &G) -> Vec2 {
    let min_x = ((circle.pos.x - circle.radius).floor() as i32).max(0);
    let max_x = ((circle.pos.x + circle.radius).ceil() as i32).min(grid.width());
    let min_y = ((circle.pos.y - circle.radius).floor() as i32).max(0);
    let max_y = ((circle.pos.y + circle.radius).ceil() as i32).min(grid.height());

    let mut push = Vec2::ZERO;
    for y in min_y..max_y {
        for x in min_x..max_x {
            if grid.is_solid(x, y) {
                push += circle.resolve_rect(&Rect::new(x as f32, y as f32, 1.0, 1.0));
            }
        }
    }
    push
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Tile, TileMap};

    const EPS: f32 = 1e-5;

    fn setup_registry() -> Registry {
        let mut reg = Registry::with_capacity(16);
        reg.register::<Transform>("transform");
        reg.register::<Velocity>("velocity");
        reg.register::<Collider>("collider");
        reg.register::<Controllable>("controllable");
        reg
    }

    fn spawn_player(reg: &mut Registry, position: Vec2) -> Entity {
        let e = reg.spawn().unwrap();
        reg.add(e, Transform::new(position, 0.0)).unwrap();
        reg.add(e, Velocity::new(3.0, 20.0, 20.0)).unwrap();
        reg.add(e, Collider::new(0.3)).unwrap();
        reg.add(e, Controllable).unwrap();
        e
    }

    fn forward() -> InputState {
        InputState {
            forward: true,
            ..InputState::IDLE
        }
    }

    // -- acceleration / deceleration ------------------------------------------

    #[test]
    fn one_forward_tick_from_rest() {
        // max 3, accel 20, dt 0.1, facing +x: current ends at (2, 0).
        let mut reg = setup_registry();
        let grid = TileMap::empty(8, 8);
        let e = spawn_player(&mut reg, Vec2::new(4.0, 4.0));

        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &forward(), 0.1);

        let vel = reg.get::<Velocity>(e).unwrap();
        assert!((vel.current.x - 2.0).abs() < EPS);
        assert!(vel.current.y.abs() < EPS);
    }

    #[test]
    fn speed_clamps_at_max() {
        let mut reg = setup_registry();
        let grid = TileMap::empty(64, 64);
        let e = spawn_player(&mut reg, Vec2::new(4.0, 4.0));

        let mut physics = PhysicsSystem::new();
        for _ in 0..50 {
            physics.step(&mut reg, &grid, &forward(), 0.1);
        }

        let vel = reg.get::<Velocity>(e).unwrap();
        assert!(vel.current.length() <= 3.0 + EPS);
        assert!((vel.current.length() - 3.0).abs() < EPS);
    }

    #[test]
    fn deceleration_reaches_exact_zero_and_stays() {
        // From (2, 0) with decel 20 and dt 0.1, one idle tick removes the
        // whole 2.0 of speed; the vector snaps to exactly zero and holds.
        let mut reg = setup_registry();
        let grid = TileMap::empty(8, 8);
        let e = spawn_player(&mut reg, Vec2::new(4.0, 4.0));

        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &forward(), 0.1);
        assert!((reg.get::<Velocity>(e).unwrap().current.x - 2.0).abs() < EPS);

        physics.step(&mut reg, &grid, &InputState::IDLE, 0.1);
        assert_eq!(reg.get::<Velocity>(e).unwrap().current, Vec2::ZERO);

        physics.step(&mut reg, &grid, &InputState::IDLE, 0.1);
        assert_eq!(reg.get::<Velocity>(e).unwrap().current, Vec2::ZERO);
    }

    #[test]
    fn deceleration_never_reverses_direction() {
        let mut reg = setup_registry();
        let grid = TileMap::empty(32, 32);
        let e = spawn_player(&mut reg, Vec2::new(16.0, 16.0));
        reg.get_mut::<Velocity>(e).unwrap().current = Vec2::new(2.5, 1.1);

        let mut physics = PhysicsSystem::new();
        let mut previous = reg.get::<Velocity>(e).unwrap().current.length();
        for _ in 0..20 {
            physics.step(&mut reg, &grid, &InputState::IDLE, 0.01);
            let current = reg.get::<Velocity>(e).unwrap().current;
            let speed = current.length();
            assert!(speed <= previous + EPS, "speed increased while coasting");
            if current != Vec2::ZERO {
                // Direction is preserved while any speed remains.
                assert!(current.x > 0.0 && current.y > 0.0);
            }
            previous = speed;
        }
        assert_eq!(reg.get::<Velocity>(e).unwrap().current, Vec2::ZERO);
    }

    // -- steering ----------------------------------------------------------------

    #[test]
    fn opposing_keys_cancel_to_no_direction() {
        let mut reg = setup_registry();
        let grid = TileMap::empty(8, 8);
        let e = spawn_player(&mut reg, Vec2::new(4.0, 4.0));

        let input = InputState {
            forward: true,
            back: true,
            ..InputState::IDLE
        };
        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &input, 0.1);

        // Cancelled keys decelerate like no input at all.
        assert_eq!(reg.get::<Velocity>(e).unwrap().current, Vec2::ZERO);
    }

    #[test]
    fn diagonal_keys_normalize() {
        let mut reg = setup_registry();
        let grid = TileMap::empty(64, 64);
        let e = spawn_player(&mut reg, Vec2::new(32.0, 32.0));

        let input = InputState {
            forward: true,
            strafe_right: true,
            ..InputState::IDLE
        };
        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &input, 0.1);

        // Facing +x, forward + strafe-right sums to (1, 1) before
        // normalization, so the gained speed is still accel * dt.
        let vel = reg.get::<Velocity>(e).unwrap();
        assert!((vel.current.length() - 2.0).abs() < 1e-4);
        assert!((vel.current.x - vel.current.y).abs() < 1e-4);
    }

    #[test]
    fn turn_advances_angle_independently_of_movement() {
        let mut reg = setup_registry();
        let grid = TileMap::empty(8, 8);
        let e = spawn_player(&mut reg, Vec2::new(4.0, 4.0));

        let input = InputState {
            turn: 1.5,
            ..InputState::IDLE
        };
        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &input, 0.1);

        let transform = reg.get::<Transform>(e).unwrap();
        assert!((transform.angle - 0.15).abs() < EPS);
        assert_eq!(transform.position, Vec2::new(4.0, 4.0));
    }

    #[test]
    fn uncontrolled_entities_only_decelerate() {
        let mut reg = setup_registry();
        let grid = TileMap::empty(8, 8);
        let e = reg.spawn().unwrap();
        reg.add(e, Transform::new(Vec2::new(4.0, 4.0), 0.0)).unwrap();
        reg.add(e, Velocity::new(3.0, 20.0, 20.0)).unwrap();
        reg.get_mut::<Velocity>(e).unwrap().current = Vec2::new(1.0, 0.0);

        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &forward(), 0.01);

        // No Controllable tag: input does not reach this entity.
        let vel = reg.get::<Velocity>(e).unwrap();
        assert!((vel.current.x - 0.8).abs() < EPS);
    }

    // -- integration --------------------------------------------------------------

    #[test]
    fn integration_moves_by_velocity_times_dt() {
        let mut reg = setup_registry();
        let grid = TileMap::empty(16, 16);
        let e = reg.spawn().unwrap();
        reg.add(e, Transform::new(Vec2::new(4.0, 4.0), 0.0)).unwrap();
        let mut vel = Velocity::new(10.0, 0.0, 0.0);
        vel.current = Vec2::new(1.0, -2.0);
        reg.add(e, vel).unwrap();

        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &InputState::IDLE, 0.5);

        // decel 0 keeps current unchanged; position moves by current * dt.
        let pos = reg.get::<Transform>(e).unwrap().position;
        assert!((pos.x - 4.5).abs() < EPS);
        assert!((pos.y - 3.0).abs() < EPS);
    }

    // -- grid resolution ------------------------------------------------------------

    #[test]
    fn single_solid_cell_pushes_collider_out() {
        // Collider radius 0.3 centered at (2.1, 2.1) on solid tile (2, 2):
        // the degenerate single-axis branch pushes by (0, -0.2), moving the
        // center out of the cell's interior.
        let mut grid = TileMap::empty(8, 8);
        grid.set_tile(2, 2, Tile::textured(1));

        let circle = Circle::new(2.1, 2.1, 0.3);
        let push = resolve_against_grid(&circle, &grid);
        assert!((push.x - 0.0).abs() < EPS);
        assert!((push.y + 0.2).abs() < EPS);

        let moved = Vec2::new(2.1, 1.9);
        assert!(moved.y < 2.0, "center must leave the solid cell");
    }

    #[test]
    fn resolution_applies_push_to_transform() {
        let mut reg = setup_registry();
        let mut grid = TileMap::empty(8, 8);
        grid.set_tile(2, 2, Tile::textured(1));
        let e = reg.spawn().unwrap();
        reg.add(e, Transform::new(Vec2::new(2.1, 2.1), 0.0)).unwrap();
        reg.add(e, Collider::new(0.3)).unwrap();

        let mut physics = PhysicsSystem::new();
        physics.step(&mut reg, &grid, &InputState::IDLE, 0.1);

        let pos = reg.get::<Transform>(e).unwrap().position;
        assert!((pos.x - 2.1).abs() < EPS);
        assert!((pos.y - 1.9).abs() < EPS);
    }

    #[test]
    fn overlap_from_outside_resolves_to_touching() {
        // Approaching a solid cell from the left with a clear closest-point
        // normal: after one pass the circle exactly touches the cell.
        let mut grid = TileMap::empty(8, 8);
        grid.set_tile(4, 4, Tile::textured(1));

        let circle = Circle::new(3.8, 4.5, 0.3);
        let push = resolve_against_grid(&circle, &grid);
        let moved = Circle::new(circle.pos.x + push.x, circle.pos.y + push.y, circle.radius);
        let closest = Vec2::new(4.0, 4.5);
        assert!(((moved.pos - closest).length() - 0.3).abs() < EPS);
    }

    #[test]
    fn adjacent_cells_accumulate_pushes() {
        // Two solid cells stacked vertically; a circle straddling the seam
        // to their left receives the sum of both per-cell pushes.
        let mut grid = TileMap::empty(8, 8);
        grid.set_tile(4, 3, Tile::textured(1));
        grid.set_tile(4, 4, Tile::textured(1));

        let circle = Circle::new(3.9, 4.0, 0.3);
        let push = resolve_against_grid(&circle, &grid);

        let single = Circle::new(3.9, 4.0, 0.3)
            .resolve_rect(&Rect::new(4.0, 3.0, 1.0, 1.0));
        // Symmetric contacts: the y parts cancel, the x parts add up.
        assert!((push.y).abs() < EPS);
        assert!((push.x - 2.0 * single.x).abs() < EPS);
    }

    #[test]
    fn scan_range_clips_to_grid_bounds() {
        // A circle hanging over the map corner must not query out of range.
        let mut grid = TileMap::empty(4, 4);
        grid.set_tile(0, 0, Tile::textured(1));

        let circle = Circle::new(0.1, 0.1, 0.5);
        let push = resolve_against_grid(&circle, &grid);
        assert!(push != Vec2::ZERO);
    }

    #[test]
    fn empty_grid_leaves_position_unchanged() {
        let grid = TileMap::empty(8, 8);
        let circle = Circle::new(4.0, 4.0, 0.4);
        assert_eq!(resolve_against_grid(&circle, &grid), Vec2::ZERO);
    }

    // -- full pipeline ---------------------------------------------------------------

    #[test]
    fn driving_into_wall_keeps_entity_outside() {
        // A wall column at x = 5; an entity accelerating straight at it ends
        // each tick outside the solid cells.
        let mut grid = TileMap::empty(10, 10);
        for y in 0..10 {
            grid.set_tile(5, y, Tile::textured(1));
        }

        let mut reg = setup_registry();
        let e = spawn_player(&mut reg, Vec2::new(3.0, 4.5));

        let mut physics = PhysicsSystem::new();
        for _ in 0..120 {
            physics.step(&mut reg, &grid, &forward(), 1.0 / 60.0);
            let pos = reg.get::<Transform>(e).unwrap().position;
            assert!(
                pos.x <= 5.0 - 0.3 + 1e-3,
                "collider penetrated the wall at x = {}",
                pos.x
            );
        }
    }
}
