//! Fixed-timestep simulation driver.
//!
//! [`Simulation`] owns the entity registry, the tile grid, and the physics
//! pipeline, and advances them one fixed step per [`Simulation::tick`].
//! Simulated time is derived from the tick count, so two runs fed the same
//! inputs produce identical state.

use std::time::{Duration, Instant};

use lodestone_ecs::prelude::Registry;

use crate::grid::WorldGrid;
use crate::physics::{InputState, PhysicsSystem};

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Simulation tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Seconds advanced per tick. Must be positive and finite.
    pub fixed_dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
        }
    }
}

impl SimConfig {
    pub fn new(fixed_dt: f32) -> Self {
        assert!(
            fixed_dt.is_finite() && fixed_dt > 0.0,
            "fixed_dt must be positive and finite, got {fixed_dt}"
        );
        Self { fixed_dt }
    }
}

// ---------------------------------------------------------------------------
// TickDiagnostics
// ---------------------------------------------------------------------------

/// Timing diagnostics for the last tick.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Wall-clock time per physics phase, in execution order.
    pub phase_times: Vec<(&'static str, Duration)>,
    /// Total time for the tick.
    pub total_time: Duration,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// A running world: registry, grid, physics, and the tick counter.
pub struct Simulation<G: WorldGrid> {
    registry: Registry,
    grid: G,
    physics: PhysicsSystem,
    config: SimConfig,
    tick_count: u64,
    last_diagnostics: TickDiagnostics,
}

impl<G: WorldGrid> Simulation<G> {
    pub fn new(registry: Registry, grid: G, config: SimConfig) -> Self {
        Self {
            registry,
            grid,
            physics: PhysicsSystem::new(),
            config,
            tick_count: 0,
            last_diagnostics: TickDiagnostics::default(),
        }
    }

    /// Advance one fixed step with the given input, recording phase timings.
    pub fn tick(&mut self, input: &InputState) {
        let tick_start = Instant::now();
        let phase_times =
            self.physics
                .step(&mut self.registry, &self.grid, input, self.config.fixed_dt);
        self.tick_count += 1;
        self.last_diagnostics = TickDiagnostics {
            phase_times,
            total_time: tick_start.elapsed(),
        };
    }

    /// Advance `n` steps, holding the same input throughout.
    pub fn run_ticks(&mut self, n: u64, input: &InputState) {
        for _ in 0..n {
            self.tick(input);
        }
    }

    /// Ticks advanced since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Simulated seconds elapsed: `tick_count * fixed_dt`, computed from the
    /// counter rather than accumulated, so it does not drift.
    pub fn sim_time(&self) -> f64 {
        self.tick_count as f64 * f64::from(self.config.fixed_dt)
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }

    /// Seconds advanced per tick.
    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_dt
    }

    /// Timing recorded by the most recent [`tick`](Self::tick).
    pub fn last_diagnostics(&self) -> &TickDiagnostics {
        &self.last_diagnostics
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }
}
