//! Headless demo: load a small level, drive the player around for a few
//! seconds of simulated time, and log where it ends up.
//!
//! Run with `RUST_LOG=debug` for per-tick detail.

use anyhow::{Context, Result};
use lodestone_sim::prelude::*;

const LEVEL: &str = r#"{
    "width": 10,
    "height": 8,
    "tiles": [
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 2, 2, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 2, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 2, 0, 0, 0, 0, 0, 1],
        [1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
        [1, 1, 1, 1, 1, 1, 1, 1, 1, 1]
    ],
    "spawnpoint": [1.5, 1.5]
}"#;

/// A stretch of held input, in ticks.
struct Segment {
    ticks: u64,
    input: InputState,
    label: &'static str,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut sim = LevelConfig::from_json(LEVEL)
        .context("parsing embedded level")?
        .build(64, SimConfig::default())
        .context("building simulation")?;

    let script = [
        Segment {
            ticks: 90,
            input: InputState {
                forward: true,
                ..InputState::IDLE
            },
            label: "drive east into the far wall",
        },
        Segment {
            ticks: 60,
            input: InputState {
                forward: true,
                turn: 1.6,
                ..InputState::IDLE
            },
            label: "arc toward the pillars",
        },
        Segment {
            ticks: 45,
            input: InputState {
                strafe_left: true,
                ..InputState::IDLE
            },
            label: "strafe along the boundary",
        },
        Segment {
            ticks: 30,
            input: InputState::IDLE,
            label: "coast to a stop",
        },
    ];

    for segment in &script {
        sim.run_ticks(segment.ticks, &segment.input);
        report(&sim, segment.label);
    }

    tracing::info!(
        ticks = sim.tick_count(),
        sim_time = sim.sim_time(),
        "run complete"
    );
    Ok(())
}

fn report(sim: &Simulation<TileMap>, label: &str) {
    let Some(transforms) = sim.registry().store::<Transform>() else {
        return;
    };
    for (entity, transform) in transforms.iter() {
        let velocity = sim
            .registry()
            .get::<Velocity>(entity)
            .map_or(0.0, |v| v.current.length());
        tracing::info!(
            %entity,
            x = transform.position.x,
            y = transform.position.y,
            angle = transform.angle,
            speed = velocity,
            "{label}"
        );
    }
}
