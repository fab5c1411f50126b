//! Headless runner.
//!
//! ```bash
//! barrier-sim [config.json] [frames] [technique]
//! RUST_LOG=barrier_sim=trace barrier-sim demo.json 600 purple
//! ```
//!
//! Runs the simulation at a fixed 60 Hz without a window and logs a
//! population summary once per simulated second. A technique name given on
//! the command line overrides the one in the config file.

use barrier_sim::prelude::*;
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u64 = 600;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("barrier-sim v{}", env!("CARGO_PKG_VERSION"));

    let args: Vec<String> = env::args().collect();
    let mut config = match args.get(1).map(PathBuf::from) {
        Some(path) => match SimConfig::load(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to load config from {:?}: {}", path, e);
                warn!("Using default configuration.");
                SimConfig::default()
            }
        },
        None => {
            info!("No config file specified, using defaults.");
            SimConfig::default()
        }
    };
    let frames = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    if let Some(name) = args.get(3) {
        match Technique::from_name(name) {
            Some(technique) => config.technique = technique,
            None => warn!(
                "Unknown technique {:?}, expected one of {:?}",
                name,
                Technique::variants()
            ),
        }
    }

    info!(
        technique = %config.technique,
        description = config.technique.description(),
        theme = config.theme.name(),
        spawn_rate = config.spawn_rate,
        min_speed = config.min_speed,
        max_speed = config.max_speed,
        frames,
        "starting"
    );

    let mut sim = Simulation::new()
        .with_config(config)
        .with_clock(ManualClock::new());
    sim.time_mut().set_fixed_delta(Some(FRAME_DT));

    let mut peak = 0;
    for n in 1..=frames {
        sim.time_mut().clock_mut().advance(FRAME_DT);
        let frame = sim.frame();
        peak = peak.max(frame.population.active);

        if n % 60 == 0 {
            info!(
                second = n / 60,
                active = frame.population.active,
                trapped = frame.population.trapped,
                "population"
            );
        }
    }

    info!(
        frames,
        peak,
        remaining = sim.pool().len(),
        "done"
    );
}
