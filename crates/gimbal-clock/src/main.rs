//! Gimbal clock: an analog clock of metallic rings that lean toward the mouse.

mod assembly;
mod config;
mod dial;
mod pointer;
mod rings;
mod session;
mod updater;

use anyhow::{Context, Result};
use clap::Parser;
use winit::dpi::LogicalSize;

use gimbal_engine::coords::Viewport;
use gimbal_engine::device::GpuInit;
use gimbal_engine::environment::EnvironmentMap;
use gimbal_engine::logging::{init_logging, LoggingConfig};
use gimbal_engine::window::{Runtime, RuntimeConfig};

use crate::config::{Cli, ClockConfig};
use crate::session::ClockSession;

fn main() -> Result<()> {
    let config = ClockConfig::from(Cli::parse());

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });

    // Decoded before the window exists so no frame renders without lighting.
    let environment = EnvironmentMap::load(&config.envmap_path).with_context(|| {
        format!("failed to load environment map {}", config.envmap_path.display())
    })?;

    let viewport = Viewport::new(config.width as f32, config.height as f32);
    let session = ClockSession::new(environment, viewport, config.exposure);

    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(config.width as f64, config.height as f64),
    };
    let gpu = GpuInit {
        present_mode: config.present_mode(),
        ..GpuInit::default()
    };

    log::info!("starting {}x{} window", config.width, config.height);
    Runtime::run(runtime, gpu, session)
}
