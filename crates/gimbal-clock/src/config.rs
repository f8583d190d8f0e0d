//! Command line and application configuration.

use std::path::PathBuf;

use clap::Parser;

/// Default location of the equirectangular environment map.
pub const DEFAULT_ENVMAP: &str = "assets/envmap.hdr";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "gimbal-clock", version, about)]
pub struct Cli {
    /// Equirectangular Radiance (.hdr) environment map.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_ENVMAP)]
    pub envmap: PathBuf,

    /// Initial window width in logical pixels.
    #[arg(long, value_name = "W", default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial window height in logical pixels.
    #[arg(long, value_name = "H", default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Log filter in env_logger syntax; overrides RUST_LOG.
    #[arg(long = "log", value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Present frames immediately instead of waiting for vertical blank.
    #[arg(long)]
    pub no_vsync: bool,

    /// Linear exposure applied before tone mapping.
    #[arg(long, value_name = "EV", default_value_t = 1.0, value_parser = parse_exposure)]
    pub exposure: f32,
}

fn parse_exposure(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("exposure must be a positive number, got {s}"))
    }
}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub envmap_path: PathBuf,
    pub log_filter: Option<String>,
    pub vsync: bool,
    pub exposure: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            title: "Gimbal Clock".to_string(),
            width: 1280,
            height: 720,
            envmap_path: PathBuf::from(DEFAULT_ENVMAP),
            log_filter: None,
            vsync: true,
            exposure: 1.0,
        }
    }
}

impl From<Cli> for ClockConfig {
    fn from(cli: Cli) -> Self {
        Self {
            width: cli.width,
            height: cli.height,
            envmap_path: cli.envmap,
            log_filter: cli.log_filter,
            vsync: !cli.no_vsync,
            exposure: cli.exposure,
            ..Self::default()
        }
    }
}

impl ClockConfig {
    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ClockConfig, clap::Error> {
        let argv = std::iter::once("gimbal-clock").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(ClockConfig::from)
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(parse(&[]).unwrap(), ClockConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = parse(&[
            "--envmap",
            "/tmp/studio.hdr",
            "--width",
            "800",
            "--height",
            "600",
            "--log",
            "debug",
            "--no-vsync",
            "--exposure",
            "1.5",
        ])
        .unwrap();

        assert_eq!(cfg.envmap_path, PathBuf::from("/tmp/studio.hdr"));
        assert_eq!((cfg.width, cfg.height), (800, 600));
        assert_eq!(cfg.log_filter.as_deref(), Some("debug"));
        assert!(!cfg.vsync);
        assert_eq!(cfg.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert_eq!(cfg.exposure, 1.5);
    }

    #[test]
    fn non_positive_exposure_is_rejected() {
        assert!(parse(&["--exposure", "0"]).is_err());
        assert!(parse(&["--exposure", "-1"]).is_err());
        assert!(parse(&["--exposure", "bright"]).is_err());
    }

    #[test]
    fn zero_sized_window_is_rejected() {
        assert!(parse(&["--width", "0"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
