use anyhow::Result;
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::{debug, info, LevelFilter};
use std::io;

use crate::config::Config;

pub fn setup_logging(verbosity: u8, log_file: Option<&str>) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let level = level_for_verbosity(verbosity);
    let mut base_config = fern::Dispatch::new().level(level);

    // Separate file config so we can include year, month and day in file logs
    let file_config = fern::Dispatch::new().format(|out, message, record| {
        out.finish(format_args!(
            "{}[{}][{}] {}",
            Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
            record.target(),
            record.level(),
            message
        ))
    });

    let stdout_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                Local::now().format("[%H:%M:%S]"),
                record.target(),
                colors.color(record.level()),
                message
            ))
        })
        .chain(io::stdout());

    base_config = base_config.chain(stdout_config);

    if let Some(log_file) = log_file {
        base_config = base_config.chain(file_config.chain(fern::log_file(log_file)?));
    }

    base_config.apply()?;

    info!("Logging system initialized at level {}", level);
    match log_file {
        Some(path) => info!("Also logging to {}", path),
        None => debug!("No log file configured"),
    }

    Ok(())
}

/// 0 is info, 1 is debug, anything higher is trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn log_app_start(version: &str) {
    info!("Starting SpinCam v{}", version);
}

fn or_unset<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "camera default".to_string(), |v| v.to_string())
}

pub fn log_app_config(config: &Config) {
    info!("Application configured with:");
    info!("  Camera:");
    info!("    Serial: {}", config.camera.serial.as_deref().unwrap_or("last enumerated"));
    info!("    Gain: {}", config.camera.gain);
    info!("    Exposure: {}", or_unset(config.camera.exposure));
    info!("    Frame rate: {}", or_unset(config.camera.frame_rate));
    info!("    Gamma: {}", or_unset(config.camera.gamma));
    info!("    Video mode: {}", or_unset(config.camera.video_mode));
    info!("  Acquisition:");
    info!("    Frames to average: {}", config.acquisition.num_to_avg);
    info!("    Settle time: {} ms", config.acquisition.settle_ms);
    info!("    Buffer handling: {}", config.acquisition.buffer_handling);
    info!("    Acquisition mode: {}", config.acquisition.acquisition_mode);
    info!("  Simulation:");
    info!("    Resolution: {}x{}", config.simulation.width, config.simulation.height);
    info!("    Bits per pixel: {}", config.simulation.bits_per_pixel);
    info!("  Output:");
    info!("    Path: {}", config.output.path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Info);
        assert_eq!(level_for_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(2), LevelFilter::Trace);
        assert_eq!(level_for_verbosity(7), LevelFilter::Trace);
    }

    #[test]
    fn test_unset_values_are_described() {
        assert_eq!(or_unset(Some(2.5)), "2.5");
        assert_eq!(or_unset::<f64>(None), "camera default");
    }
}
