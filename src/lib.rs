//! A library for driving Spinnaker (GenICam) cameras.
//!
//! This library provides functionality for:
//! - Discovering, initializing and tearing down a camera
//! - Reading and writing any node of the camera's node map by path
//! - Capturing single frames and averaging several frames
//! - Saving captured images as 16-bit TIFF

pub mod camera;
pub mod cli;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod gate;
pub mod logging;
pub mod output;
pub mod registry;

pub use camera::{CameraConfig, SpinCam};
pub use config::Config;
pub use device::{AccessMode, CameraSystem, Device, NodeValue, SimulatedSystem};
pub use dispatch::{Argument, Method, NodePath};
pub use error::{AppError, CameraError, CameraResult, Result};
pub use frame::{AveragedFrame, Frame, Image};
pub use output::save_tiff;
pub use registry::{DeviceRegistry, TeardownReport};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
///
/// Sets up logging and prints the startup banner. Call once, before using
/// anything else from the library.
///
/// # Arguments
///
/// * `verbosity` - 0 for info, 1 for debug, 2 or more for trace
/// * `log_file` - Optional path to a log file. If None, logs will only be output to stdout.
pub fn initialize(verbosity: u8, log_file: Option<&str>) -> anyhow::Result<()> {
    logging::setup_logging(verbosity, log_file)?;
    logging::log_app_start(VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty(), "Version should not be empty");
    }
}
