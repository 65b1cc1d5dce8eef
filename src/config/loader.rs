use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::camera::{AcquisitionMode, CameraConfig, StreamBufferHandlingMode};
use crate::cli::CliArgs;
use crate::device::SimulationConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub acquisition: AcquisitionConfig,
    pub output: OutputConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcquisitionConfig {
    pub num_to_avg: usize,
    /// Delay between starting the stream and the first capture.
    pub settle_ms: u64,
    pub buffer_handling: StreamBufferHandlingMode,
    pub acquisition_mode: AcquisitionMode,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            num_to_avg: 10,
            settle_ms: 100,
            buffer_handling: StreamBufferHandlingMode::NewestOnly,
            acquisition_mode: AcquisitionMode::Continuous,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "image_name.tiff".to_string(),
        }
    }
}

impl Config {
    pub fn load(cli_args: &CliArgs) -> Result<Self> {
        let mut config = match cli_args.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            None => {
                warn!("No config file at {}, using built-in defaults", DEFAULT_CONFIG_PATH);
                Config::default()
            }
        };

        config.override_with_cli_args(cli_args);
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        info!("Loading configuration from {}", path);

        let config_str =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path))?;

        toml::from_str(&config_str).with_context(|| format!("Failed to parse config file: {}", path))
    }

    fn override_with_cli_args(&mut self, args: &CliArgs) {
        if let Some(serial) = &args.serial {
            self.camera.serial = Some(serial.clone());
        }
        if let Some(gain) = args.gain {
            self.camera.gain = gain;
        }
        if let Some(exposure) = args.exposure {
            self.camera.exposure = Some(exposure);
        }
        if let Some(frame_rate) = args.frame_rate {
            self.camera.frame_rate = Some(frame_rate);
        }
        if let Some(gamma) = args.gamma {
            self.camera.gamma = Some(gamma);
        }

        if let Some(num_to_avg) = args.num_to_avg {
            self.acquisition.num_to_avg = num_to_avg;
        }

        if let Some(output) = &args.output {
            self.output.path = output.clone();
        }

        if let Some(width) = args.width {
            self.simulation.width = width;
        }
        if let Some(height) = args.height {
            self.simulation.height = height;
        }
    }

    fn validate(&self) -> Result<()> {
        self.camera
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid camera configuration")?;

        if self.acquisition.num_to_avg == 0 {
            return Err(anyhow::anyhow!("Number of frames to average must be positive"));
        }

        if self.simulation.width == 0 || self.simulation.height == 0 {
            return Err(anyhow::anyhow!("Simulated sensor dimensions must be positive"));
        }
        if !matches!(self.simulation.bits_per_pixel, 8 | 16) {
            return Err(anyhow::anyhow!(
                "Bits per pixel must be 8 or 16, got {}",
                self.simulation.bits_per_pixel
            ));
        }

        if self.output.path.is_empty() {
            return Err(anyhow::anyhow!("Output path cannot be empty"));
        }

        // Ensure the output's folder exists
        if let Some(folder) = Path::new(&self.output.path).parent() {
            if !folder.as_os_str().is_empty() && !folder.exists() {
                warn!("Output folder does not exist. Creating it.");
                fs::create_dir_all(folder)
                    .with_context(|| format!("Failed to create output folder: {}", folder.display()))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::VideoMode;
    use tempfile::tempdir;

    fn args_with_config(path: &Path) -> CliArgs {
        CliArgs {
            config: Some(path.to_string_lossy().into_owned()),
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.acquisition.num_to_avg, 10);
        assert_eq!(config.acquisition.settle_ms, 100);
        assert_eq!(config.acquisition.buffer_handling, StreamBufferHandlingMode::NewestOnly);
        assert_eq!(config.output.path, "image_name.tiff");
        assert_eq!(config.camera.gain, 0.0);
    }

    #[test]
    fn test_load_file_and_create_output_folder() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("captures").join("avg.tiff");
        let path = dir.path().join("spincam.toml");
        fs::write(
            &path,
            format!(
                "[camera]\ngain = 1.5\nvideo_mode = \"Mode7\"\n\n\
                 [acquisition]\nnum_to_avg = 4\n\n\
                 [output]\npath = \"{}\"\n\n\
                 [simulation]\nwidth = 32\nheight = 16\n",
                output.display()
            ),
        )
        .unwrap();

        let config = Config::load(&args_with_config(&path)).unwrap();

        assert_eq!(config.camera.gain, 1.5);
        assert_eq!(config.camera.video_mode, Some(VideoMode::Mode7));
        assert_eq!(config.acquisition.num_to_avg, 4);
        assert_eq!(config.acquisition.settle_ms, 100);
        assert_eq!((config.simulation.width, config.simulation.height), (32, 16));
        assert!(dir.path().join("captures").is_dir());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spincam.toml");
        fs::write(&path, "[camera]\ngain = 1.5\n").unwrap();

        let args = CliArgs {
            gain: Some(3.0),
            serial: Some("19130526".to_string()),
            num_to_avg: Some(2),
            output: Some(dir.path().join("out.tiff").to_string_lossy().into_owned()),
            ..args_with_config(&path)
        };
        let config = Config::load(&args).unwrap();

        assert_eq!(config.camera.gain, 3.0);
        assert_eq!(config.camera.serial.as_deref(), Some("19130526"));
        assert_eq!(config.acquisition.num_to_avg, 2);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = tempdir().unwrap();
        let args = args_with_config(&dir.path().join("absent.toml"));
        assert!(Config::load(&args).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spincam.toml");

        fs::write(&path, "[acquisition]\nnum_to_avg = 0\n").unwrap();
        assert!(Config::load(&args_with_config(&path)).is_err());

        fs::write(&path, "[simulation]\nbits_per_pixel = 12\n").unwrap();
        assert!(Config::load(&args_with_config(&path)).is_err());

        fs::write(&path, "[camera]\ngain = -2.0\n").unwrap();
        assert!(Config::load(&args_with_config(&path)).is_err());
    }

    #[test]
    fn test_unknown_enum_symbol_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spincam.toml");
        fs::write(&path, "[acquisition]\nbuffer_handling = \"Newest\"\n").unwrap();
        assert!(Config::load(&args_with_config(&path)).is_err());
    }
}
