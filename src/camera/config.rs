use serde::Deserialize;

use super::controls::VideoMode;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Serial number to select; the last enumerated camera when unset.
    pub serial: Option<String>,
    pub gain: f64,
    pub exposure: Option<f64>,
    pub frame_rate: Option<f64>,
    pub gamma: Option<f64>,
    pub video_mode: Option<VideoMode>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            serial: None,
            gain: 0.0,
            exposure: None,
            frame_rate: None,
            gamma: None,
            video_mode: None,
        }
    }
}

impl CameraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = Some(serial.into());
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_exposure(mut self, exposure: f64) -> Self {
        self.exposure = Some(exposure);
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn with_video_mode(mut self, mode: VideoMode) -> Self {
        self.video_mode = Some(mode);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.gain < 0.0 {
            return Err("Gain must not be negative".to_string());
        }
        if matches!(self.exposure, Some(exposure) if exposure <= 0.0) {
            return Err("Exposure must be greater than 0".to_string());
        }
        if matches!(self.frame_rate, Some(fps) if fps <= 0.0) {
            return Err("Frame rate must be greater than 0".to_string());
        }
        if matches!(self.gamma, Some(gamma) if gamma <= 0.0) {
            return Err("Gamma must be greater than 0".to_string());
        }
        if matches!(&self.serial, Some(serial) if serial.trim().is_empty()) {
            return Err("Serial must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CameraConfig::default();
        assert_eq!(config.serial, None);
        assert_eq!(config.gain, 0.0);
        assert_eq!(config.exposure, None);
        assert_eq!(config.frame_rate, None);
        assert_eq!(config.gamma, None);
        assert_eq!(config.video_mode, None);
    }

    #[test]
    fn test_config_builder() {
        let config = CameraConfig::new()
            .with_serial("19130526")
            .with_gain(6.0)
            .with_exposure(1000.0)
            .with_frame_rate(60.0)
            .with_gamma(1.0)
            .with_video_mode(VideoMode::Mode7);

        assert_eq!(config.serial.as_deref(), Some("19130526"));
        assert_eq!(config.gain, 6.0);
        assert_eq!(config.exposure, Some(1000.0));
        assert_eq!(config.frame_rate, Some(60.0));
        assert_eq!(config.gamma, Some(1.0));
        assert_eq!(config.video_mode, Some(VideoMode::Mode7));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = CameraConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_config() {
        let mut config = CameraConfig::default();
        config.gain = -1.0;
        assert!(config.validate().is_err());

        config.gain = 0.0;
        config.exposure = Some(0.0);
        assert!(config.validate().is_err());

        config.exposure = None;
        config.frame_rate = Some(-5.0);
        assert!(config.validate().is_err());

        config.frame_rate = None;
        config.serial = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_table() {
        let config: CameraConfig = toml::from_str("gain = 3.5\nvideo_mode = \"Mode7\"").unwrap();
        assert_eq!(config.gain, 3.5);
        assert_eq!(config.video_mode, Some(VideoMode::Mode7));
        assert_eq!(config.exposure, None);
    }
}
