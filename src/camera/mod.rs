//! Camera lifecycle and capture entry points.

pub mod config;
pub mod controls;

use log::{info, warn};

use crate::device::{AccessMode, CameraSystem, NodeValue};
use crate::dispatch::{self, Argument, Method};
use crate::error::{CameraError, CameraResult};
use crate::frame::{self, AveragedFrame, Frame};
use crate::gate;
use crate::registry::{DeviceRegistry, TeardownReport};

pub use config::CameraConfig;
pub use controls::{
    AcquisitionFrameRateAuto, AcquisitionMode, Control, EnumControl, ExposureAuto, GainAuto,
    PixelFormat, StreamBufferHandlingMode, VideoMode,
};

/// Drives one camera at a time from a [`CameraSystem`].
///
/// Dropping it stops and de-initializes the live camera, then warns if the
/// system still reports itself in use.
pub struct SpinCam<S: CameraSystem> {
    system: S,
    registry: DeviceRegistry,
}

impl<S: CameraSystem> SpinCam<S> {
    pub fn new(system: S) -> Self {
        Self {
            system,
            registry: DeviceRegistry::new(),
        }
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn list_cameras(&mut self) -> CameraResult<Vec<String>> {
        let cameras = self.system.cameras()?;
        Ok(cameras.iter().map(|camera| camera.serial()).collect())
    }

    /// Selects the camera with `serial`, or the last enumerated camera when
    /// no serial is given. The previous camera is only torn down once a
    /// replacement was found.
    pub fn find_cam(&mut self, serial: Option<&str>) -> CameraResult<()> {
        let mut cameras = self.system.cameras()?;
        let camera = match serial {
            Some(serial) => {
                let index = cameras
                    .iter()
                    .position(|camera| camera.serial() == serial)
                    .ok_or_else(|| {
                        CameraError::not_found(format!("Could not find camera with serial: \"{}\"", serial))
                    })?;
                cameras.swap_remove(index)
            }
            None => cameras
                .pop()
                .ok_or_else(|| CameraError::not_found("no cameras connected"))?,
        };

        let found = camera.serial();
        self.registry.register(camera);
        info!("Found camera {}", found);
        Ok(())
    }

    pub fn init_cam(&mut self) -> CameraResult<()> {
        let device = self.registry.current_mut()?;
        gate::assert_valid(&*device)?;
        device.init()?;
        Ok(())
    }

    pub fn deinit_cam(&mut self) -> CameraResult<()> {
        let (device, cache) = self.registry.current_with_cache()?;
        gate::assert_initialized(&*device)?;
        device.deinit()?;
        cache.clear();
        Ok(())
    }

    pub fn start_acquisition(&mut self) -> CameraResult<()> {
        let device = self.registry.current_mut()?;
        gate::assert_initialized(&*device)?;
        device.begin_acquisition()?;
        Ok(())
    }

    pub fn end_acquisition(&mut self) -> CameraResult<()> {
        let device = self.registry.current_mut()?;
        gate::assert_streaming(&*device)?;
        device.end_acquisition()?;
        Ok(())
    }

    /// String form of the node dispatcher, e.g.
    /// `cam_node_cmd("TLStream.StreamBufferHandlingMode", "SetValue", Some("RW"), Some("StreamBufferHandlingMode.NewestOnly"))`.
    pub fn cam_node_cmd(
        &mut self,
        path: &str,
        method: &str,
        access_mode: Option<&str>,
        argument: Option<&str>,
    ) -> CameraResult<NodeValue> {
        let method: Method = method.parse()?;
        let expected = access_mode
            .map(|mode| mode.parse::<AccessMode>().map_err(CameraError::unsupported_argument))
            .transpose()?;
        let argument = argument.map(Argument::parse).transpose()?;

        let device = self.registry.current_mut()?;
        gate::assert_initialized(&*device)?;
        dispatch::invoke(device, path, method, expected, argument)
    }

    /// Turns the auto controls off and applies every configured value.
    pub fn apply_config(&mut self, config: &CameraConfig) -> CameraResult<()> {
        self.disable_auto_exposure()?;
        self.disable_auto_gain()?;
        self.disable_auto_frame_rate()?;
        self.set_gain(config.gain)?;
        if let Some(exposure) = config.exposure {
            self.set_exposure(exposure)?;
        }
        if let Some(frame_rate) = config.frame_rate {
            self.set_frame_rate(frame_rate)?;
        }
        if let Some(gamma) = config.gamma {
            self.set_gamma(gamma)?;
        }
        if let Some(mode) = config.video_mode {
            self.set_video_mode(mode)?;
        }
        Ok(())
    }

    pub fn get_image(&mut self) -> CameraResult<Option<Frame>> {
        let device = self.registry.current_mut()?;
        gate::assert_streaming(&*device)?;
        frame::capture_one(device)
    }

    pub fn get_image_and_avg(&mut self, num_to_avg: usize) -> CameraResult<AveragedFrame> {
        let device = self.registry.current_mut()?;
        gate::assert_streaming(&*device)?;
        frame::capture_averaged(device, num_to_avg)
    }

    /// Releases the live camera now instead of on drop.
    pub fn close(&mut self) -> TeardownReport {
        self.registry.teardown()
    }
}

impl<S: CameraSystem> Drop for SpinCam<S> {
    fn drop(&mut self) {
        info!("Cleaning up SpinCam...");
        self.registry.teardown();
        if self.system.is_in_use() {
            warn!("System is still in use");
        }
    }
}
