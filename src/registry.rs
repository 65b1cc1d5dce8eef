//! Holder of the single live camera.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::camera::controls::Control;
use crate::device::{Device, NodeId};
use crate::error::{CameraError, CameraResult};
use crate::gate;

/// Outcome of each teardown step. `None` means the step was not attempted
/// because no device was registered.
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub end_acquisition: Option<CameraResult<()>>,
    pub deinit: Option<CameraResult<()>>,
}

impl TeardownReport {
    /// True unless a step failed. Steps skipped because the camera was not
    /// streaming or not initialized count as clean.
    pub fn is_clean(&self) -> bool {
        let ok = |step: &Option<CameraResult<()>>| match step {
            Some(Err(e)) => is_skip(e),
            _ => true,
        };
        ok(&self.end_acquisition) && ok(&self.deinit)
    }
}

fn is_skip(e: &CameraError) -> bool {
    matches!(e, CameraError::NotStreaming | CameraError::NotInitialized)
}

#[derive(Default)]
pub struct DeviceRegistry {
    device: Option<Box<dyn Device>>,
    controls: HashMap<Control, NodeId>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the live device, tearing the previous one down first.
    pub fn register(&mut self, device: Box<dyn Device>) {
        if self.device.is_some() {
            let report = self.teardown();
            if !report.is_clean() {
                debug!("Previous camera was not cleanly torn down: {:?}", report);
            }
        }
        info!("Registered camera {}", device.serial());
        self.device = Some(device);
    }

    pub fn is_registered(&self) -> bool {
        self.device.is_some()
    }

    pub fn current(&self) -> CameraResult<&dyn Device> {
        self.device
            .as_deref()
            .ok_or_else(|| CameraError::not_found("no camera registered"))
    }

    pub fn current_mut(&mut self) -> CameraResult<&mut (dyn Device + 'static)> {
        self.device
            .as_deref_mut()
            .ok_or_else(|| CameraError::not_found("no camera registered"))
    }

    /// Current device together with its node-handle cache.
    pub(crate) fn current_with_cache(
        &mut self,
    ) -> CameraResult<(&mut (dyn Device + 'static), &mut HashMap<Control, NodeId>)> {
        let device = self
            .device
            .as_deref_mut()
            .ok_or_else(|| CameraError::not_found("no camera registered"))?;
        Ok((device, &mut self.controls))
    }

    /// Best-effort stop and de-init of the live device. Never fails; each
    /// step's result is logged and returned. The registry is empty afterwards.
    pub fn teardown(&mut self) -> TeardownReport {
        self.controls.clear();
        let Some(mut device) = self.device.take() else {
            return TeardownReport::default();
        };
        let serial = device.serial();

        let end_acquisition = gate::assert_streaming(device.as_ref())
            .and_then(|()| device.end_acquisition().map_err(CameraError::from));
        log_step(&serial, "end acquisition", &end_acquisition);

        let deinit = gate::assert_initialized(device.as_ref())
            .and_then(|()| device.deinit().map_err(CameraError::from));
        log_step(&serial, "de-init", &deinit);

        TeardownReport {
            end_acquisition: Some(end_acquisition),
            deinit: Some(deinit),
        }
    }
}

fn log_step(serial: &str, step: &str, result: &CameraResult<()>) {
    match result {
        Ok(()) => debug!("Camera {}: {} done", serial, step),
        Err(e) if is_skip(e) => debug!("Camera {}: {} skipped ({})", serial, step, e),
        Err(e) => warn!("Camera {}: {} failed: {}", serial, step, e),
    }
}
