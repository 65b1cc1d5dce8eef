//! Status checks run before each camera operation.
//!
//! Each check includes the previous one: streaming implies initialized
//! implies valid. The checks only observe the device.

use crate::device::Device;
use crate::error::{CameraError, CameraResult};

pub fn assert_valid(device: &dyn Device) -> CameraResult<()> {
    if !device.is_valid() {
        return Err(CameraError::InvalidDevice);
    }
    Ok(())
}

pub fn assert_initialized(device: &dyn Device) -> CameraResult<()> {
    assert_valid(device)?;
    if !device.is_initialized() {
        return Err(CameraError::NotInitialized);
    }
    Ok(())
}

pub fn assert_streaming(device: &dyn Device) -> CameraResult<()> {
    assert_initialized(device)?;
    if !device.is_streaming() {
        return Err(CameraError::NotStreaming);
    }
    Ok(())
}
