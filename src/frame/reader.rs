use chrono::Local;
use log::{debug, error, info};
use ndarray::Array2;

use super::types::{AveragedFrame, Frame, Image};
use crate::device::{Device, RawFrame};
use crate::error::{CameraError, CameraResult};

/// Gives a device buffer back on every path. `release` reports the outcome;
/// a guard dropped early (error path) releases and logs instead.
struct FrameGuard {
    frame: Box<dyn RawFrame>,
    released: bool,
}

impl FrameGuard {
    fn new(frame: Box<dyn RawFrame>) -> Self {
        Self {
            frame,
            released: false,
        }
    }

    fn release(mut self) -> CameraResult<()> {
        self.released = true;
        self.frame.release()?;
        Ok(())
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.frame.release() {
                error!("Failed to release image: {}", e);
            }
        }
    }
}

fn next_frame<D: Device + ?Sized>(device: &mut D) -> CameraResult<FrameGuard> {
    match device.next_frame() {
        Ok(frame) => Ok(FrameGuard::new(frame)),
        Err(e) => {
            error!("Error: {}", e);
            Err(e.into())
        }
    }
}

/// Grabs the next frame. Incomplete frames are dropped and yield `None`.
pub fn capture_one<D: Device + ?Sized>(device: &mut D) -> CameraResult<Option<Frame>> {
    let guard = next_frame(device)?;
    if guard.frame.is_incomplete() {
        debug!("Dropping incomplete image");
        guard.release()?;
        return Ok(None);
    }

    let image = Image::new(
        guard.frame.pixels()?,
        guard.frame.timestamp(),
        guard.frame.bits_per_pixel(),
    );
    guard.release()?;
    Ok(Some(image))
}

/// Averages the next `count` frames, adding `frame / count` for each
/// complete one.
///
/// Incomplete frames contribute no pixels but still count towards `count`.
/// The result carries the timestamp and bit depth of the last frame of the
/// batch, complete or not. Any device error aborts the batch.
pub fn capture_averaged<D: Device + ?Sized>(device: &mut D, count: usize) -> CameraResult<AveragedFrame> {
    if count == 0 {
        return Err(CameraError::InvalidFrameCount(count));
    }

    info!("Averaging {} frames, start: {}", count, Local::now());
    let mut sum: Option<Array2<f32>> = None;
    let mut used = 0usize;
    let mut timestamp = 0;
    let mut bits_per_pixel = 0;

    let divisor = count as f32;

    for i in 0..count {
        let guard = next_frame(device)?;
        timestamp = guard.frame.timestamp();
        bits_per_pixel = guard.frame.bits_per_pixel();
        if guard.frame.is_incomplete() {
            debug!("Frame {} of {} incomplete, skipping", i + 1, count);
            guard.release()?;
            continue;
        }

        let pixels = guard.frame.pixels()?.mapv(|p| f32::from(p) / divisor);
        match sum.as_mut() {
            Some(acc) if acc.dim() != pixels.dim() => {
                return Err(CameraError::FrameShape {
                    expected: acc.dim(),
                    actual: pixels.dim(),
                });
            }
            Some(acc) => *acc += &pixels,
            None => sum = Some(pixels),
        }
        used += 1;
        guard.release()?;
    }

    let sum = sum.ok_or(CameraError::NoValidFrames { requested: count })?;
    info!("Averaged {} of {} frames, finish: {}", used, count, Local::now());
    Ok(Image::new(sum, timestamp, bits_per_pixel))
}
