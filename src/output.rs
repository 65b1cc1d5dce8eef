//! Writing captured images to disk.

use std::path::Path;

use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageBuffer, ImageError, ImageFormat, Luma};
use log::info;

use crate::error::Result;
use crate::frame::Image;

/// Pixel types that can be stored as 16-bit grayscale.
pub trait TiffPixel: Copy {
    fn to_u16(self) -> u16;
}

impl TiffPixel for u16 {
    fn to_u16(self) -> u16 {
        self
    }
}

impl TiffPixel for f32 {
    /// Clamps into `0..=65535`, then truncates.
    fn to_u16(self) -> u16 {
        self.clamp(0.0, u16::MAX as f32) as u16
    }
}

/// Saves `image` as a 16-bit grayscale TIFF. The parent directory must exist.
pub fn save_tiff<P: TiffPixel>(path: impl AsRef<Path>, image: &Image<P>) -> Result<()> {
    let path = path.as_ref();
    let (rows, cols) = image.shape();
    let pixels: Vec<u16> = image.data.iter().map(|p| p.to_u16()).collect();

    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(cols as u32, rows as u32, pixels)
        .ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::DimensionMismatch))
        })?;
    buffer.save_with_format(path, ImageFormat::Tiff)?;

    info!("Saved {}x{} image to {}", cols, rows, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::frame::{AveragedFrame, Frame};
    use ndarray::array;
    use tempfile::tempdir;

    #[test]
    fn test_save_frame_round_trips_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.tiff");
        let frame = Frame::new(array![[0u16, 1, 2], [1000, 4095, 65535]], 5, 16);

        save_tiff(&path, &frame).unwrap();

        let loaded = image::open(&path).unwrap().into_luma16();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(2, 0).0, [2]);
        assert_eq!(loaded.get_pixel(0, 1).0, [1000]);
        assert_eq!(loaded.get_pixel(2, 1).0, [65535]);
    }

    #[test]
    fn test_save_averaged_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("averaged.tiff");
        let averaged = AveragedFrame::new(array![[2.9f32, -1.0], [70000.0, 7.5]], 5, 16);

        save_tiff(&path, &averaged).unwrap();

        let loaded = image::open(&path).unwrap().into_luma16();
        assert_eq!(loaded.get_pixel(0, 0).0, [2]);
        assert_eq!(loaded.get_pixel(1, 0).0, [0]);
        assert_eq!(loaded.get_pixel(0, 1).0, [u16::MAX]);
        assert_eq!(loaded.get_pixel(1, 1).0, [7]);
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.tiff");
        let frame = Frame::new(array![[1u16]], 0, 16);

        let err = save_tiff(&path, &frame).unwrap_err();
        assert!(matches!(err, AppError::Image(_) | AppError::Io(_)));
    }
}
