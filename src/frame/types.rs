use ndarray::Array2;

/// Pixel data and metadata of one captured (or averaged) image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<P> {
    /// Rows x columns.
    pub data: Array2<P>,
    pub timestamp: u64,
    pub bits_per_pixel: u32,
}

impl<P> Image<P> {
    pub fn new(data: Array2<P>, timestamp: u64, bits_per_pixel: u32) -> Self {
        Self {
            data,
            timestamp,
            bits_per_pixel,
        }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }
}

pub type Frame = Image<u16>;

/// Elementwise mean of several frames, kept in floating point.
pub type AveragedFrame = Image<f32>;

impl AveragedFrame {
    /// Truncates to 16-bit pixels, clamping values outside `0..=65535`.
    pub fn to_u16(&self) -> Frame {
        let data = self.data.mapv(|v| v.clamp(0.0, u16::MAX as f32) as u16);
        Image::new(data, self.timestamp, self.bits_per_pixel)
    }
}
