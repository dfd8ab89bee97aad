use crate::foundation::error::{SnapError, SnapResult};

pub use kurbo::Vec2;

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Fully transparent pixel; the value of every unassigned layer position.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Owned width x height grid of straight-alpha RGBA8 pixels.
///
/// Bytes are tightly packed and row-major. A buffer with zero width or zero height is valid and
/// holds no pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA8 bytes, checking that the length matches `width * height * 4`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SnapResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(SnapError::input(format!(
                "pixel buffer {width}x{height} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Fully transparent buffer of the given size.
    pub fn transparent(width: u32, height: u32) -> SnapResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Buffer filled with a single color.
    pub fn solid(width: u32, height: u32, color: Rgba8) -> SnapResult<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&color);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Return `true` when the buffer covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Borrow the packed RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the packed RGBA8 bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Read the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let i = self.offset(x, y)?;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Write the pixel at `(x, y)`. Out-of-bounds writes are ignored and return `false`.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i..i + 4].copy_from_slice(&px);
                true
            }
            None => false,
        }
    }

    /// Borrow one row of RGBA8 bytes.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Number of pixels whose alpha is non-zero.
    pub fn opaque_pixel_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.data[start..start + stride]
    }

    fn stride(&self) -> usize {
        self.width as usize * 4
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

impl From<image::RgbaImage> for PixelBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl From<PixelBuffer> for image::RgbaImage {
    fn from(buf: PixelBuffer) -> Self {
        let PixelBuffer {
            width,
            height,
            data,
        } = buf;
        // Length is validated at construction.
        image::RgbaImage::from_raw(width, height, data)
            .unwrap_or_else(|| image::RgbaImage::new(width, height))
    }
}

fn byte_len(width: u32, height: u32) -> SnapResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SnapError::input("pixel buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
