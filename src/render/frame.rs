use std::path::Path;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{EgoviewError, EgoviewResult};

/// A rendered frame as tightly packed RGB8 pixels, row-major, display order.
///
/// Each frame is owned by the call that rendered it; nothing else aliases the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, `width * height * 3` long.
    pub data: Vec<u8>,
}

impl FrameRGB {
    /// Allocate a frame filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        let px = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(px * 3);
        for _ in 0..px {
            data.extend_from_slice(&color.to_array());
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some(Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Overwrite the pixel at `(x, y)`; ignored outside the frame.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgb8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = self.offset(x, y);
        self.data[i..i + 3].copy_from_slice(&color.to_array());
    }

    /// Fill one whole row with `color`.
    pub fn fill_row(&mut self, y: u32, color: Rgb8) {
        if y >= self.height {
            return;
        }
        let row_len = self.width as usize * 3;
        let start = y as usize * row_len;
        for px in self.data[start..start + row_len].chunks_exact_mut(3) {
            px.copy_from_slice(&color.to_array());
        }
    }

    /// Convert into an `image` buffer.
    pub fn to_rgb_image(&self) -> EgoviewResult<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| EgoviewError::evaluation("frame data length does not match width*height*3"))
    }

    /// Write the frame as a PNG, creating parent directories as needed.
    pub fn save_png(&self, path: impl AsRef<Path>) -> EgoviewResult<()> {
        use anyhow::Context as _;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
        }
        self.to_rgb_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
