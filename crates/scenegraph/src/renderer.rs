//! Types shared by every rendering backend.

use crate::geometry::Vec4;
use crate::scene::{Camera, SceneGraph};

/// Which buffer row the bottom scanline of the image lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageOrigin {
    /// Row 0 is the top of the image; scanlines are mirrored on write.
    #[default]
    TopLeft,
    /// Row 0 is the bottom of the image.
    BottomLeft,
}

#[derive(Debug, Clone)]
pub struct RaytracerSettings {
    /// buffer clear colour for pixels whose ray hits nothing
    pub background: Vec4,
    pub image_origin: ImageOrigin,
    /// render at `ceil(size / divisor)` in each dimension
    pub resolution_divisor: u32,
}

impl Default for RaytracerSettings {
    fn default() -> Self {
        Self {
            background: Vec4(0.0, 0.0, 0.0, 0.0),
            image_origin: ImageOrigin::TopLeft,
            resolution_divisor: 1,
        }
    }
}

impl RaytracerSettings {
    pub fn scaled_size(&self, width: u32, height: u32) -> (u32, u32) {
        let divisor = self.resolution_divisor.max(1);
        (width.div_ceil(divisor), height.div_ceil(divisor))
    }

    /// Buffer row for raster row `y`, where raster row 0 is the bottom of the view.
    pub fn output_row(&self, height: u32, y: u32) -> u32 {
        match self.image_origin {
            ImageOrigin::TopLeft => height - 1 - y,
            ImageOrigin::BottomLeft => y,
        }
    }
}

/// RGBA8 image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RenderOutput {
    pub fn new(width: u32, height: u32, clear: Vec4) -> Self {
        let clear = to_rgba8(clear);
        let pixels = clear
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        RenderOutput {
            width,
            height,
            pixels,
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let o = self.offset(x, y);
        [self.pixels[o], self.pixels[o + 1], self.pixels[o + 2], self.pixels[o + 3]]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let o = self.offset(x, y);
        self.pixels[o..o + 4].copy_from_slice(&rgba);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

/// Linear `[0, 1]` colour to 8 bits per channel; out-of-range values saturate.
pub fn to_rgba8(color: Vec4) -> [u8; 4] {
    let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(color.0), channel(color.1), channel(color.2), channel(color.3)]
}

pub trait RenderingBackend {
    fn render(
        &mut self,
        scene: &SceneGraph,
        camera: &Camera,
        lights: &[Vec4],
        width: u32,
        height: u32,
        settings: &RaytracerSettings,
    ) -> RenderOutput;
}
