//! CPU compositing of rendered layers onto the page background.

use crate::gpu::LayerPixels;
use image::{Rgba, RgbaImage};

/// Opaque RGBA8 frame the layers are stacked onto.
pub struct Canvas {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: [f32; 3]) -> Self {
        let background = Rgba([
            to_u8(background[0]),
            to_u8(background[1]),
            to_u8(background[2]),
            255,
        ]);
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Reset every pixel to the background.
    pub fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    /// Composite a premultiplied layer with its opacity and vertical offset.
    ///
    /// The offset is in CSS pixels and is scaled by the layer's pixel ratio.
    /// Rows shifted past either edge are dropped.
    pub fn draw_layer(&mut self, layer: &LayerPixels) {
        let opacity = layer.style.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 || layer.pixels.len() < layer.width as usize * layer.height as usize * 4 {
            return;
        }
        let shift = (layer.style.offset_y * layer.pixel_ratio).round() as i64;
        let width = self.width().min(layer.width);

        for y in 0..self.height() {
            let src_y = y as i64 - shift;
            if src_y < 0 || src_y >= layer.height as i64 {
                continue;
            }
            let row = src_y as usize * layer.width as usize * 4;
            for x in 0..width {
                let i = row + x as usize * 4;
                let src = &layer.pixels[i..i + 4];
                if src[3] == 0 {
                    continue;
                }
                let dst = self.image.get_pixel_mut(x, y);
                *dst = blend_over(dst, src, opacity);
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Premultiplied source-over with an extra layer opacity.
fn blend_over(dst: &Rgba<u8>, src: &[u8], opacity: f32) -> Rgba<u8> {
    let src_a = src[3] as f32 / 255.0 * opacity;
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = src[c] as f32 / 255.0 * opacity;
        let d = dst[c] as f32 / 255.0;
        out[c] = to_u8(s + d * (1.0 - src_a));
    }
    let d_a = dst[3] as f32 / 255.0;
    out[3] = to_u8(src_a + d_a * (1.0 - src_a));
    Rgba(out)
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
