//! CPU rasterizer.
//!
//! Shapes are evaluated per pixel center with a one-pixel soft edge, then
//! composited source-over onto an 8-bit RGBA image. Slow compared to the GPU
//! path, but exact enough for snapshots and tests.

use std::ops::Range;
use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use image::{ImageFormat, Rgba, RgbaImage};

use super::{Canvas, Viewport};

pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    /// A transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// RGBA bytes at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Write the current frame as a PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, ImageFormat::Png)
    }

    /// Composite `color` over the pixel at `(x, y)` with the given alpha.
    fn blend(&mut self, x: u32, y: u32, color: Vec3, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let alpha = alpha.min(1.0);
        let px = self.image.get_pixel_mut(x, y);
        let dst = Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0;
        let dst_alpha = px[3] as f32 / 255.0;
        let out = dst.lerp(color, alpha);
        let out_alpha = alpha + dst_alpha * (1.0 - alpha);
        *px = Rgba([to_u8(out.x), to_u8(out.y), to_u8(out.z), to_u8(out_alpha)]);
    }

    /// Pixel rows and columns touched by the box `[min, max]`, clipped.
    fn pixel_box(&self, min: Vec2, max: Vec2) -> Option<(Range<u32>, Range<u32>)> {
        let (w, h) = self.image.dimensions();
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(w);
        let y1 = (max.y.ceil().max(0.0) as u32).min(h);
        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0..x1, y0..y1))
        }
    }

    /// Visit every pixel center inside the clipped box.
    fn shade(&mut self, min: Vec2, max: Vec2, mut shader: impl FnMut(Vec2) -> Option<(Vec3, f32)>) {
        let Some((xs, ys)) = self.pixel_box(min, max) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((color, alpha)) = shader(center) {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn size(&self) -> Viewport {
        let (width, height) = self.image.dimensions();
        Viewport::new(width, height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
    }

    fn fill(&mut self, color: Vec4) {
        let rgba = Rgba([to_u8(color.x), to_u8(color.y), to_u8(color.z), 255]);
        for px in self.image.pixels_mut() {
            *px = rgba;
        }
    }

    fn glow(&mut self, center: Vec2, radius: f32, color: Vec4) {
        if radius <= 0.0 {
            return;
        }
        let extent = Vec2::splat(radius);
        self.shade(center - extent, center + extent, |p| {
            let d = p.distance(center);
            (d < radius).then(|| (color.truncate(), color.w * (1.0 - d / radius)))
        });
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: Vec4) {
        let extent = Vec2::splat(radius + 1.0);
        self.shade(center - extent, center + extent, |p| {
            let coverage = (radius - p.distance(center) + 0.5).clamp(0.0, 1.0);
            (coverage > 0.0).then(|| (color.truncate(), color.w * coverage))
        });
    }

    fn gradient_line(&mut self, from: Vec2, to: Vec2, width: f32, start: Vec4, end: Vec4) {
        let half = width * 0.5 + 1.0;
        let dir = to - from;
        let len_sq = dir.length_squared();
        self.shade(from.min(to) - half, from.max(to) + half, |p| {
            let t = if len_sq > 0.0 {
                ((p - from).dot(dir) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dist = p.distance(from + dir * t);
            let coverage = (width * 0.5 - dist + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                return None;
            }
            let color = start.lerp(end, t);
            Some((color.truncate(), color.w * coverage))
        });
    }

    fn vignette(&mut self, inner: f32, outer: f32, color: Vec4) {
        let size = self.size().size();
        let center = size * 0.5;
        let reach = center.length();
        if reach <= 0.0 {
            return;
        }
        self.shade(Vec2::ZERO, size, |p| {
            let strength = smoothstep(inner, outer, p.distance(center) / reach);
            Some((color.truncate(), color.w * strength))
        });
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
