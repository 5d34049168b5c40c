use super::glyphs;
use anyhow::{Context, Result};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Plot region in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// RGB raster with alpha-blended drawing.
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.image.get_pixel(x, y)
    }

    /// Blend `color` over the pixel at (x, y). Out-of-bounds is a no-op.
    pub fn blend(&mut self, x: u32, y: u32, color: Rgb<u8>, alpha: f32) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let px = self.image.get_pixel_mut(x, y);
        for i in 0..3 {
            let dst = px.0[i] as f32;
            let src = color.0[i] as f32;
            px.0[i] = (dst * (1.0 - a) + src * a).round() as u8;
        }
    }

    /// Anti-aliased polyline. Coverage is accumulated per pixel before
    /// compositing so joints between segments are not blended twice.
    pub fn stroke(&mut self, points: &[(f32, f32)], width: f32, color: Rgb<u8>, alpha: f32) {
        if points.len() < 2 {
            return;
        }
        let (w, h) = (self.width() as usize, self.height() as usize);
        let mut coverage = vec![0f32; w * h];
        let half = width / 2.0;

        for seg in points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            if ![a.0, a.1, b.0, b.1].iter().all(|v| v.is_finite()) {
                continue;
            }
            let min_x = (a.0.min(b.0) - half - 1.0).floor().max(0.0) as usize;
            let min_y = (a.1.min(b.1) - half - 1.0).floor().max(0.0) as usize;
            let max_x = ((a.0.max(b.0) + half + 1.0).ceil() as i64).min(w as i64 - 1);
            let max_y = ((a.1.max(b.1) + half + 1.0).ceil() as i64).min(h as i64 - 1);
            if max_x < 0 || max_y < 0 {
                continue;
            }

            for y in min_y..=max_y as usize {
                for x in min_x..=max_x as usize {
                    let d = distance_to_segment((x as f32 + 0.5, y as f32 + 0.5), a, b);
                    let c = (half + 0.5 - d).clamp(0.0, 1.0);
                    let cell = &mut coverage[y * w + x];
                    if c > *cell {
                        *cell = c;
                    }
                }
            }
        }

        for (i, c) in coverage.iter().enumerate() {
            if *c > 0.0 {
                self.blend((i % w) as u32, (i / w) as u32, color, alpha * c);
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y), each font pixel a
    /// `scale`-sized square.
    pub fn text(&mut self, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
        let scale = scale.max(1);
        for (i, ch) in text.chars().enumerate() {
            let Some(rows) = glyphs::glyph(ch) else { continue };
            let origin_x = x + i as u32 * glyphs::ADVANCE * scale;
            for (row_idx, row) in rows.iter().enumerate() {
                for col in 0..glyphs::GLYPH_WIDTH {
                    if row & (1 << (glyphs::GLYPH_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let px = origin_x + col * scale;
                    let py = y + row_idx as u32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            self.blend(px + dx, py + dy, color, 1.0);
                        }
                    }
                }
            }
        }
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .context("failed to encode PNG")?;
        Ok(buf)
    }
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}
