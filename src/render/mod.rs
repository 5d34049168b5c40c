pub mod attractor;
pub mod canvas;
pub mod chart;
pub mod glyphs;

use crate::config::{ArtConfig, ArtStyle};
use crate::feed::types::{Briefing, Channel};
use anyhow::{Context, Result};
use canvas::{Canvas, Rect};
use image::Rgb;
use rand::rngs::StdRng;
use rand::Rng;
use std::path::PathBuf;

pub const BACKGROUND: Rgb<u8> = Rgb([0x05, 0x05, 0x05]);
const TITLE_COLOR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const MAX_TITLE_SCALE: u32 = 3;
const MARGIN: u32 = 20;

/// Neon color for a briefing.
pub fn palette(briefing: &Briefing) -> Rgb<u8> {
    match briefing.channel {
        Channel::Tech => Rgb([0x00, 0xff, 0x41]),
        Channel::Mind => Rgb([0xbd, 0x00, 0xff]),
        Channel::Science => match briefing.detail.as_str() {
            "genetics" => Rgb([0xff, 0x00, 0x55]),
            "neuro" => Rgb([0x00, 0xd0, 0xff]),
            _ => Rgb([0xff, 0x99, 0x00]),
        },
    }
}

/// "// SYSTEM OUTPUT: GENETICS //" for science, "ANALYSIS" otherwise.
pub fn title(briefing: &Briefing) -> String {
    let label = match briefing.channel {
        Channel::Science => briefing.detail.to_uppercase(),
        _ => "ANALYSIS".to_string(),
    };
    format!("// SYSTEM OUTPUT: {} //", label)
}

/// A rendered image, saved to disk.
#[derive(Debug, Clone)]
pub struct Artwork {
    pub style: ArtStyle,
    pub path: PathBuf,
    pub png: Vec<u8>,
}

pub struct Artist {
    config: ArtConfig,
}

impl Artist {
    pub fn new(config: ArtConfig) -> Self {
        Self { config }
    }

    /// Resolve `Auto` to a concrete style.
    pub fn resolve_style(style: ArtStyle, rng: &mut StdRng) -> ArtStyle {
        match style {
            ArtStyle::Auto if rng.gen_bool(0.5) => ArtStyle::Attractor,
            ArtStyle::Auto => ArtStyle::Chart,
            other => other,
        }
    }

    /// Render the briefing's image as PNG bytes.
    pub fn paint(&self, briefing: &Briefing, style: ArtStyle, rng: &mut StdRng) -> Result<Vec<u8>> {
        let (width, height) = (self.config.width, self.config.height);
        let mut canvas = Canvas::new(width, height, BACKGROUND);

        let band = self.draw_title(&mut canvas, &title(briefing));
        let area = Rect {
            x: MARGIN as f32,
            y: (band + MARGIN / 2) as f32,
            width: width.saturating_sub(2 * MARGIN).max(1) as f32,
            height: height.saturating_sub(band + MARGIN / 2 + MARGIN).max(1) as f32,
        };

        let color = palette(briefing);
        match Self::resolve_style(style, rng) {
            ArtStyle::Attractor => {
                attractor::paint(&mut canvas, area, color, self.config.attractor_iterations, rng)
            }
            _ => chart::paint(&mut canvas, area, briefing, color, rng),
        }

        canvas.encode_png()
    }

    /// Render and write to the configured image path.
    pub fn paint_to_file(&self, briefing: &Briefing, style: Option<ArtStyle>, rng: &mut StdRng) -> Result<Artwork> {
        let style = Self::resolve_style(style.unwrap_or(self.config.style), rng);
        let png = self.paint(briefing, style, rng)?;
        let path = PathBuf::from(&self.config.image_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create image directory: {}", parent.display()))?;
        }
        std::fs::write(&path, &png)
            .with_context(|| format!("Failed to write image: {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = png.len(), ?style, "image written");
        Ok(Artwork { style, path, png })
    }

    /// Centered title, scaled down to fit narrow canvases. Returns the band
    /// height below which the plot starts.
    fn draw_title(&self, canvas: &mut Canvas, text: &str) -> u32 {
        let text_px = glyphs::text_width(text).max(1);
        let available = canvas.width().saturating_sub(2 * MARGIN);
        let scale = (available / text_px).clamp(1, MAX_TITLE_SCALE);
        let x = canvas.width().saturating_sub(text_px * scale) / 2;
        canvas.text(text, x, MARGIN, scale, TITLE_COLOR);
        MARGIN + glyphs::GLYPH_HEIGHT * scale
    }
}
