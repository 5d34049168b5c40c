use super::canvas::{Canvas, Rect};
use image::Rgb;
use rand::rngs::StdRng;
use rand::Rng;

const WARMUP: u32 = 100;
const MAX_TRIES: usize = 8;
/// Share of the plot area that must be lit for a parameter set to count.
const MIN_FILL: f64 = 0.02;

/// Clifford attractor:
/// x' = sin(a·y) + c·cos(a·x), y' = sin(b·x) + d·cos(b·y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clifford {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Clifford {
    pub fn random(rng: &mut StdRng) -> Self {
        Self {
            a: rng.gen_range(-2.0..2.0),
            b: rng.gen_range(-2.0..2.0),
            c: rng.gen_range(-1.5..1.5),
            d: rng.gen_range(-1.5..1.5),
        }
    }

    pub fn step(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            (self.a * y).sin() + self.c * (self.a * x).cos(),
            (self.b * x).sin() + self.d * (self.b * y).cos(),
        )
    }

    /// Every orbit stays inside this box.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let xr = 1.0 + self.c.abs();
        let yr = 1.0 + self.d.abs();
        ((-xr, xr), (-yr, yr))
    }
}

/// Hit counts per cell of a `width`×`height` grid.
pub struct Density {
    pub width: usize,
    pub height: usize,
    pub counts: Vec<u32>,
}

impl Density {
    pub fn accumulate(params: &Clifford, iterations: u32, width: usize, height: usize) -> Self {
        let mut counts = vec![0u32; width * height];
        let ((x_lo, x_hi), (y_lo, y_hi)) = params.bounds();
        let mut p = (0.1, 0.1);

        for i in 0..iterations.saturating_add(WARMUP) {
            p = params.step(p);
            if i < WARMUP {
                continue;
            }
            let cx = ((p.0 - x_lo) / (x_hi - x_lo) * width as f64) as usize;
            let cy = ((y_hi - p.1) / (y_hi - y_lo) * height as f64) as usize;
            if cx < width && cy < height {
                counts[cy * width + cx] = counts[cy * width + cx].saturating_add(1);
            }
        }

        Self { width, height, counts }
    }

    pub fn fill_ratio(&self) -> f64 {
        if self.counts.is_empty() {
            return 0.0;
        }
        let lit = self.counts.iter().filter(|&&c| c > 0).count();
        lit as f64 / self.counts.len() as f64
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Pick parameters whose orbit actually fills space. Keeps the last draw
/// if none qualify within `MAX_TRIES`.
pub fn find_params(rng: &mut StdRng, iterations: u32, width: usize, height: usize) -> (Clifford, Density) {
    let mut params = Clifford::random(rng);
    let mut density = Density::accumulate(&params, iterations, width, height);
    for _ in 1..MAX_TRIES {
        if density.fill_ratio() >= MIN_FILL {
            break;
        }
        tracing::debug!(?params, fill = density.fill_ratio(), "degenerate attractor, retrying");
        params = Clifford::random(rng);
        density = Density::accumulate(&params, iterations, width, height);
    }
    (params, density)
}

/// Log-scaled density glow tinted with `color`.
pub fn paint(canvas: &mut Canvas, area: Rect, color: Rgb<u8>, iterations: u32, rng: &mut StdRng) {
    let (w, h) = (area.width.max(1.0) as usize, area.height.max(1.0) as usize);
    let (_, density) = find_params(rng, iterations, w, h);
    let max = density.max();
    if max == 0 {
        return;
    }
    let norm = (1.0 + max as f32).ln();

    for (i, &count) in density.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let t = ((1.0 + count as f32).ln() / norm).powf(0.8);
        let x = area.x as u32 + (i % w) as u32;
        let y = area.y as u32 + (i / w) as u32;
        canvas.blend(x, y, color, t);
    }
}
