use super::canvas::{Canvas, Rect};
use crate::feed::types::{Briefing, Channel};
use image::Rgb;
use rand::rngs::StdRng;
use rand::Rng;

pub const SAMPLES: usize = 100;
pub const X_MAX: f64 = 10.0;

const GLOW_WIDTH: f32 = 8.0;
const GLOW_ALPHA: f32 = 0.3;
const CORE_WIDTH: f32 = 2.0;

/// `n` evenly spaced values over [start, end], endpoints included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng, std_dev: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos() * std_dev
}

/// The curve for a briefing, sampled at `xs`.
pub fn series(briefing: &Briefing, xs: &[f64], rng: &mut StdRng) -> Vec<f64> {
    match briefing.channel {
        Channel::Tech => xs
            .iter()
            .map(|&x| x.sin() * (0.1 * x).exp() + gaussian(rng, 0.1))
            .collect(),
        Channel::Mind => xs
            .iter()
            .map(|&x| x.sin() * (2.0 * x).cos() * (0.2 * x).exp())
            .collect(),
        Channel::Science => match briefing.detail.as_str() {
            // Double helix-ish
            "genetics" => xs.iter().map(|&x| (3.0 * x).sin() + (3.0 * x).cos()).collect(),
            // Neural spikes
            "neuro" => xs.iter().map(|_| gaussian(rng, 0.5)).collect(),
            // Exponential growth for AI / CS
            _ => xs.iter().map(|&x| (0.3 * x).exp()).collect(),
        },
    }
}

/// Map samples into pixel space inside `area`, y axis pointing up.
pub fn project(xs: &[f64], ys: &[f64], area: Rect) -> Vec<(f32, f32)> {
    let (x_min, x_max) = bounds(xs);
    let (y_min, y_max) = bounds(ys);
    let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
    let pad = if y_max > y_min { (y_max - y_min) * 0.05 } else { 1.0 };
    let (y_lo, y_hi) = (y_min - pad, y_max + pad);

    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let px = area.x as f64 + (x - x_min) / x_span * area.width as f64;
            let py = area.y as f64 + (y_hi - y) / (y_hi - y_lo) * area.height as f64;
            (px as f32, py as f32)
        })
        .collect()
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })
        .unwrap_or((0.0, 1.0))
}

/// Neon line chart: a wide translucent glow under a thin core. No axes.
pub fn paint(canvas: &mut Canvas, area: Rect, briefing: &Briefing, color: Rgb<u8>, rng: &mut StdRng) {
    let xs = linspace(0.0, X_MAX, SAMPLES);
    let ys = series(briefing, &xs, rng);
    let points = project(&xs, &ys, area);
    canvas.stroke(&points, GLOW_WIDTH, color, GLOW_ALPHA);
    canvas.stroke(&points, CORE_WIDTH, color, 1.0);
}
