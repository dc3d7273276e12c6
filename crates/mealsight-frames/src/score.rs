//! Frame quality scoring
//!
//! Composite score in [0, 1] combining sharpness, exposure, texture, and
//! frame-to-frame change. Food is sharp, reasonably lit, and textured;
//! camera movement between frames reveals new angles worth analyzing.

use image::GrayImage;

/// Normalization divisor for Laplacian variance (typical range 0-1000)
const SHARPNESS_DIVISOR: f64 = 500.0;
/// Normalization divisor for grayscale standard deviation
const TEXTURE_DIVISOR: f64 = 50.0;
/// Normalization divisor for mean absolute frame difference
const CHANGE_DIVISOR: f64 = 25.0;
/// Change score assigned to the first scored frame
const DEFAULT_CHANGE_SCORE: f64 = 0.5;

const SHARPNESS_WEIGHT: f64 = 0.4;
const BRIGHTNESS_WEIGHT: f64 = 0.2;
const TEXTURE_WEIGHT: f64 = 0.2;
const CHANGE_WEIGHT: f64 = 0.2;

/// Composite quality score for a frame, given the previous scored frame
/// for change detection.
pub fn frame_score(gray: &GrayImage, prev_gray: Option<&GrayImage>) -> f64 {
    let sharpness_score = (laplacian_variance(gray) / SHARPNESS_DIVISOR).min(1.0);

    let brightness = mean_luma(gray);
    let brightness_score = 1.0 - (brightness - 128.0).abs() / 128.0;

    let texture_score = (stddev_luma(gray) / TEXTURE_DIVISOR).min(1.0);

    let change_score = match prev_gray {
        Some(prev) if prev.dimensions() == gray.dimensions() => {
            (mean_abs_diff(gray, prev) / CHANGE_DIVISOR).min(1.0)
        }
        _ => DEFAULT_CHANGE_SCORE,
    };

    sharpness_score * SHARPNESS_WEIGHT
        + brightness_score * BRIGHTNESS_WEIGHT
        + texture_score * TEXTURE_WEIGHT
        + change_score * CHANGE_WEIGHT
}

/// Variance of the 4-neighbor Laplacian response (sharpness measure)
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut responses = Vec::with_capacity(((width - 2) * (height - 2)) as usize);
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = gray.get_pixel(x, y)[0] as f64;
            let up = gray.get_pixel(x, y - 1)[0] as f64;
            let down = gray.get_pixel(x, y + 1)[0] as f64;
            let left = gray.get_pixel(x - 1, y)[0] as f64;
            let right = gray.get_pixel(x + 1, y)[0] as f64;
            responses.push(up + down + left + right - 4.0 * center);
        }
    }

    variance(&responses)
}

/// Mean luma of a grayscale frame
pub fn mean_luma(gray: &GrayImage) -> f64 {
    let pixels = gray.as_raw();
    if pixels.is_empty() {
        return 0.0;
    }
    pixels.iter().map(|&p| p as f64).sum::<f64>() / pixels.len() as f64
}

/// Standard deviation of luma (texture measure)
pub fn stddev_luma(gray: &GrayImage) -> f64 {
    let pixels: Vec<f64> = gray.as_raw().iter().map(|&p| p as f64).collect();
    variance(&pixels).sqrt()
}

/// Mean absolute per-pixel difference between two same-sized frames
pub fn mean_abs_diff(a: &GrayImage, b: &GrayImage) -> f64 {
    let a_raw = a.as_raw();
    let b_raw = b.as_raw();
    if a_raw.is_empty() || a_raw.len() != b_raw.len() {
        return 0.0;
    }
    a_raw
        .iter()
        .zip(b_raw.iter())
        .map(|(&x, &y)| (x as f64 - y as f64).abs())
        .sum::<f64>()
        / a_raw.len() as f64
}

fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}
