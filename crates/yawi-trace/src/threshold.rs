//! Threshold window estimation around a seed point.

use crate::sampler::GrayView;
use crate::types::{Point, ThresholdWindow};

/// Derive the brightness window from the square around `seed`.
///
/// The square extends `side / 2` pixels from the seed on every side.
/// Samples outside the image read as the sentinel 0, so a seed near the
/// border pulls `lower` down to 0. A uniform neighborhood gives a
/// single-value window.
#[must_use = "returns the estimated threshold window"]
pub fn estimate_threshold(view: &GrayView<'_>, seed: Point, side: u32) -> ThresholdWindow {
    let half = i32::try_from(side / 2).unwrap_or(i32::MAX);

    let mut lower = u8::MAX;
    let mut upper = u8::MIN;
    for y in seed.y.saturating_sub(half)..=seed.y.saturating_add(half) {
        for x in seed.x.saturating_sub(half)..=seed.x.saturating_add(half) {
            let value = view.sample(x, y);
            lower = lower.min(value);
            upper = upper.max(value);
        }
    }

    let window = ThresholdWindow::new(lower, upper);
    tracing::debug!(
        x = seed.x,
        y = seed.y,
        side,
        lower = window.lower(),
        upper = window.upper(),
        "estimated threshold window"
    );
    window
}
