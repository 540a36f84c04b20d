//! Inside tests against a threshold window.
//!
//! Two predicates share one [`RegionClassifier`]:
//!
//! - [`inside_pixel`](RegionClassifier::inside_pixel) checks a single
//!   sample. The boundary follower uses it exclusively.
//! - [`inside_block`](RegionClassifier::inside_block) takes a majority
//!   vote over a rectangle that extends ahead of the walk direction. The
//!   outliner uses it to step over isolated noise pixels.

use std::ops::RangeInclusive;

use crate::sampler::GrayView;
use crate::types::{Direction, ThresholdWindow};

/// Region membership tests for one trace.
#[derive(Debug, Clone, Copy)]
pub struct RegionClassifier<'a> {
    view: GrayView<'a>,
    window: ThresholdWindow,
    block_radius: u32,
    min_inside_fraction: f64,
}

impl<'a> RegionClassifier<'a> {
    /// Create a classifier over `view` for the given window and block
    /// parameters.
    #[must_use]
    pub const fn new(
        view: GrayView<'a>,
        window: ThresholdWindow,
        block_radius: u32,
        min_inside_fraction: f64,
    ) -> Self {
        Self {
            view,
            window,
            block_radius,
            min_inside_fraction,
        }
    }

    /// The image being classified.
    #[must_use]
    pub const fn view(&self) -> &GrayView<'a> {
        &self.view
    }

    /// The threshold window in use.
    #[must_use]
    pub const fn window(&self) -> ThresholdWindow {
        self.window
    }

    /// Whether the sample at `(x, y)` lies in the window.
    ///
    /// Off-image positions read as 0 and are therefore inside only when
    /// the window's lower bound is 0.
    #[must_use]
    pub fn inside_pixel(&self, x: i32, y: i32) -> bool {
        self.window.contains(self.view.sample(x, y))
    }

    /// Majority test over a rectangle biased toward `direction`.
    ///
    /// With radius `r`, moving right tests columns `x..=x+2r` and rows
    /// `y-r..=y+r`; left, up and down are the mirrored and transposed
    /// rectangles. Non-cardinal directions test the centered square.
    /// The rectangle is clamped to the image, but the count is divided by
    /// the nominal area `(2r+1)^2`, so clipped pixels count as outside.
    /// With `r = 0` this matches [`inside_pixel`](Self::inside_pixel) at
    /// every in-image position; off the image the block is always outside,
    /// even when the window reaches down to the off-image sentinel.
    #[must_use]
    pub fn inside_block(&self, x: i32, y: i32, direction: Direction) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let r = i64::from(self.block_radius);
        let (cols, rows) = match direction {
            Direction::Up => ((x - r, x + r), (y - 2 * r, y)),
            Direction::Down => ((x - r, x + r), (y, y + 2 * r)),
            Direction::Left => ((x - 2 * r, x), (y - r, y + r)),
            Direction::Right => ((x, x + 2 * r), (y - r, y + r)),
            Direction::UpOrDown | Direction::LeftOrRight | Direction::Undefined => {
                ((x - r, x + r), (y - r, y + r))
            }
        };

        let inside = match (
            clamp_span(cols, self.view.width()),
            clamp_span(rows, self.view.height()),
        ) {
            (Some(cols), Some(rows)) => rows
                .map(|row| {
                    self.view.row(row)[cols.clone()]
                        .iter()
                        .filter(|&&v| self.window.contains(v))
                        .count()
                })
                .sum(),
            _ => 0,
        };

        #[allow(clippy::cast_precision_loss)]
        let ratio = inside as f64 / ((2 * r + 1) * (2 * r + 1)) as f64;
        ratio >= self.min_inside_fraction
    }
}

/// Clamp the inclusive span `lo..=hi` to `0..len`, or `None` when the
/// clamped span is empty.
fn clamp_span((lo, hi): (i64, i64), len: u32) -> Option<RangeInclusive<usize>> {
    let lo = usize::try_from(lo.max(0)).ok()?;
    let hi = usize::try_from(hi.min(i64::from(len) - 1)).ok()?;
    (lo <= hi).then_some(lo..=hi)
}
