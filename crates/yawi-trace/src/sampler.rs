//! Read-only pixel access over a borrowed grayscale buffer.
//!
//! Every coordinate is valid input: positions outside the image read as
//! [`OUTSIDE_SAMPLE`]. The region tests rely on this to treat the image
//! border as outside any threshold window that excludes 0.

use image::GrayImage;

use crate::types::{Dimensions, TraceError};

/// Value returned for coordinates outside the image.
pub const OUTSIDE_SAMPLE: u8 = 0;

/// Borrowed, row-major view of an 8-bit grayscale image.
#[derive(Debug, Clone, Copy)]
pub struct GrayView<'a> {
    samples: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> GrayView<'a> {
    /// Wrap a row-major sample buffer of `width * height` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidImage`] if the buffer length does not
    /// equal `width * height`, or if either dimension exceeds `i32::MAX`
    /// (pixel coordinates are signed 32-bit).
    pub fn new(samples: &'a [u8], width: u32, height: u32) -> Result<Self, TraceError> {
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(TraceError::InvalidImage(format!(
                "dimensions {width}x{height} exceed the signed coordinate range"
            )));
        }
        let expected = u64::from(width) * u64::from(height);
        if u64::try_from(samples.len()).ok() != Some(expected) {
            return Err(TraceError::InvalidImage(format!(
                "expected {expected} samples for {width}x{height}, got {}",
                samples.len()
            )));
        }
        Ok(Self {
            samples,
            width,
            height,
        })
    }

    /// Image width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Image dimensions in pixels.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// Width as a signed coordinate (validated at construction).
    pub(crate) fn x_end(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    /// Height as a signed coordinate (validated at construction).
    pub(crate) fn y_end(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }

    /// Whether `(x, y)` addresses a pixel of the image.
    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Pixel value at `(x, y)`, or [`OUTSIDE_SAMPLE`] off the image.
    #[must_use]
    pub fn sample(&self, x: i32, y: i32) -> u8 {
        self.index(x, y)
            .and_then(|i| self.samples.get(i).copied())
            .unwrap_or(OUTSIDE_SAMPLE)
    }

    /// Samples of row `y`, empty when `y` is off the image.
    #[must_use]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let Ok(width) = usize::try_from(self.width) else {
            return &[];
        };
        let start = y.saturating_mul(width);
        self.samples.get(start..start.saturating_add(width)).unwrap_or(&[])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()
    }
}

impl<'a> TryFrom<&'a GrayImage> for GrayView<'a> {
    type Error = TraceError;

    fn try_from(image: &'a GrayImage) -> Result<Self, Self::Error> {
        Self::new(image.as_raw(), image.width(), image.height())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let buf = [0u8; 5];
        let result = GrayView::new(&buf, 2, 3);
        assert!(matches!(result, Err(TraceError::InvalidImage(_))));
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let result = GrayView::new(&[], u32::MAX, 0);
        assert!(matches!(result, Err(TraceError::InvalidImage(_))));
    }

    #[test]
    fn empty_image_is_valid() {
        let view = GrayView::new(&[], 0, 0).unwrap();
        assert_eq!(view.sample(0, 0), OUTSIDE_SAMPLE);
        assert!(!view.contains(0, 0));
    }

    #[test]
    fn samples_row_major() {
        let buf = [1, 2, 3, 4, 5, 6];
        let view = GrayView::new(&buf, 3, 2).unwrap();
        assert_eq!(view.sample(0, 0), 1);
        assert_eq!(view.sample(2, 0), 3);
        assert_eq!(view.sample(0, 1), 4);
        assert_eq!(view.sample(2, 1), 6);
        assert_eq!(view.row(1), &[4, 5, 6]);
        assert!(view.row(2).is_empty());
    }

    #[test]
    fn out_of_range_reads_sentinel() {
        let buf = [9u8; 4];
        let view = GrayView::new(&buf, 2, 2).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (2, 0), (0, 2), (i32::MIN, i32::MAX)] {
            assert_eq!(view.sample(x, y), OUTSIDE_SAMPLE, "({x}, {y})");
            assert!(!view.contains(x, y));
        }
    }

    #[test]
    fn wraps_gray_image() {
        let img = GrayImage::from_pixel(4, 3, image::Luma([42]));
        let view = GrayView::try_from(&img).unwrap();
        assert_eq!(
            view.dimensions(),
            Dimensions {
                width: 4,
                height: 3
            }
        );
        assert_eq!(view.sample(3, 2), 42);
        assert_eq!(view.x_end(), 4);
        assert_eq!(view.y_end(), 3);
    }
}
