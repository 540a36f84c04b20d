//! Boundary location: walk right from the seed to the region's edge.
//!
//! The walk starts with the block test so that isolated pixels outside
//! the window do not stop it early, then falls back to the exact pixel
//! test to land on the true edge. Narrow windows skip the block test
//! entirely because their boundaries need single-pixel accuracy.

use crate::classify::RegionClassifier;
use crate::types::{Direction, Point, TraceError};

/// Windows narrower than this (`upper - lower`) walk with the exact test.
pub const NARROW_WINDOW_SPAN: u8 = 5;

/// Where and in which direction the boundary follower starts.
///
/// `point` is a lattice point whose lower-left pixel is inside and whose
/// lower-right pixel is outside. `direction` is the direction the
/// follower is moving when it arrives back at `point`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStart {
    /// Lattice point on the boundary.
    pub point: Point,
    /// Arrival direction at `point`.
    pub direction: Direction,
}

/// Walk right from `seed` to the region's right boundary.
///
/// # Errors
///
/// Returns [`TraceError::NoRegionFound`] if the seed is off the image,
/// if the block test fails at the seed, or if the walk ends somewhere
/// that is not an inside-to-outside transition (for example when the
/// region runs off the right edge of the image).
pub fn locate(classifier: &RegionClassifier<'_>, seed: Point) -> Result<EdgeStart, TraceError> {
    let view = classifier.view();
    if !view.contains(seed.x, seed.y) {
        tracing::debug!(x = seed.x, y = seed.y, "seed is outside the image");
        return Err(TraceError::NoRegionFound);
    }
    if !classifier.inside_block(seed.x, seed.y, Direction::Right) {
        tracing::debug!(x = seed.x, y = seed.y, "block test fails at seed");
        return Err(TraceError::NoRegionFound);
    }

    let y = seed.y;
    let x_end = view.x_end();
    let x = if classifier.window().span() < NARROW_WINDOW_SPAN {
        walk_right_exact(classifier, seed.x, y, x_end)
    } else {
        let mut x = seed.x;
        loop {
            x += 1;
            if !(classifier.inside_block(x, y, Direction::Right) && x < x_end) {
                break;
            }
        }

        if classifier.inside_pixel(x, y) {
            // The block stopped on nearby noise; the region continues.
            walk_right_exact(classifier, x, y, x_end)
        } else if !classifier.inside_pixel(x - 1, y) {
            // The block overshot a thin boundary: back up until the left
            // block is inside again, then settle on the exact edge from
            // whichever side of it the step-back stopped.
            loop {
                x -= 1;
                if !(!classifier.inside_block(x, y, Direction::Left) && x > 0) {
                    break;
                }
            }
            if classifier.inside_pixel(x, y) {
                walk_right_exact(classifier, x, y, x_end)
            } else {
                walk_left_exact(classifier, x, y)
            }
        } else {
            x
        }
    };

    if !(classifier.inside_pixel(x - 1, y) && !classifier.inside_pixel(x, y)) {
        tracing::debug!(x, y, "walk ended without crossing a boundary");
        return Err(TraceError::NoRegionFound);
    }

    let direction = if !classifier.inside_pixel(x - 1, y - 1) {
        Direction::Right
    } else if classifier.inside_pixel(x, y - 1) {
        Direction::Left
    } else {
        Direction::Down
    };

    let start = EdgeStart {
        point: Point::new(x, y),
        direction,
    };
    tracing::debug!(x, y, ?direction, "located boundary");
    Ok(start)
}

/// Step left from the outside pixel `x` until the pixel to its left is
/// inside, stopping at 0.
fn walk_left_exact(classifier: &RegionClassifier<'_>, mut x: i32, y: i32) -> i32 {
    while !classifier.inside_pixel(x - 1, y) && x > 0 {
        x -= 1;
    }
    x
}

/// Step right from `x` while the exact test holds, stopping at `x_end`.
///
/// Always takes at least one step.
fn walk_right_exact(classifier: &RegionClassifier<'_>, mut x: i32, y: i32, x_end: i32) -> i32 {
    loop {
        x += 1;
        if !(classifier.inside_pixel(x, y) && x < x_end) {
            return x;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sampler::GrayView;
    use crate::types::ThresholdWindow;

    /// Image with a filled rectangle `[x0, x1) x [y0, y1)` of `fg` on `bg`.
    fn rect_image(
        width: u32,
        height: u32,
        (x0, y0, x1, y1): (u32, u32, u32, u32),
        fg: u8,
        bg: u8,
    ) -> Vec<u8> {
        (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| {
                    if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                        fg
                    } else {
                        bg
                    }
                })
            })
            .collect()
    }

    #[test]
    fn narrow_window_walks_to_exact_edge() {
        let buf = rect_image(10, 10, (3, 3, 7, 7), 200, 0);
        let view = GrayView::new(&buf, 10, 10).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(200, 200), 1, 0.6);
        let start = locate(&c, Point::new(4, 4)).unwrap();
        assert_eq!(start.point, Point::new(7, 4));
        assert_eq!(start.direction, Direction::Down);
    }

    #[test]
    fn wide_window_settles_on_exact_edge() {
        let buf = rect_image(20, 20, (5, 4, 13, 11), 255, 0);
        let view = GrayView::new(&buf, 20, 20).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(128, 255), 2, 0.6);
        let start = locate(&c, Point::new(8, 7)).unwrap();
        assert_eq!(start.point, Point::new(13, 7));
        assert_eq!(start.direction, Direction::Down);
    }

    #[test]
    fn block_walk_steps_over_noise() {
        let mut buf = rect_image(20, 16, (2, 2, 16, 13), 200, 0);
        buf[7 * 20 + 8] = 0;
        let view = GrayView::new(&buf, 20, 16).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(150, 255), 2, 0.6);
        let start = locate(&c, Point::new(4, 7)).unwrap();
        assert_eq!(start.point, Point::new(16, 7));
    }

    #[test]
    fn top_row_starts_moving_right() {
        let buf = rect_image(10, 10, (2, 2, 6, 6), 200, 0);
        let view = GrayView::new(&buf, 10, 10).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(200, 200), 1, 0.4);
        let start = locate(&c, Point::new(3, 2)).unwrap();
        assert_eq!(start.point, Point::new(6, 2));
        assert_eq!(start.direction, Direction::Right);
    }

    #[test]
    fn left_direction_when_upper_right_is_inside() {
        // An L shape: the row above the seed row extends further right.
        let mut buf = rect_image(12, 10, (2, 2, 6, 8), 200, 0);
        for x in 2..10 {
            buf[3 * 12 + x] = 200;
        }
        let view = GrayView::new(&buf, 12, 10).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(200, 200), 1, 0.6);
        let start = locate(&c, Point::new(3, 4)).unwrap();
        assert_eq!(start.point, Point::new(6, 4));
        assert_eq!(start.direction, Direction::Left);
    }

    #[test]
    fn failing_block_test_is_no_region() {
        let mut buf = vec![0u8; 100];
        buf[5 * 10 + 5] = 200;
        let view = GrayView::new(&buf, 10, 10).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(190, 210), 2, 0.6);
        assert_eq!(locate(&c, Point::new(5, 5)), Err(TraceError::NoRegionFound));
    }

    #[test]
    fn seed_off_image_is_no_region() {
        let buf = vec![100u8; 100];
        let view = GrayView::new(&buf, 10, 10).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(100, 100), 1, 0.6);
        assert_eq!(locate(&c, Point::new(-1, 5)), Err(TraceError::NoRegionFound));
        assert_eq!(locate(&c, Point::new(3, 10)), Err(TraceError::NoRegionFound));
    }

    #[test]
    fn region_running_off_image_is_no_region() {
        // Window includes the off-image sentinel, so no edge exists.
        let buf = vec![0u8; 100];
        let view = GrayView::new(&buf, 10, 10).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(0, 0), 1, 0.6);
        assert_eq!(locate(&c, Point::new(4, 4)), Err(TraceError::NoRegionFound));
    }

    #[test]
    fn image_edge_is_a_boundary_for_nonzero_windows() {
        let buf = vec![100u8; 100];
        let view = GrayView::new(&buf, 10, 10).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(100, 100), 1, 0.6);
        let start = locate(&c, Point::new(4, 4)).unwrap();
        assert_eq!(start.point, Point::new(10, 4));
        assert_eq!(start.direction, Direction::Down);
    }

    /// Rows 8..=12 inside for columns 0..30, except the seed row 10,
    /// which is inside only for columns 0..10: a one-pixel slit.
    fn slit_image() -> Vec<u8> {
        let mut buf = rect_image(40, 20, (0, 8, 30, 13), 200, 0);
        for x in 10..30 {
            buf[10 * 40 + x] = 0;
        }
        buf
    }

    #[test]
    fn overshoot_onto_outside_pixel_walks_back_to_edge() {
        // The block walk carries past the slit's mouth on the rows around
        // it, and the step-back stops on an outside pixel inside the slit.
        let buf = slit_image();
        let view = GrayView::new(&buf, 40, 20).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(150, 255), 2, 0.6);
        assert!(c.inside_block(5, 10, Direction::Right));
        let start = locate(&c, Point::new(5, 10)).unwrap();
        assert_eq!(start.point, Point::new(10, 10));
        assert_eq!(start.direction, Direction::Left);
    }

    #[test]
    fn overshoot_onto_inside_pixel_settles_right() {
        // Inside rows per column, chosen so the right block passes at
        // x=6 and fails at x=7 (both outside on row 10), the left block
        // fails at x=6 and passes at x=5 (inside).
        let columns: [&[usize]; 11] = [
            &[8, 9, 10, 11, 12],
            &[8, 9, 10, 11, 12],
            &[9, 10],
            &[9, 10],
            &[9, 10],
            &[9, 10],
            &[8],
            &[8, 12],
            &[8, 9, 12],
            &[8, 12],
            &[8, 12],
        ];
        let mut buf = vec![0u8; 16 * 16];
        for (x, rows) in columns.iter().enumerate() {
            for &y in *rows {
                buf[y * 16 + x] = 200;
            }
        }
        let view = GrayView::new(&buf, 16, 16).unwrap();
        let c = RegionClassifier::new(view, ThresholdWindow::new(150, 255), 2, 0.38);
        assert!(c.inside_block(6, 10, Direction::Right));
        assert!(!c.inside_block(7, 10, Direction::Right));
        assert!(!c.inside_block(6, 10, Direction::Left));
        assert!(c.inside_block(5, 10, Direction::Left));

        let start = locate(&c, Point::new(5, 10)).unwrap();
        assert_eq!(start.point, Point::new(6, 10));
        assert_eq!(start.direction, Direction::Down);
    }
}
