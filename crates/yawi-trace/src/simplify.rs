//! Cleanup passes over a traced outline.
//!
//! Two independent passes, each selectable through [`SimplifyPass`]:
//!
//! - [`simplify_loops`] cuts out self-touching loops, which the follower
//!   produces where it crosses a diagonal saddle twice.
//! - [`simplify_staircase`] drops the short zig-zags between two vertices
//!   that sit two pixels apart on a shared row or column.
//!
//! Passes compose: each operates on the output of the previous one.
//! Neither pass ever returns fewer than 3 vertices; a pass that would
//! collapse the polygon returns its input unchanged instead.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Polygon};

/// Selects a cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimplifyPass {
    /// Remove self-touching loops ([`simplify_loops`]).
    Loops,
    /// Merge staircase jitter ([`simplify_staircase`]).
    Staircase,
}

/// Trait for polygon cleanup strategies.
pub trait PolygonSimplifier {
    /// Produce a cleaned copy of `polygon`.
    fn simplify(&self, polygon: &Polygon) -> Polygon;
}

impl PolygonSimplifier for SimplifyPass {
    fn simplify(&self, polygon: &Polygon) -> Polygon {
        match *self {
            Self::Loops => simplify_loops(polygon),
            Self::Staircase => simplify_staircase(polygon),
        }
    }
}

/// Apply `passes` in order, each to the previous pass's output.
#[must_use = "returns the simplified polygon"]
pub fn simplify_all(polygon: &Polygon, passes: &[SimplifyPass]) -> Polygon {
    passes
        .iter()
        .fold(polygon.clone(), |current, pass| pass.simplify(&current))
}

/// Remove self-touching loops.
///
/// For each vertex, the first later vertex at the same position closes a
/// loop; everything between them is dropped and the scan continues from
/// the later copy, looking for a further repeat. The result contains no
/// repeated positions, so a second application changes nothing.
#[must_use = "returns the simplified polygon"]
pub fn simplify_loops(polygon: &Polygon) -> Polygon {
    let v = polygon.vertices();
    let mut kept = Vec::with_capacity(v.len());

    let mut i = 0;
    while i < v.len() {
        while let Some(offset) = v[i + 1..].iter().position(|&p| p == v[i]) {
            i += offset + 1;
        }
        kept.push(v[i]);
        i += 1;
    }

    finish(polygon, kept, "loops")
}

/// Merge staircase artifacts.
///
/// Starting from the current vertex, search forward for the first vertex
/// exactly two pixels away on the same row or column. When one exists,
/// keep both and continue after the match, dropping the detour between
/// them; otherwise keep the current vertex and its successor. This pass
/// is not idempotent: a second run may find pairs the first one exposed.
#[must_use = "returns the simplified polygon"]
pub fn simplify_staircase(polygon: &Polygon) -> Polygon {
    let v = polygon.vertices();
    let mut kept = Vec::with_capacity(v.len());

    let mut current = 0;
    while current < v.len() {
        kept.push(v[current]);

        current = (current + 1..v.len())
            .find(|&s| staircase_partner(v[current], v[s]))
            .unwrap_or(current + 1);

        if let Some(&p) = v.get(current) {
            kept.push(p);
            current += 1;
        }
    }

    finish(polygon, kept, "staircase")
}

/// Two vertices on a shared row or column, exactly two pixels apart.
fn staircase_partner(a: Point, b: Point) -> bool {
    (a.x == b.x && a.y.abs_diff(b.y) == 2) || (a.y == b.y && a.x.abs_diff(b.x) == 2)
}

/// Collapse consecutive repeats (including last-to-first) and fall back
/// to `original` if fewer than 3 vertices remain.
fn finish(original: &Polygon, mut kept: Vec<Point>, pass: &str) -> Polygon {
    kept.dedup();
    while kept.len() > 1 && kept.first() == kept.last() {
        kept.pop();
    }

    if kept.len() < 3 {
        tracing::debug!(
            pass,
            before = original.len(),
            after = kept.len(),
            "pass would collapse the polygon; keeping input"
        );
        return original.clone();
    }

    tracing::debug!(pass, before = original.len(), after = kept.len(), "simplified");
    Polygon::new(kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(coords: &[(i32, i32)]) -> Polygon {
        Polygon::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// Outline of two pixels touching diagonally, as the tracer emits it.
    fn saddle_outline() -> Polygon {
        polygon(&[
            (3, 2),
            (3, 3),
            (4, 3),
            (4, 4),
            (3, 4),
            (3, 3),
            (2, 3),
            (2, 2),
        ])
    }

    /// Rectangle with a one-pixel bump on its right side and a notch
    /// further along.
    fn bumpy_outline() -> Polygon {
        polygon(&[
            (0, 0),
            (4, 0),
            (4, 1),
            (5, 1),
            (5, 2),
            (4, 2),
            (4, 3),
            (3, 3),
            (3, 5),
            (0, 5),
        ])
    }

    #[test]
    fn loops_cut_at_repeated_vertex() {
        let result = simplify_loops(&saddle_outline());
        assert_eq!(result, polygon(&[(3, 2), (3, 3), (2, 3), (2, 2)]));
    }

    #[test]
    fn loops_follow_chained_repeats() {
        // A B A C A D E: the scan jumps from the first A to the last.
        let p = polygon(&[(0, 0), (1, 0), (0, 0), (2, 0), (0, 0), (0, 3), (3, 3)]);
        let result = simplify_loops(&p);
        assert_eq!(result, polygon(&[(0, 0), (0, 3), (3, 3)]));
    }

    #[test]
    fn loops_idempotent() {
        for p in [saddle_outline(), bumpy_outline()] {
            let once = simplify_loops(&p);
            let twice = simplify_loops(&once);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn loops_without_repeats_unchanged() {
        let p = bumpy_outline();
        assert_eq!(simplify_loops(&p), p);
    }

    #[test]
    fn loops_never_collapse_below_three() {
        // Every vertex before the last repeat is dropped, leaving 2.
        let p = polygon(&[(0, 0), (1, 0), (1, 1), (0, 0), (5, 5)]);
        assert_eq!(simplify_loops(&p), p);
    }

    #[test]
    fn staircase_drops_bump() {
        let result = simplify_staircase(&bumpy_outline());
        assert_eq!(
            result,
            polygon(&[(0, 0), (4, 0), (4, 1), (4, 3), (3, 3), (3, 5), (0, 5)])
        );
    }

    #[test]
    fn staircase_without_pairs_unchanged() {
        let p = polygon(&[(0, 0), (5, 0), (5, 5), (0, 5)]);
        assert_eq!(simplify_staircase(&p), p);

        let stairs = polygon(&[
            (0, 0),
            (1, 0),
            (1, 1),
            (2, 1),
            (2, 2),
            (3, 2),
            (3, 3),
            (0, 3),
        ]);
        assert_eq!(simplify_staircase(&stairs), stairs);
    }

    #[test]
    fn staircase_partner_axes() {
        let a = Point::new(5, 5);
        assert!(staircase_partner(a, Point::new(5, 7)));
        assert!(staircase_partner(a, Point::new(5, 3)));
        assert!(staircase_partner(a, Point::new(3, 5)));
        assert!(staircase_partner(a, Point::new(7, 5)));
        assert!(!staircase_partner(a, Point::new(6, 6)));
        assert!(!staircase_partner(a, Point::new(5, 6)));
        assert!(!staircase_partner(a, Point::new(7, 7)));
        assert!(!staircase_partner(a, a));
    }

    #[test]
    fn passes_dispatch_and_compose() {
        assert_eq!(
            SimplifyPass::Loops.simplify(&saddle_outline()),
            simplify_loops(&saddle_outline())
        );
        assert_eq!(
            SimplifyPass::Staircase.simplify(&bumpy_outline()),
            simplify_staircase(&bumpy_outline())
        );

        let composed = simplify_all(
            &bumpy_outline(),
            &[SimplifyPass::Loops, SimplifyPass::Staircase],
        );
        assert_eq!(composed, simplify_staircase(&simplify_loops(&bumpy_outline())));
        assert_eq!(simplify_all(&bumpy_outline(), &[]), bumpy_outline());
    }

    #[test]
    fn outputs_stay_well_formed() {
        for p in [saddle_outline(), bumpy_outline()] {
            assert!(simplify_loops(&p).is_well_formed());
            assert!(simplify_staircase(&p).is_well_formed());
        }
    }
}
