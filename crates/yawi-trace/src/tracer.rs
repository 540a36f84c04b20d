//! Boundary following over the pixel-corner lattice.
//!
//! The follower sits on a lattice point `(x, y)` and looks at the four
//! pixels around it:
//!
//! ```text
//!   UL (x-1, y-1) | UR (x, y-1)
//!   --------------+------------
//!   LL (x-1, y)   | LR (x, y)
//! ```
//!
//! The inside/outside pattern of those pixels, packed into a 4-bit code,
//! selects the next direction from [`DIRECTION_TABLE`]. A vertex is
//! recorded only where the direction changes, so straight runs cost
//! nothing. After each step two of the four flags carry over and only
//! the two new pixels are sampled.

use crate::classify::RegionClassifier;
use crate::outline::EdgeStart;
use crate::types::{Direction, Point, Polygon, TraceError};

/// Step limit for a single trace.
pub const MAX_TRACE_STEPS: usize = 10_000;

/// Initial vertex buffer capacity; the buffer doubles whenever it fills.
pub const INITIAL_VERTEX_CAPACITY: usize = 1000;

/// Next direction for each quadrant code `LR | LL<<1 | UR<<2 | UL<<3`.
#[rustfmt::skip]
pub const DIRECTION_TABLE: [Direction; 16] = [
    Direction::Undefined,   // 0000 cannot occur on a boundary
    Direction::Right,       // 000X
    Direction::Down,        // 00X0
    Direction::Right,       // 00XX
    Direction::Up,          // 0X00
    Direction::Up,          // 0X0X
    Direction::UpOrDown,    // 0XX0 saddle
    Direction::Up,          // 0XXX
    Direction::Left,        // X000
    Direction::LeftOrRight, // X00X saddle
    Direction::Down,        // X0X0
    Direction::Right,       // X0XX
    Direction::Left,        // XX00
    Direction::Left,        // XX0X
    Direction::Down,        // XXX0
    Direction::Undefined,   // XXXX cannot occur on a boundary
];

/// A closed outline together with the number of steps it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracedOutline {
    /// The outline, clamped to the image.
    pub polygon: Polygon,
    /// Lattice steps taken before the walk closed.
    pub steps: usize,
}

/// Inside flags of the four pixels around a lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Quadrants {
    ul: bool,
    ur: bool,
    ll: bool,
    lr: bool,
}

impl Quadrants {
    fn at(classifier: &RegionClassifier<'_>, p: Point) -> Self {
        Self {
            ul: classifier.inside_pixel(p.x - 1, p.y - 1),
            ur: classifier.inside_pixel(p.x, p.y - 1),
            ll: classifier.inside_pixel(p.x - 1, p.y),
            lr: classifier.inside_pixel(p.x, p.y),
        }
    }

    fn code(self) -> usize {
        usize::from(self.lr)
            | usize::from(self.ll) << 1
            | usize::from(self.ur) << 2
            | usize::from(self.ul) << 3
    }

    /// Flags at `p`, which is one step from the previous point in
    /// `direction`. Only the two newly exposed pixels are sampled.
    fn advance(self, classifier: &RegionClassifier<'_>, direction: Direction, p: Point) -> Self {
        match direction {
            Direction::Up => Self {
                ll: self.ul,
                lr: self.ur,
                ul: classifier.inside_pixel(p.x - 1, p.y - 1),
                ur: classifier.inside_pixel(p.x, p.y - 1),
            },
            Direction::Down => Self {
                ul: self.ll,
                ur: self.lr,
                ll: classifier.inside_pixel(p.x - 1, p.y),
                lr: classifier.inside_pixel(p.x, p.y),
            },
            Direction::Left => Self {
                ur: self.ul,
                lr: self.ll,
                ul: classifier.inside_pixel(p.x - 1, p.y - 1),
                ll: classifier.inside_pixel(p.x - 1, p.y),
            },
            Direction::Right => Self {
                ul: self.ur,
                ll: self.lr,
                ur: classifier.inside_pixel(p.x, p.y - 1),
                lr: classifier.inside_pixel(p.x, p.y),
            },
            Direction::UpOrDown | Direction::LeftOrRight | Direction::Undefined => {
                Self::at(classifier, p)
            }
        }
    }
}

/// One lattice step from `p` in `direction`.
const fn step(p: Point, direction: Direction) -> Point {
    match direction {
        Direction::Up => Point::new(p.x, p.y - 1),
        Direction::Down => Point::new(p.x, p.y + 1),
        Direction::Left => Point::new(p.x - 1, p.y),
        Direction::Right => Point::new(p.x + 1, p.y),
        Direction::UpOrDown | Direction::LeftOrRight | Direction::Undefined => p,
    }
}

/// Append `p`, doubling the buffer's capacity when it is full.
fn push_vertex(vertices: &mut Vec<Point>, p: Point) {
    if vertices.len() == vertices.capacity() {
        vertices.reserve_exact(vertices.capacity().max(1));
    }
    vertices.push(p);
}

/// Follow the boundary from `start` until the walk closes.
///
/// # Errors
///
/// - [`TraceError::AmbiguousTopology`] if the follower reaches a point
///   whose four pixels are all inside or all outside.
/// - [`TraceError::TraceOverflow`] if the walk does not close within
///   [`MAX_TRACE_STEPS`].
/// - [`TraceError::DegenerateRegion`] if clamping the outline to the
///   image leaves fewer than 3 vertices.
pub fn trace_edge(
    classifier: &RegionClassifier<'_>,
    start: EdgeStart,
) -> Result<TracedOutline, TraceError> {
    let mut vertices = Vec::with_capacity(INITIAL_VERTEX_CAPACITY);
    let mut position = start.point;
    let mut direction = start.direction;
    let mut quadrants = Quadrants::at(classifier, position);
    let mut steps = 0;

    loop {
        let next = DIRECTION_TABLE[quadrants.code()].resolve(direction);
        if !next.is_cardinal() {
            tracing::warn!(
                x = position.x,
                y = position.y,
                code = quadrants.code(),
                "boundary follower lost the edge"
            );
            return Err(TraceError::AmbiguousTopology {
                x: position.x,
                y: position.y,
            });
        }

        if next != direction {
            push_vertex(&mut vertices, position);
        }

        position = step(position, next);
        quadrants = quadrants.advance(classifier, next, position);
        direction = next;

        steps += 1;
        if steps > MAX_TRACE_STEPS {
            tracing::debug!(steps = MAX_TRACE_STEPS, "trace overflow");
            return Err(TraceError::TraceOverflow {
                steps: MAX_TRACE_STEPS,
            });
        }

        if position == start.point && direction == start.direction {
            break;
        }
    }

    let polygon = clamp_to_image(classifier, vertices)?;
    tracing::debug!(steps, vertices = polygon.len(), "boundary closed");
    Ok(TracedOutline { polygon, steps })
}

/// Clamp vertices into the image and collapse the duplicates that
/// clamping creates, including a last vertex equal to the first.
fn clamp_to_image(
    classifier: &RegionClassifier<'_>,
    vertices: Vec<Point>,
) -> Result<Polygon, TraceError> {
    let view = classifier.view();
    let x_max = (view.x_end() - 1).max(0);
    let y_max = (view.y_end() - 1).max(0);

    let mut clamped: Vec<Point> = vertices
        .into_iter()
        .map(|p| Point::new(p.x.clamp(0, x_max), p.y.clamp(0, y_max)))
        .collect();
    clamped.dedup();
    while clamped.len() > 1 && clamped.first() == clamped.last() {
        clamped.pop();
    }

    if clamped.len() < 3 {
        return Err(TraceError::DegenerateRegion {
            vertices: clamped.len(),
        });
    }
    Ok(Polygon::new(clamped))
}
