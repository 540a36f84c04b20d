//! Shared types for the yawi region tracer.

use serde::{Deserialize, Serialize};

/// A position on the pixel grid.
///
/// Traced vertices live on the pixel-corner lattice: the vertex `(x, y)`
/// is the top-left corner of pixel `(x, y)`. Intermediate positions may
/// be negative or past the image extent; output vertices never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: i32,
    /// Vertical position (pixels from top edge).
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Axis-aligned bounding box of a polygon, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest x of any vertex.
    pub x_min: i32,
    /// Smallest y of any vertex.
    pub y_min: i32,
    /// Largest x of any vertex.
    pub x_max: i32,
    /// Largest y of any vertex.
    pub y_max: i32,
}

impl Bounds {
    /// Horizontal extent (`x_max - x_min`).
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    /// Vertical extent (`y_max - y_min`).
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y_max - self.y_min
    }
}

/// Movement direction of the boundary follower.
///
/// `UpOrDown` and `LeftOrRight` mark saddle configurations that are
/// resolved against the previous direction. `Undefined` marks the two
/// quadrant configurations (all outside, all inside) that cannot occur
/// on a real boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward smaller `y`.
    Up,
    /// Toward larger `y`.
    Down,
    /// Toward smaller `x`.
    Left,
    /// Toward larger `x`.
    Right,
    /// Saddle: up or down depending on the previous step.
    UpOrDown,
    /// Saddle: left or right depending on the previous step.
    LeftOrRight,
    /// No valid move.
    Undefined,
}

impl Direction {
    /// Resolve a saddle direction using the direction of the previous step.
    ///
    /// `UpOrDown` turns up only when the walk was heading right;
    /// `LeftOrRight` turns left only when the walk was heading up.
    /// Every other direction is returned unchanged.
    #[must_use]
    pub fn resolve(self, previous: Self) -> Self {
        match self {
            Self::UpOrDown if previous == Self::Right => Self::Up,
            Self::UpOrDown => Self::Down,
            Self::LeftOrRight if previous == Self::Up => Self::Left,
            Self::LeftOrRight => Self::Right,
            other => other,
        }
    }

    /// `true` for the four directions a step can actually be taken in.
    #[must_use]
    pub const fn is_cardinal(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

/// Brightness range `[lower, upper]` considered inside the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdWindow {
    lower: u8,
    upper: u8,
}

impl ThresholdWindow {
    /// Create a window from two bounds given in either order.
    #[must_use]
    pub const fn new(a: u8, b: u8) -> Self {
        if a <= b {
            Self { lower: a, upper: b }
        } else {
            Self { lower: b, upper: a }
        }
    }

    /// Lowest intensity inside the window.
    #[must_use]
    pub const fn lower(&self) -> u8 {
        self.lower
    }

    /// Highest intensity inside the window.
    #[must_use]
    pub const fn upper(&self) -> u8 {
        self.upper
    }

    /// Width of the window, `upper - lower`.
    #[must_use]
    pub const fn span(&self) -> u8 {
        self.upper - self.lower
    }

    /// Whether `value` lies within `[lower, upper]`.
    #[must_use]
    pub const fn contains(&self, value: u8) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// A closed polygon: the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    /// Create a polygon from its vertices in traversal order.
    #[must_use]
    pub const fn new(vertices: Vec<Point>) -> Self {
        Self(vertices)
    }

    /// Returns `true` if the polygon has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polygon and returns the underlying vertices.
    #[must_use]
    pub fn into_vertices(self) -> Vec<Point> {
        self.0
    }

    /// Iterate over the edges `(from, to)`, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.0
            .iter()
            .copied()
            .zip(self.0.iter().copied().cycle().skip(1))
    }

    /// Bounding box of all vertices, or `None` for an empty polygon.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.0.first()?;
        let init = Bounds {
            x_min: first.x,
            y_min: first.y,
            x_max: first.x,
            y_max: first.y,
        };
        Some(self.0.iter().fold(init, |b, p| Bounds {
            x_min: b.x_min.min(p.x),
            y_min: b.y_min.min(p.y),
            x_max: b.x_max.max(p.x),
            y_max: b.y_max.max(p.y),
        }))
    }

    /// `true` when the polygon has at least 3 vertices and no vertex
    /// equals its successor (the last vertex's successor is the first).
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.len() >= 3 && self.edges().all(|(a, b)| a != b)
    }
}

/// Parameters of one trace, supplied by the caller.
///
/// The core never clamps these values; [`TraceConfig::validate`] is
/// available for callers that accept untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Edge length of the square sampled around the seed to derive the
    /// threshold window. The square extends `side / 2` pixels from the
    /// seed in every direction.
    pub side: u32,

    /// Half-size of the block inside-test. The block spans
    /// `2 * block_radius + 1` pixels across the walk direction and
    /// `2 * block_radius + 1` pixels along it.
    pub block_radius: u32,

    /// Fraction of the nominal block area that must be inside the
    /// threshold window for the block test to pass.
    pub min_inside_fraction: f64,
}

impl TraceConfig {
    /// Default threshold-window side.
    pub const DEFAULT_SIDE: u32 = 5;
    /// Default block-test radius.
    pub const DEFAULT_BLOCK_RADIUS: u32 = 2;
    /// Default minimum inside fraction for the block test.
    pub const DEFAULT_MIN_INSIDE_FRACTION: f64 = 0.6;

    /// Check the structural invariants: `side >= 2`, `block_radius >= 1`,
    /// and `min_inside_fraction` finite in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::InvalidConfig`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), TraceError> {
        if self.side < 2 {
            return Err(TraceError::InvalidConfig(format!(
                "side must be at least 2, got {}",
                self.side
            )));
        }
        if self.block_radius < 1 {
            return Err(TraceError::InvalidConfig(
                "block_radius must be at least 1".to_string(),
            ));
        }
        let f = self.min_inside_fraction;
        if !f.is_finite() || f <= 0.0 || f > 1.0 {
            return Err(TraceError::InvalidConfig(format!(
                "min_inside_fraction must be in (0, 1], got {f}"
            )));
        }
        Ok(())
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            side: Self::DEFAULT_SIDE,
            block_radius: Self::DEFAULT_BLOCK_RADIUS,
            min_inside_fraction: Self::DEFAULT_MIN_INSIDE_FRACTION,
        }
    }
}

/// Outcome of a trace: a closed polygon or the reason none was produced.
pub type TraceResult = Result<Polygon, TraceError>;

/// Reasons a trace can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum TraceError {
    /// The seed's neighborhood fails the block test, or no boundary
    /// exists between the seed and the right edge of the image.
    #[error("no region found at the seed point")]
    NoRegionFound,

    /// The boundary did not close within the step limit.
    #[error("boundary did not close within {steps} steps")]
    TraceOverflow {
        /// The step limit that was exceeded.
        steps: usize,
    },

    /// The follower reached a position whose four quadrants are all
    /// inside or all outside.
    #[error("ambiguous boundary topology at ({x}, {y})")]
    AmbiguousTopology {
        /// Horizontal position of the offending lattice point.
        x: i32,
        /// Vertical position of the offending lattice point.
        y: i32,
    },

    /// Clamping the outline to the image left fewer than 3 vertices.
    #[error("traced outline collapsed to {vertices} vertices")]
    DegenerateRegion {
        /// Vertices remaining after clamping.
        vertices: usize,
    },

    /// The pixel buffer does not describe a valid image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Trace configuration is invalid.
    #[error("invalid trace configuration: {0}")]
    InvalidConfig(String),
}
