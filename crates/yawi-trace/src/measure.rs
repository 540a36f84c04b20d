//! Size and shape measurements of a traced region.

use serde::{Deserialize, Serialize};

use crate::types::{Bounds, Polygon};

/// Bounding box, area and perimeter of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionMeasurements {
    /// Bounding box of the vertices.
    pub bounds: Bounds,
    /// Enclosed area in square pixels (shoelace formula). For an
    /// unsimplified outline that does not touch the image border this is
    /// the pixel count of the region.
    pub area: f64,
    /// Length of the closed outline in pixels.
    pub perimeter: f64,
    /// Number of vertices.
    pub vertex_count: usize,
}

impl RegionMeasurements {
    /// Measure `polygon`, or `None` if it has no vertices.
    #[must_use]
    pub fn of(polygon: &Polygon) -> Option<Self> {
        let bounds = polygon.bounds()?;

        let twice_area: i64 = polygon
            .edges()
            .map(|(a, b)| i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        let area = twice_area.unsigned_abs() as f64 / 2.0;

        let perimeter = polygon.edges().map(|(a, b)| a.distance(b)).sum();

        Some(Self {
            bounds,
            area,
            perimeter,
            vertex_count: polygon.len(),
        })
    }

    /// Format as a short multi-line summary.
    #[must_use]
    pub fn report(&self) -> String {
        format!(
            "x: {}\ny: {}\nwidth: {}\nheight: {}\narea: {:.1}\nperimeter: {:.2}\nvertices: {}",
            self.bounds.x_min,
            self.bounds.y_min,
            self.bounds.width(),
            self.bounds.height(),
            self.area,
            self.perimeter,
            self.vertex_count,
        )
    }
}
