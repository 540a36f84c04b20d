//! Trace diagnostics: timing and counts for each stage of one trace.
//!
//! Collected by [`trace_with_diagnostics`](crate::trace_with_diagnostics)
//! alongside the trace result. Intended for parameter tuning: comparing
//! windows, block radii and fractions on real images.
//!
//! Timestamps are captured via the `web-time` crate, which uses
//! `performance.now()` on WASM and `std::time::Instant` on native.
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Direction, Point, ThresholdWindow};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single trace.
///
/// Stages after a failure did not run; their fields are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDiagnostics {
    /// The seed the trace started from.
    pub seed: Point,
    /// Threshold window estimation.
    pub threshold: StageDiagnostics,
    /// Boundary location (walk from the seed to the edge).
    pub locate: StageDiagnostics,
    /// Boundary following (only when a boundary was located).
    pub edge_trace: Option<StageDiagnostics>,
    /// Total wall-clock duration of the trace (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Threshold estimation metrics.
    Threshold {
        /// Side of the sampled square.
        side: u32,
        /// The window that was derived.
        window: ThresholdWindow,
    },
    /// Boundary location metrics.
    Locate {
        /// Whether the walk used the exact test only (narrow window).
        exact_walk: bool,
        /// Boundary point, when found.
        edge: Option<Point>,
        /// Arrival direction at the boundary point, when found.
        direction: Option<Direction>,
    },
    /// Boundary following metrics.
    EdgeTrace {
        /// Lattice steps taken (up to the step limit).
        steps: Option<usize>,
        /// Vertices in the closed outline.
        vertex_count: Option<usize>,
    },
}

impl TraceDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Trace Diagnostics\n{}", "=".repeat(60)));
        lines.push(format!("Seed: ({}, {})", self.seed.x, self.seed.y));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!("{:<16} {:>10}  {}", "Stage", "Duration", "Details"));
        lines.push("-".repeat(60));

        let mut stages = vec![("Threshold", &self.threshold), ("Locate", &self.locate)];
        if let Some(ref trace) = self.edge_trace {
            stages.push(("Edge Trace", trace));
        }

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Threshold { side, window } => format!(
            "side={side} window=[{}, {}]",
            window.lower(),
            window.upper()
        ),
        StageMetrics::Locate {
            exact_walk,
            edge,
            direction,
        } => {
            let walk = if *exact_walk { "exact" } else { "block" };
            match (edge, direction) {
                (Some(p), Some(d)) => format!("{walk} walk -> ({}, {}) {d:?}", p.x, p.y),
                _ => format!("{walk} walk -> no boundary"),
            }
        }
        StageMetrics::EdgeTrace {
            steps,
            vertex_count,
        } => match (steps, vertex_count) {
            (Some(steps), Some(n)) => format!("{steps} steps, {n} vertices"),
            _ => "failed".to_string(),
        },
    }
}
