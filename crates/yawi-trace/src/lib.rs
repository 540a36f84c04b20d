//! yawi-trace: seed-based region outlining for grayscale images (sans-IO).
//!
//! Given a grayscale image and a seed point, a trace runs:
//! threshold estimation -> boundary location -> boundary following.
//! The resulting polygon can then be cleaned up with the passes in
//! [`simplify`].
//!
//! The boundary location step tests blocks of pixels rather than single
//! samples, so isolated noise inside a region does not stop the walk
//! toward its edge.
//!
//! This crate has **no I/O dependencies**: it reads borrowed pixel
//! buffers and returns owned data. Every call is self-contained, so
//! independent traces may run concurrently over the same image.

pub mod classify;
pub mod diagnostics;
pub mod grayscale;
pub mod measure;
pub mod outline;
pub mod sampler;
pub mod simplify;
pub mod threshold;
pub mod tracer;
pub mod types;

use web_time::Instant;

/// Re-exported so callers can name the decoded raster without depending
/// on `image` directly.
pub use image::GrayImage;
pub use classify::RegionClassifier;
pub use diagnostics::TraceDiagnostics;
pub use grayscale::{LoadError, decode_and_grayscale};
pub use measure::RegionMeasurements;
pub use outline::EdgeStart;
pub use sampler::GrayView;
pub use simplify::{
    PolygonSimplifier, SimplifyPass, simplify_all, simplify_loops, simplify_staircase,
};
pub use threshold::estimate_threshold;
pub use types::{
    Bounds, Dimensions, Direction, Point, Polygon, ThresholdWindow, TraceConfig, TraceError,
    TraceResult,
};

use crate::diagnostics::{StageDiagnostics, StageMetrics};

/// Trace the outline of the region containing `seed`.
///
/// # Steps
///
/// 1. Estimate the threshold window from the `config.side` square
///    around the seed.
/// 2. Walk right from the seed to the region's boundary.
/// 3. Follow the boundary until it closes.
///
/// # Errors
///
/// Returns [`TraceError::NoRegionFound`] if the seed's neighborhood is
/// not inside its own window or no boundary lies to its right,
/// [`TraceError::TraceOverflow`] if the boundary does not close within
/// [`tracer::MAX_TRACE_STEPS`], [`TraceError::AmbiguousTopology`] if the
/// follower loses the edge, and [`TraceError::DegenerateRegion`] if the
/// outline collapses when clamped to the image.
pub fn trace(view: &GrayView<'_>, seed: Point, config: &TraceConfig) -> TraceResult {
    let window = estimate_threshold(view, seed, config.side);
    trace_in_window(view, seed, window, config)
}

/// Trace with a caller-supplied threshold window.
///
/// `config.side` is not consulted; only the block parameters are used.
///
/// # Errors
///
/// Same as [`trace`].
pub fn trace_in_window(
    view: &GrayView<'_>,
    seed: Point,
    window: ThresholdWindow,
    config: &TraceConfig,
) -> TraceResult {
    let classifier = classifier_for(view, window, config);
    let start = outline::locate(&classifier, seed)?;
    let outline = tracer::trace_edge(&classifier, start)?;
    Ok(outline.polygon)
}

/// A trace result together with its diagnostics.
#[derive(Debug, Clone)]
pub struct TraceReport {
    /// The traced polygon or the failure reason.
    pub result: TraceResult,
    /// Per-stage timing and counts.
    pub diagnostics: TraceDiagnostics,
}

/// Like [`trace`], additionally collecting per-stage diagnostics.
#[must_use]
pub fn trace_with_diagnostics(
    view: &GrayView<'_>,
    seed: Point,
    config: &TraceConfig,
) -> TraceReport {
    let total_start = Instant::now();

    let stage_start = Instant::now();
    let window = estimate_threshold(view, seed, config.side);
    let threshold = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Threshold {
            side: config.side,
            window,
        },
    };

    let classifier = classifier_for(view, window, config);

    let stage_start = Instant::now();
    let located = outline::locate(&classifier, seed);
    let locate = StageDiagnostics {
        duration: stage_start.elapsed(),
        metrics: StageMetrics::Locate {
            exact_walk: window.span() < outline::NARROW_WINDOW_SPAN,
            edge: located.as_ref().ok().map(|s| s.point),
            direction: located.as_ref().ok().map(|s| s.direction),
        },
    };

    let (result, edge_trace) = match located {
        Ok(start) => {
            let stage_start = Instant::now();
            let traced = tracer::trace_edge(&classifier, start);
            let stage = StageDiagnostics {
                duration: stage_start.elapsed(),
                metrics: StageMetrics::EdgeTrace {
                    steps: traced.as_ref().ok().map(|o| o.steps),
                    vertex_count: traced.as_ref().ok().map(|o| o.polygon.len()),
                },
            };
            (traced.map(|o| o.polygon), Some(stage))
        }
        Err(e) => (Err(e), None),
    };

    TraceReport {
        result,
        diagnostics: TraceDiagnostics {
            seed,
            threshold,
            locate,
            edge_trace,
            total_duration: total_start.elapsed(),
        },
    }
}

const fn classifier_for<'a>(
    view: &GrayView<'a>,
    window: ThresholdWindow,
    config: &TraceConfig,
) -> RegionClassifier<'a> {
    RegionClassifier::new(
        *view,
        window,
        config.block_radius,
        config.min_inside_fraction,
    )
}
