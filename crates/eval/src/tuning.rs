//! Fusion weight tuning
//!
//! Grid search over α. Each candidate weight is evaluated independently
//! with [`Evaluator::evaluate`]; the weight with the strictly highest MAP
//! wins, so on a tie the earliest (smallest) candidate is kept.

use crate::harness::Evaluator;
use rankblend_core::{Alpha, BlendError, RelevanceJudgment, Result, TuningConfig};
use serde::Serialize;
use tracing::info;

/// Upper bound on grid size; guards against a near-zero step
pub const MAX_GRID_POINTS: usize = 10_000;

/// Decimal places kept when enumerating grid values
const GRID_PRECISION: f64 = 1e9;

// ============================================================================
// AlphaGrid
// ============================================================================

/// Candidate weights `start, start + step, ...` strictly below `stop`
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaGrid {
    start: f64,
    stop: f64,
    step: f64,
    values: Vec<Alpha>,
}

impl AlphaGrid {
    /// Build and validate a grid.
    ///
    /// Values are computed as `start + i * step` and rounded to nine
    /// decimals, so the default `0.1..1.0` by `0.1` yields exactly
    /// 0.1, 0.2, ..., 0.9.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the step is not positive, the range is empty, or
    /// the grid would exceed [`MAX_GRID_POINTS`]; `InvalidAlpha` if any
    /// value falls outside [0, 1].
    pub fn new(start: f64, stop: f64, step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(BlendError::invalid_config(format!(
                "grid step must be positive, got {}",
                step
            )));
        }
        if !start.is_finite() || !stop.is_finite() || start >= stop {
            return Err(BlendError::invalid_config(format!(
                "grid range is empty: start {} stop {}",
                start, stop
            )));
        }

        let mut values = Vec::new();
        for i in 0u32.. {
            let raw = start + f64::from(i) * step;
            let value = (raw * GRID_PRECISION).round() / GRID_PRECISION;
            if value >= stop {
                break;
            }
            if values.len() == MAX_GRID_POINTS {
                return Err(BlendError::invalid_config(format!(
                    "grid exceeds {} points",
                    MAX_GRID_POINTS
                )));
            }
            values.push(Alpha::new(value)?);
        }
        if values.is_empty() {
            return Err(BlendError::invalid_config(format!(
                "grid range is empty: start {} stop {}",
                start, stop
            )));
        }

        Ok(AlphaGrid {
            start,
            stop,
            step,
            values,
        })
    }

    /// Grid described by a `[tuning]` config section
    pub fn from_config(config: &TuningConfig) -> Result<Self> {
        AlphaGrid::new(config.start, config.stop, config.step)
    }

    /// First candidate
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Exclusive upper bound
    pub fn stop(&self) -> f64 {
        self.stop
    }

    /// Increment between candidates
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Candidate weights in ascending order
    pub fn values(&self) -> &[Alpha] {
        &self.values
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Never true for a grid built by [`new`](Self::new)
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// Sweep
// ============================================================================

/// Metrics at one candidate weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Candidate weight
    pub alpha: Alpha,
    /// Mean average precision
    pub map: f64,
    /// Mean nDCG
    pub ndcg: f64,
}

/// Result of a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningOutcome {
    /// Weight with the highest MAP
    pub best_alpha: Alpha,
    /// MAP at `best_alpha`
    pub best_map: f64,
    /// Mean nDCG at `best_alpha`
    pub best_ndcg: f64,
    /// Every evaluated candidate in grid order
    pub sweep: Vec<SweepPoint>,
}

/// Sweep `grid` and return the weight with the highest MAP.
///
/// See [`optimize_with`] for details.
pub fn optimize(
    evaluator: &Evaluator<'_>,
    judgments: &[RelevanceJudgment],
    grid: &AlphaGrid,
) -> Result<TuningOutcome> {
    optimize_with(evaluator, judgments, grid, |_| {})
}

/// Sweep `grid`, calling `observer` after each candidate is evaluated.
///
/// With no judgments nothing is evaluated: the outcome carries the first
/// grid value, zero metrics and an empty sweep. If every candidate scores
/// the same MAP the first one is returned, so a sweep that never retrieves
/// a relevant document reports `grid.start` with MAP 0 rather than α = 0.
///
/// # Errors
///
/// Propagates the first evaluation failure.
pub fn optimize_with<F>(
    evaluator: &Evaluator<'_>,
    judgments: &[RelevanceJudgment],
    grid: &AlphaGrid,
    mut observer: F,
) -> Result<TuningOutcome>
where
    F: FnMut(&SweepPoint),
{
    let first = match grid.values().first() {
        Some(alpha) => *alpha,
        None => return Err(BlendError::invalid_config("grid has no candidates")),
    };

    if judgments.is_empty() {
        info!(target: "rankblend::tune", "No judgments; skipping sweep");
        return Ok(TuningOutcome {
            best_alpha: first,
            best_map: 0.0,
            best_ndcg: 0.0,
            sweep: Vec::new(),
        });
    }

    let mut sweep = Vec::with_capacity(grid.len());
    let mut best: Option<SweepPoint> = None;

    for &alpha in grid.values() {
        let report = evaluator.evaluate(judgments, alpha)?;
        let point = SweepPoint {
            alpha,
            map: report.map,
            ndcg: report.ndcg,
        };
        info!(
            target: "rankblend::tune",
            alpha = %point.alpha,
            map = point.map,
            ndcg = point.ndcg,
            "Evaluated candidate"
        );
        observer(&point);

        if best.map_or(true, |b| point.map > b.map) {
            best = Some(point);
        }
        sweep.push(point);
    }

    // The grid is non-empty, so at least one point was recorded
    let best = best.unwrap_or(SweepPoint {
        alpha: first,
        map: 0.0,
        ndcg: 0.0,
    });
    info!(
        target: "rankblend::tune",
        best_alpha = %best.alpha,
        map = best.map,
        ndcg = best.ndcg,
        candidates = sweep.len(),
        "Sweep complete"
    );

    Ok(TuningOutcome {
        best_alpha: best.alpha,
        best_map: best.map,
        best_ndcg: best.ndcg,
        sweep,
    })
}
