//! Result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one line per hit or metric
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use rankblend_core::BlendError;
use rankblend_eval::{EvalReport, SweepPoint, TuningOutcome};
use rankblend_fusion::SearchResponse;
use serde::Serialize;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {}\"}}", e))
}

/// Format an error.
pub fn format_error(err: &BlendError, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(&serde_json::json!({ "error": err.to_string() })),
        OutputMode::Human => format!("(error) {}", err),
    }
}

/// Format a fused ranking.
///
/// JSON mode emits the `{id, title, abstract, score}` records only.
pub fn format_search(response: &SearchResponse, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(&response.to_records()),
        OutputMode::Human => {
            if response.is_empty() {
                return "(empty list)".to_string();
            }
            let mut lines: Vec<String> = response
                .hits
                .iter()
                .map(|hit| {
                    format!(
                        "{}) [{}] {:.4}  {}",
                        hit.rank, hit.id, hit.score, hit.title
                    )
                })
                .collect();
            if let Some(backend) = response.stats.degraded {
                lines.push(format!("(warning) {} backend unavailable", backend));
            }
            lines.join("\n")
        }
    }
}

/// Format an evaluation report.
pub fn format_report(report: &EvalReport, mode: OutputMode, per_query: bool) -> String {
    match mode {
        OutputMode::Json => {
            if per_query {
                to_json(report)
            } else {
                to_json(&serde_json::json!({
                    "alpha": report.alpha,
                    "map": report.map,
                    "ndcg": report.ndcg,
                }))
            }
        }
        OutputMode::Human => {
            let mut lines = vec![format!(
                "Alpha: {}, MAP: {:.4}, NDCG: {:.4}",
                report.alpha, report.map, report.ndcg
            )];
            if per_query {
                lines.extend(report.per_query.iter().map(|q| {
                    format!(
                        "  {:<40} AP {:.4}  nDCG {:.4}  ({} retrieved)",
                        q.query, q.average_precision, q.ndcg, q.retrieved
                    )
                }));
            }
            let degraded = report.degraded_queries();
            if degraded > 0 {
                lines.push(format!("(warning) {} queries ran on one backend", degraded));
            }
            lines.join("\n")
        }
    }
}

/// Format one sweep candidate as it completes (human mode only).
pub fn format_sweep_point(point: &SweepPoint) -> String {
    format!(
        "Alpha: {}, MAP: {:.4}, NDCG: {:.4}",
        point.alpha, point.map, point.ndcg
    )
}

/// Format the end of a sweep.
///
/// `baseline` is the evaluation at the configured weight before tuning.
pub fn format_tuning(outcome: &TuningOutcome, baseline: &EvalReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(&serde_json::json!({
            "baseline": {
                "alpha": baseline.alpha,
                "map": baseline.map,
                "ndcg": baseline.ndcg,
            },
            "best_alpha": outcome.best_alpha,
            "best_map": outcome.best_map,
            "best_ndcg": outcome.best_ndcg,
            "sweep": outcome.sweep,
        })),
        OutputMode::Human => {
            let mut out = format!(
                "Best alpha: {}, MAP: {:.4}, NDCG: {:.4}",
                outcome.best_alpha, outcome.best_map, outcome.best_ndcg
            );
            if outcome.best_map > baseline.map {
                out.push_str(&format!(
                    "\nImproves MAP by {:.4} over alpha {}",
                    outcome.best_map - baseline.map,
                    baseline.alpha
                ));
            }
            out
        }
    }
}

/// Human banner printed before a sweep.
pub fn format_baseline(baseline: &EvalReport) -> String {
    format!(
        "Initial performance (alpha {}) - MAP: {:.4}, NDCG: {:.4}",
        baseline.alpha, baseline.map, baseline.ndcg
    )
}

/// Format an `init-config` result.
pub fn format_init(path: &std::path::Path, written: bool, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => to_json(&serde_json::json!({
            "path": path.display().to_string(),
            "written": written,
        })),
        OutputMode::Human if written => format!("Wrote {}", path.display()),
        OutputMode::Human => format!("{} already exists, left unchanged", path.display()),
    }
}
