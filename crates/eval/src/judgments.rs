//! Relevance judgment files
//!
//! A judgment file is a JSON array of `{query, relevant}` records:
//!
//! ```json
//! [
//!   {"query": "quantum computing applications", "relevant": ["1234", "5678"]},
//!   {"query": "climate change models", "relevant": ["2222"]}
//! ]
//! ```

use rankblend_core::{BlendError, RelevanceJudgment, Result};
use std::path::Path;
use tracing::{info, warn};

/// Load judgments in file order.
///
/// Judgments with an empty relevant set are kept; they score 0 on every
/// metric and a warning is logged for each.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read and `Parse` if it is not an
/// array of judgment records.
pub fn load_judgments(path: &Path) -> Result<Vec<RelevanceJudgment>> {
    let content = std::fs::read_to_string(path)?;
    let judgments: Vec<RelevanceJudgment> = serde_json::from_str(&content)
        .map_err(|e| BlendError::parse(format!("{}: {}", path.display(), e)))?;

    for judgment in judgments.iter().filter(|j| j.relevant.is_empty()) {
        warn!(
            target: "rankblend::eval",
            query = %judgment.query,
            "Judgment has no relevant documents; it will score 0"
        );
    }
    info!(
        target: "rankblend::eval",
        path = %path.display(),
        judgments = judgments.len(),
        "Loaded relevance judgments"
    );
    Ok(judgments)
}
