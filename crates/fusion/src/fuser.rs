//! Fusion infrastructure for combining lexical and semantic results
//!
//! This module provides:
//! - Fuser trait for pluggable fusion algorithms
//! - PositionFuser: linear blend of rank-position scores (default)
//! - fuse: the free-function form used by tests and the harness
//!
//! Backend scores are not comparable across heterogeneous engines, so only
//! the position of a document in each list is used.

use rankblend_core::{Alpha, CandidateList, DocId};
use std::collections::HashMap;

// ============================================================================
// FusedHit / FusedResult
// ============================================================================

/// One document of the merged ranking, before resolution
#[derive(Debug, Clone, PartialEq)]
pub struct FusedHit {
    /// Document identifier
    pub id: DocId,
    /// Blended position score
    pub score: f64,
    /// Rank in the lexical list (1-indexed), if present there
    pub lexical_rank: Option<u32>,
    /// Rank in the semantic list (1-indexed), if present there
    pub semantic_rank: Option<u32>,
}

/// Result of fusing the two backend lists
#[derive(Debug, Clone, Default)]
pub struct FusedResult {
    /// Final ranked list of hits, best first
    pub hits: Vec<FusedHit>,
    /// Whether more documents were scored than `top_k` allowed
    pub truncated: bool,
}

impl FusedResult {
    /// Create a new FusedResult
    pub fn new(hits: Vec<FusedHit>, truncated: bool) -> Self {
        FusedResult { hits, truncated }
    }

    /// Identifiers in rank order
    pub fn ids(&self) -> Vec<DocId> {
        self.hits.iter().map(|h| h.id.clone()).collect()
    }
}

// ============================================================================
// Fuser Trait
// ============================================================================

/// Pluggable fusion interface
///
/// Fusers combine the lexical and semantic candidate lists into a single
/// ranked list truncated to `k` items.
///
/// # Thread Safety
///
/// Fusers must be Send + Sync; one instance serves concurrent searches.
/// The fusion weight is an argument of every call, never fuser state.
pub trait Fuser: Send + Sync {
    /// Fuse the two lists under `alpha`, keeping the best `k`
    fn fuse(
        &self,
        lexical: &CandidateList,
        semantic: &CandidateList,
        alpha: Alpha,
        k: usize,
    ) -> FusedResult;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// Position scoring
// ============================================================================

/// Score of 0-indexed position `i` in a list of length `n`: `1 - i/n`.
///
/// 1.0 for the top result, decaying linearly to `1/n` for the last one.
pub fn position_score(i: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    1.0 - i as f64 / n as f64
}

#[derive(Debug, Default)]
struct Accumulator {
    score: f64,
    lexical: Option<usize>,
    semantic: Option<usize>,
}

/// Add `weight * position_score` for every document of `list`.
///
/// A repeated identifier only counts at its first (best) position.
fn accumulate<F>(
    scores: &mut HashMap<DocId, Accumulator>,
    list: &CandidateList,
    weight: f64,
    slot: F,
) where
    F: Fn(&mut Accumulator) -> &mut Option<usize>,
{
    let n = list.len();
    for (i, candidate) in list.iter().enumerate() {
        let acc = scores.entry(candidate.id.clone()).or_default();
        let pos = slot(acc);
        if pos.is_some() {
            continue;
        }
        *pos = Some(i);
        acc.score += weight * position_score(i, n);
    }
}

/// Sort fused entries with deterministic tie-breaking.
///
/// Tie-breaking order:
/// 1. Fused score descending
/// 2. Lexical position ascending (absent last)
/// 3. Semantic position ascending (absent last)
/// 4. Identifier ascending
fn sort_fused(scored: &mut [(DocId, Accumulator)]) {
    scored.sort_by(|(id_a, a), (id_b, b)| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| position_key(a.lexical).cmp(&position_key(b.lexical)))
            .then_with(|| position_key(a.semantic).cmp(&position_key(b.semantic)))
            .then_with(|| id_a.cmp(id_b))
    });
}

fn position_key(pos: Option<usize>) -> usize {
    pos.unwrap_or(usize::MAX)
}

fn to_rank(pos: Option<usize>) -> Option<u32> {
    pos.map(|p| (p + 1) as u32)
}

/// Fuse two candidate lists by position score.
///
/// ```text
/// fused(d) = alpha     * posScore_lexical(d)    (0 if absent)
///          + (1-alpha) * posScore_semantic(d)   (0 if absent)
/// ```
///
/// Documents absent from both lists never appear. Both lists empty yields
/// an empty result.
pub fn fuse(
    lexical: &CandidateList,
    semantic: &CandidateList,
    alpha: Alpha,
    top_k: usize,
) -> FusedResult {
    let mut scores: HashMap<DocId, Accumulator> =
        HashMap::with_capacity(lexical.len() + semantic.len());
    accumulate(&mut scores, lexical, alpha.get(), |acc| &mut acc.lexical);
    accumulate(&mut scores, semantic, alpha.complement(), |acc| &mut acc.semantic);

    let mut scored: Vec<_> = scores.into_iter().collect();
    sort_fused(&mut scored);

    let truncated = scored.len() > top_k;
    let hits = scored
        .into_iter()
        .take(top_k)
        .map(|(id, acc)| FusedHit {
            id,
            score: acc.score,
            lexical_rank: to_rank(acc.lexical),
            semantic_rank: to_rank(acc.semantic),
        })
        .collect();
    FusedResult::new(hits, truncated)
}

// ============================================================================
// PositionFuser
// ============================================================================

/// Linear position-score fusion
///
/// Each backend list of length `n` awards `1 - i/n` to the document at
/// position `i`; the two awards are blended with weights `alpha` and
/// `1 - alpha`.
///
/// # Example
///
/// ```text
/// Given:
///   - Lexical:  [A, B, C]
///   - Semantic: [C, A, D]
///   - alpha = 0.5
///
/// Position scores:
///   lexical:  A=1.000 B=0.667 C=0.333
///   semantic: C=1.000 A=0.667 D=0.333
///
/// Fused:
///   A: 0.5*1.000 + 0.5*0.667 = 0.833
///   C: 0.5*0.333 + 0.5*1.000 = 0.667
///   B: 0.5*0.667             = 0.333
///   D:             0.5*0.333 = 0.167
///
/// Final ranking: [A, C, B, D]
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionFuser;

impl PositionFuser {
    /// Create a new PositionFuser
    pub fn new() -> Self {
        PositionFuser
    }
}

impl Fuser for PositionFuser {
    fn fuse(
        &self,
        lexical: &CandidateList,
        semantic: &CandidateList,
        alpha: Alpha,
        k: usize,
    ) -> FusedResult {
        fuse(lexical, semantic, alpha, k)
    }

    fn name(&self) -> &str {
        "position"
    }
}

// ============================================================================
// Tests
// ============================================================================
