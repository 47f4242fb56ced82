//! Information retrieval evaluation metrics.
//!
//! Pure functions of (relevant set, ordered retrieved identifiers). They
//! never look at fused scores, only at rank order, so results stay
//! comparable across fusion weights.
//!
//! - **AP**: average precision for one query
//! - **nDCG@K**: normalized discounted cumulative gain, binary relevance
//! - **mean**: corpus-level aggregation (MAP, mean nDCG)

use rankblend_core::DocId;
use std::collections::HashSet;

/// Average precision of one ranking.
///
/// Walks `retrieved` with 1-based rank `r`; every relevant hit adds
/// `hits_so_far / r`. The sum is divided by `|relevant|`.
///
/// Returns 0.0 when `relevant` is empty.
#[must_use]
pub fn average_precision(relevant: &HashSet<DocId>, retrieved: &[DocId]) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }

    let mut hits = 0usize;
    let mut sum_precision = 0.0;
    for (i, doc) in retrieved.iter().enumerate() {
        if relevant.contains(doc) {
            hits += 1;
            sum_precision += hits as f64 / (i + 1) as f64;
        }
    }

    sum_precision / relevant.len() as f64
}

/// Normalized Discounted Cumulative Gain at K.
///
/// Gain is 1 for a relevant document, 0 otherwise, discounted by
/// `log2(i + 2)` at 0-based position `i`. The ideal DCG places
/// `min(|relevant|, k)` relevant documents first.
///
/// Returns 0.0 when the ideal DCG is 0 (no relevant documents, or `k` is 0).
#[must_use]
pub fn ndcg_at_k(relevant: &HashSet<DocId>, retrieved: &[DocId], k: usize) -> f64 {
    let idcg: f64 = (0..relevant.len().min(k)).map(discount).sum();
    if idcg == 0.0 {
        return 0.0;
    }

    let dcg: f64 = retrieved
        .iter()
        .take(k)
        .enumerate()
        .filter(|(_, doc)| relevant.contains(*doc))
        .map(|(i, _)| discount(i))
        .sum();

    dcg / idcg
}

fn discount(i: usize) -> f64 {
    1.0 / (i as f64 + 2.0).log2()
}

/// Arithmetic mean; 0.0 for no values.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> HashSet<DocId> {
        ids.iter().map(|s| DocId::from(*s)).collect()
    }

    fn list(ids: &[&str]) -> Vec<DocId> {
        ids.iter().map(|s| DocId::from(*s)).collect()
    }

    // ─── Average precision ──────────────────────────────────────────────

    #[test]
    fn ap_single_hit_at_rank_two() {
        let ap = average_precision(&set(&["5678"]), &list(&["1234", "5678", "9101"]));
        assert!((ap - 0.5).abs() < 1e-12, "got {ap}");
    }

    #[test]
    fn ap_perfect_ranking_is_one() {
        let relevant = set(&["a", "b", "c"]);
        // Any order of the relevant docs, nothing irrelevant interleaved
        for retrieved in [list(&["a", "b", "c", "x"]), list(&["c", "a", "b"])] {
            let ap = average_precision(&relevant, &retrieved);
            assert!((ap - 1.0).abs() < 1e-12, "got {ap}");
        }
    }

    #[test]
    fn ap_penalizes_missing_relevant() {
        // Only one of two relevant docs retrieved, at rank 1
        let ap = average_precision(&set(&["a", "b"]), &list(&["a", "x"]));
        assert!((ap - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ap_mixed_ranking() {
        // Hits at ranks 1 and 3: (1/1 + 2/3) / 2
        let ap = average_precision(&set(&["a", "b"]), &list(&["a", "x", "b"]));
        assert!((ap - (1.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn ap_empty_relevant_is_zero() {
        assert_eq!(average_precision(&set(&[]), &list(&["a"])), 0.0);
    }

    #[test]
    fn ap_empty_retrieved_is_zero() {
        assert_eq!(average_precision(&set(&["a"]), &list(&[])), 0.0);
    }

    // ─── nDCG@K ─────────────────────────────────────────────────────────

    #[test]
    fn ndcg_no_relevant_retrieved_is_zero() {
        let score = ndcg_at_k(&set(&["a", "b"]), &list(&["x", "y", "z"]), 3);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn ndcg_ideal_order_is_one() {
        let score = ndcg_at_k(&set(&["a", "b"]), &list(&["a", "b", "x"]), 3);
        assert!((score - 1.0).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn ndcg_more_relevant_than_k() {
        // IDCG is capped at k positions, so a full top-2 is ideal
        let score = ndcg_at_k(&set(&["a", "b", "c"]), &list(&["b", "c", "x"]), 2);
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ndcg_rewards_earlier_hits() {
        let good = ndcg_at_k(&set(&["a"]), &list(&["a", "x", "y"]), 3);
        let bad = ndcg_at_k(&set(&["a"]), &list(&["x", "y", "a"]), 3);
        assert!(good > bad, "{good} vs {bad}");
        assert!((bad - 0.5).abs() < 1e-12, "log2(4) = 2, got {bad}");
    }

    #[test]
    fn ndcg_ignores_hits_past_k() {
        let score = ndcg_at_k(&set(&["a"]), &list(&["x", "y", "a"]), 2);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn ndcg_zero_k_or_empty_relevant() {
        assert_eq!(ndcg_at_k(&set(&["a"]), &list(&["a"]), 0), 0.0);
        assert_eq!(ndcg_at_k(&set(&[]), &list(&["a"]), 10), 0.0);
    }

    // ─── mean ───────────────────────────────────────────────────────────

    #[test]
    fn mean_of_values() {
        assert!((mean(&[0.5, 1.0, 0.0]) - 0.5).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }

    // ─── Properties ─────────────────────────────────────────────────────

    use proptest::collection::{hash_set, vec};
    use proptest::prelude::*;

    fn doc(n: u8) -> DocId {
        DocId::from(format!("d{n}"))
    }

    /// Relevant ids in a random order
    fn shuffled_relevant() -> impl Strategy<Value = Vec<u8>> {
        hash_set(0u8..30, 1..12)
            .prop_flat_map(|ids| Just(ids.into_iter().collect::<Vec<_>>()).prop_shuffle())
    }

    proptest! {
        #[test]
        fn metrics_stay_in_unit_interval(
            rel in hash_set(0u8..40, 0..15),
            raw in vec(0u8..40, 0..25),
            k in 0usize..30,
        ) {
            let relevant: HashSet<DocId> = rel.into_iter().map(doc).collect();
            let mut seen = HashSet::new();
            let retrieved: Vec<DocId> = raw
                .into_iter()
                .filter(|n| seen.insert(*n))
                .map(doc)
                .collect();

            let ap = average_precision(&relevant, &retrieved);
            let ndcg = ndcg_at_k(&relevant, &retrieved, k);
            prop_assert!((0.0..=1.0 + 1e-12).contains(&ap), "ap = {}", ap);
            prop_assert!((0.0..=1.0 + 1e-12).contains(&ndcg), "ndcg = {}", ndcg);
        }

        #[test]
        fn relevant_first_scores_perfectly(
            order in shuffled_relevant(),
            tail in vec(30u8..60, 0..10),
            k in 1usize..30,
        ) {
            let relevant: HashSet<DocId> = order.iter().copied().map(doc).collect();
            let retrieved: Vec<DocId> = order.into_iter().chain(tail).map(doc).collect();

            prop_assert!((average_precision(&relevant, &retrieved) - 1.0).abs() < 1e-9);
            prop_assert!((ndcg_at_k(&relevant, &retrieved, k) - 1.0).abs() < 1e-9);
        }
    }
}
