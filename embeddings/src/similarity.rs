//! Similarity computation for embeddings.
//!
//! Ranking is a linear scan over every candidate. The catalog is small enough
//! that no index structure is kept, so there is nothing to invalidate when a
//! stored vector changes.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Compute the cosine similarity between two embeddings.
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 means identical direction
/// - 0.0 means orthogonal vectors
/// - -1.0 means opposite vectors
///
/// Vectors of different length, or with zero magnitude, score 0.0. That is a
/// "no match" answer rather than an error so a ranking pass never stops early.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot_product = 0.0f64;
    let mut magnitude_a = 0.0f64;
    let mut magnitude_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot_product += x * y;
        magnitude_a += x * x;
        magnitude_b += y * y;
    }

    let magnitude_a = magnitude_a.sqrt();
    let magnitude_b = magnitude_b.sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    // Rounding can push a self-comparison a hair past 1.0.
    (dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0) as f32
}

/// A ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult<K> {
    /// Key of the matched candidate.
    pub id: K,

    /// Cosine similarity against the query.
    pub score: f32,
}

/// Rank candidates against a query, best first, keeping at most `limit`.
///
/// Candidates with equal scores keep the order they were given in.
pub fn rank<K, V>(query: &[f32], candidates: &[(K, V)], limit: usize) -> Vec<SimilarityResult<K>>
where
    K: Clone,
    V: AsRef<[f32]>,
{
    if limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<SimilarityResult<K>> = candidates
        .iter()
        .map(|(id, embedding)| SimilarityResult {
            id: id.clone(),
            score: cosine_similarity(query, embedding.as_ref()),
        })
        .collect();

    // `sort_by_key` is stable, which is what keeps ties in input order.
    scored.sort_by_key(|result| Reverse(OrderedFloat(result.score)));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_self_similarity_is_one() {
        let v = vec![0.3, -1.7, 42.0, 0.001, -0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_is_symmetric() {
        let pairs = [
            (vec![1.0, 2.0, 3.0], vec![-4.0, 0.5, 2.0]),
            (vec![0.1, 0.1, 0.9], vec![0.9, 0.1, 0.1]),
            (vec![5.0, -3.0, 0.0], vec![5.0, 3.0, 0.0]),
        ];
        for (a, b) in &pairs {
            assert_eq!(cosine_similarity(a, b), cosine_similarity(b, a));
        }
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_rank_orders_by_score() {
        let query = vec![1.0, 0.0, 0.0];
        let candidates: Vec<(&str, Vec<f32>)> = vec![
            ("a", vec![1.0, 0.0, 0.0]), // similarity 1.0
            ("b", vec![0.0, 1.0, 0.0]), // similarity 0.0
            ("c", vec![0.7, 0.7, 0.0]), // similarity ~0.7
        ];

        let results = rank(&query, &candidates, 2);
        let ids: Vec<_> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_rank_respects_limit_and_is_non_increasing() {
        let query = vec![0.2, 0.9, -0.4];
        let candidates: Vec<(usize, Vec<f32>)> = (0..20)
            .map(|i| {
                let t = i as f32;
                (i, vec![t.sin(), t.cos(), (t * 0.5).sin()])
            })
            .collect();

        for limit in [0, 1, 5, 20, 50] {
            let results = rank(&query, &candidates, limit);
            assert!(results.len() <= limit);
            assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let query = vec![1.0, 0.0];
        let candidates: Vec<(u32, Vec<f32>)> = vec![
            (3, vec![0.0, 1.0]),
            (1, vec![2.0, 0.0]),
            (7, vec![0.0, 5.0]),
            (2, vec![1.0, 0.0]),
        ];

        let ids: Vec<_> = rank(&query, &candidates, 4).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 7]);
    }

    #[test]
    fn test_rank_limit_zero_is_empty() {
        let candidates: Vec<(&str, Vec<f32>)> = vec![("a", vec![1.0])];
        assert!(rank(&[1.0], &candidates, 0).is_empty());
    }
}
