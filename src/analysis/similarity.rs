//! Player similarity engine.
//!
//! Players are compared as fixed-order vectors of their per-zone shooting
//! percentages (canonical zone order, 0.0 for zones with no data). Two
//! methods: cosine similarity and a distance-based score from normalized
//! Euclidean distance.

use std::collections::BTreeMap;
use std::str::FromStr;
use thiserror::Error;

use crate::zones::ZoneName;

/// Vector length; one component per canonical zone.
pub const VECTOR_LEN: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("unknown similarity method '{0}' (expected 'cosine' or 'euclidean')")]
    UnknownMethod(String),
    #[error("player '{0}' not found")]
    PlayerNotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMethod {
    Cosine,
    Euclidean,
}

impl FromStr for SimilarityMethod {
    type Err = SimilarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(SimilarityMethod::Cosine),
            "euclidean" => Ok(SimilarityMethod::Euclidean),
            other => Err(SimilarityError::UnknownMethod(other.to_string())),
        }
    }
}

/// Projects a percentage map onto the canonical zone order, 0.0 for any
/// missing zone.
pub fn vector(percentages: &BTreeMap<ZoneName, f64>) -> [f64; VECTOR_LEN] {
    let mut v = [0.0; VECTOR_LEN];
    for (i, zone) in ZoneName::ALL.into_iter().enumerate() {
        v[i] = percentages.get(&zone).copied().unwrap_or(0.0);
    }
    v
}

/// Pairwise similarity in [0, 1] (cosine can exceed on rounding, never in
/// exact arithmetic, since components are nonnegative).
pub fn similarity(a: &[f64; VECTOR_LEN], b: &[f64; VECTOR_LEN], method: SimilarityMethod) -> f64 {
    match method {
        SimilarityMethod::Cosine => cosine(a, b),
        SimilarityMethod::Euclidean => euclidean(a, b),
    }
}

/// Standard cosine similarity; 0.0 when either vector is all-zero, which
/// also avoids the division by zero.
fn cosine(a: &[f64; VECTOR_LEN], b: &[f64; VECTOR_LEN]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Euclidean distance normalized by the maximum possible distance for
/// components in [0, 100], flipped into a similarity and floored at 0.
fn euclidean(a: &[f64; VECTOR_LEN], b: &[f64; VECTOR_LEN]) -> f64 {
    let distance: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt();
    let max_distance = (VECTOR_LEN as f64 * 100.0f64.powi(2)).sqrt();
    (1.0 - distance / max_distance).max(0.0)
}

/// Ranks all other players by similarity to the target, descending, stable
/// tie-break by the input map's iteration order, truncated to `top_n`.
pub fn top_similar(
    target: &str,
    players: &BTreeMap<String, BTreeMap<ZoneName, f64>>,
    top_n: usize,
    method: SimilarityMethod,
    exclude_self: bool,
) -> Result<Vec<(String, f64)>, SimilarityError> {
    let target_percentages = players
        .get(target)
        .ok_or_else(|| SimilarityError::PlayerNotFound(target.to_string()))?;
    let target_vector = vector(target_percentages);

    let mut scores: Vec<(String, f64)> = Vec::new();
    for (name, percentages) in players {
        if exclude_self && name == target {
            continue;
        }
        let score = similarity(&target_vector, &vector(percentages), method);
        scores.push((name.clone(), score));
    }

    // sort_by is stable, so ties keep iteration order
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));
    scores.truncate(top_n);
    Ok(scores)
}

/// Full pairwise similarity matrix plus the row/column name order. The
/// diagonal is exactly 1.0 for every method.
pub fn similarity_matrix(
    players: &BTreeMap<String, BTreeMap<ZoneName, f64>>,
    method: SimilarityMethod,
) -> (Vec<Vec<f64>>, Vec<String>) {
    let names: Vec<String> = players.keys().cloned().collect();
    let vectors: Vec<[f64; VECTOR_LEN]> = players.values().map(vector).collect();

    let n = names.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            matrix[i][j] = if i == j {
                1.0
            } else {
                similarity(&vectors[i], &vectors[j], method)
            };
        }
    }

    (matrix, names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentages(values: &[(ZoneName, f64)]) -> BTreeMap<ZoneName, f64> {
        values.iter().copied().collect()
    }

    fn uniform(value: f64) -> BTreeMap<ZoneName, f64> {
        ZoneName::ALL.into_iter().map(|z| (z, value)).collect()
    }

    #[test]
    fn test_vector_length_and_range() {
        let v = vector(&uniform(55.0));
        assert_eq!(v.len(), VECTOR_LEN);
        assert!(v.iter().all(|&x| (0.0..=100.0).contains(&x)));
    }

    #[test]
    fn test_vector_missing_zones_are_zero() {
        let v = vector(&percentages(&[(ZoneName::Paint, 70.0)]));
        assert_eq!(v[9], 70.0); // Paint is last in canonical order
        assert_eq!(v.iter().filter(|&&x| x == 0.0).count(), 9);
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let v = vector(&uniform(42.0));
        assert!((similarity(&v, &v, SimilarityMethod::Cosine) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        let zero = [0.0; VECTOR_LEN];
        let v = vector(&uniform(42.0));
        assert_eq!(similarity(&zero, &v, SimilarityMethod::Cosine), 0.0);
        assert_eq!(similarity(&v, &zero, SimilarityMethod::Cosine), 0.0);
        assert_eq!(similarity(&zero, &zero, SimilarityMethod::Cosine), 0.0);
    }

    #[test]
    fn test_euclidean_identical_vectors() {
        let v = vector(&uniform(42.0));
        assert_eq!(similarity(&v, &v, SimilarityMethod::Euclidean), 1.0);
    }

    #[test]
    fn test_euclidean_maximal_distance_is_zero() {
        let zero = [0.0; VECTOR_LEN];
        let hundred = [100.0; VECTOR_LEN];
        assert_eq!(similarity(&zero, &hundred, SimilarityMethod::Euclidean), 0.0);
    }

    #[test]
    fn test_euclidean_normalization() {
        // One component differs by 100: distance 100, max sqrt(10)*100
        let mut a = [0.0; VECTOR_LEN];
        a[0] = 100.0;
        let b = [0.0; VECTOR_LEN];
        let expected = 1.0 - 1.0 / (10.0f64).sqrt();
        assert!(
            (similarity(&a, &b, SimilarityMethod::Euclidean) - expected).abs() < 1e-12
        );
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("cosine".parse::<SimilarityMethod>(), Ok(SimilarityMethod::Cosine));
        assert_eq!(
            "Euclidean".parse::<SimilarityMethod>(),
            Ok(SimilarityMethod::Euclidean)
        );
        assert_eq!(
            "manhattan".parse::<SimilarityMethod>(),
            Err(SimilarityError::UnknownMethod("manhattan".to_string()))
        );
    }

    #[test]
    fn test_top_similar_orders_descending() {
        let mut players = BTreeMap::new();
        players.insert("Target".to_string(), uniform(50.0));
        players.insert("Close".to_string(), uniform(48.0));
        players.insert("Far".to_string(), uniform(10.0));

        let top = top_similar("Target", &players, 5, SimilarityMethod::Euclidean, true).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "Close");
        assert_eq!(top[1].0, "Far");
        assert!(top[0].1 > top[1].1);
    }

    #[test]
    fn test_top_similar_excludes_self_and_truncates() {
        let mut players = BTreeMap::new();
        players.insert("Target".to_string(), uniform(50.0));
        players.insert("A".to_string(), uniform(40.0));
        players.insert("B".to_string(), uniform(45.0));
        players.insert("C".to_string(), uniform(30.0));

        let top = top_similar("Target", &players, 2, SimilarityMethod::Euclidean, true).unwrap();
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|(name, _)| name != "Target"));

        let with_self =
            top_similar("Target", &players, 10, SimilarityMethod::Euclidean, false).unwrap();
        assert_eq!(with_self[0].0, "Target");
        assert_eq!(with_self[0].1, 1.0);
    }

    #[test]
    fn test_top_similar_tie_break_is_iteration_order() {
        // Identical profiles tie exactly; name order (the map's iteration
        // order) decides
        let mut players = BTreeMap::new();
        players.insert("Target".to_string(), uniform(50.0));
        players.insert("Zed".to_string(), uniform(40.0));
        players.insert("Abe".to_string(), uniform(40.0));

        let top = top_similar("Target", &players, 5, SimilarityMethod::Euclidean, true).unwrap();
        assert_eq!(top[0].0, "Abe");
        assert_eq!(top[1].0, "Zed");
    }

    #[test]
    fn test_top_similar_missing_target() {
        let players = BTreeMap::new();
        let err = top_similar("Ghost", &players, 5, SimilarityMethod::Cosine, true).unwrap_err();
        assert_eq!(err, SimilarityError::PlayerNotFound("Ghost".to_string()));
    }

    #[test]
    fn test_matrix_diagonal_is_exactly_one_for_both_methods() {
        let mut players = BTreeMap::new();
        players.insert("A".to_string(), uniform(50.0));
        players.insert("B".to_string(), percentages(&[(ZoneName::Paint, 80.0)]));
        // An all-zero player would make cosine self-similarity undefined;
        // the diagonal is pinned to 1.0 anyway
        players.insert("C".to_string(), BTreeMap::new());

        for method in [SimilarityMethod::Cosine, SimilarityMethod::Euclidean] {
            let (matrix, names) = similarity_matrix(&players, method);
            assert_eq!(names, vec!["A", "B", "C"]);
            for i in 0..names.len() {
                assert_eq!(matrix[i][i], 1.0);
            }
        }
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let mut players = BTreeMap::new();
        players.insert("A".to_string(), uniform(50.0));
        players.insert("B".to_string(), uniform(30.0));

        let (matrix, _) = similarity_matrix(&players, SimilarityMethod::Cosine);
        assert!((matrix[0][1] - matrix[1][0]).abs() < 1e-12);
    }
}
