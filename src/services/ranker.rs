use crate::error::{AppError, AppResult};

use super::tfidf::{TermWeightIndex, TermWeightVector};

/// A candidate film with its similarity to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub position: usize,
    pub score: f64,
}

/// Cosine similarity; zero when either vector has no weight
pub fn cosine_similarity(a: &TermWeightVector, b: &TermWeightVector) -> f64 {
    let denominator = a.norm() * b.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    a.dot(b) / denominator
}

/// Ranks every other film by similarity to the film at `query`
///
/// The query is excluded by position, so a different film with the same
/// synopsis still ranks first. Ties go to the lower catalog position.
pub fn rank(query: usize, index: &TermWeightIndex, k: usize) -> AppResult<Vec<ScoredCandidate>> {
    let query_vector = index
        .vector(query)
        .ok_or_else(|| AppError::NotFound(format!("No indexed film at position {}", query)))?;

    if k == 0 {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<ScoredCandidate> = index
        .vectors()
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != query)
        .map(|(position, vector)| ScoredCandidate {
            position,
            score: cosine_similarity(query_vector, vector),
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.position.cmp(&b.position))
    });
    candidates.truncate(k);

    Ok(candidates)
}
