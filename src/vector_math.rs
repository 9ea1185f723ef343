use std::cmp::Ordering;

use ndarray::ArrayView1;

use crate::core::errors::AppError;

pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> Result<f32, AppError> {
    if query.is_empty() || candidate.is_empty() {
        return Err(AppError::BadRequest(
            "Vectors must not be empty".to_string(),
        ));
    }
    if query.len() != candidate.len() {
        return Err(AppError::BadRequest(format!(
            "Vector length mismatch: {} != {}",
            query.len(),
            candidate.len()
        )));
    }

    let query_view = ArrayView1::from(query);
    let candidate_view = ArrayView1::from(candidate);

    let dot = query_view.dot(&candidate_view);
    let query_norm = query_view.dot(&query_view).sqrt();
    let candidate_norm = candidate_view.dot(&candidate_view).sqrt();

    let denom = query_norm * candidate_norm;
    if denom <= f32::EPSILON {
        return Ok(0.0);
    }

    Ok((dot / denom).clamp(-1.0, 1.0))
}

/// Ranks candidates by cosine similarity to the query, best first.
///
/// The sort is stable, so candidates with equal scores keep their original
/// index order.
pub fn rank_descending_by_cosine(
    query: &[f32],
    candidates: &[Vec<f32>],
) -> Result<Vec<(usize, f32)>, AppError> {
    let mut scores = Vec::with_capacity(candidates.len());
    for (idx, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate)?;
        scores.push((idx, score));
    }

    scores.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    Ok(scores)
}
