//! Confidence scoring over the matches that passed the similarity gate

use crate::providers::vector_store::VectorMatch;
use crate::types::Confidence;

/// Mean score required for `high`
pub const HIGH_MEAN: f64 = 0.85;
/// Matches required for `high`
pub const HIGH_COUNT: usize = 3;
/// Mean score required for `medium`
pub const MEDIUM_MEAN: f64 = 0.75;
/// Matches required for `medium`
pub const MEDIUM_COUNT: usize = 2;

/// Arithmetic mean of match scores, `None` for an empty set.
///
/// Accumulated in f64 so that equal f32 inputs at a tier boundary compare as
/// their written values.
pub fn mean_score(matches: &[VectorMatch]) -> Option<f64> {
    if matches.is_empty() {
        return None;
    }
    let sum: f64 = matches.iter().map(|m| m.score as f64).sum();
    Some(sum / matches.len() as f64)
}

/// Label a filtered match set
pub fn score(matches: &[VectorMatch]) -> Confidence {
    match mean_score(matches) {
        None => Confidence::None,
        Some(mean) => tier(mean, matches.len()),
    }
}

/// Tier for a given mean and count
pub fn tier(mean: f64, count: usize) -> Confidence {
    if count == 0 {
        Confidence::None
    } else if mean >= HIGH_MEAN && count >= HIGH_COUNT {
        Confidence::High
    } else if mean >= MEDIUM_MEAN && count >= MEDIUM_COUNT {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}
