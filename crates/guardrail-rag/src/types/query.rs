//! Query request types

use serde::{Deserialize, Serialize};

use crate::config::GuardRailConfig;

/// Bounds for `max_results`
pub const MAX_RESULTS_RANGE: std::ops::RangeInclusive<usize> = 1..=20;

/// Query request as received on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    #[serde(default)]
    pub query: String,

    /// Number of matches to retrieve (1-20)
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Minimum similarity score (0.0-1.0)
    #[serde(default)]
    pub similarity_threshold: Option<f32>,
}

impl QueryRequest {
    /// Create a new request with default bounds
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: None,
            similarity_threshold: None,
        }
    }

    /// Set the number of matches to retrieve
    pub fn with_max_results(mut self, k: usize) -> Self {
        self.max_results = Some(k);
        self
    }

    /// Set the similarity threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = Some(threshold);
        self
    }

    /// Normalize into a [`Query`]: trim the text, fill defaults and clamp bounds.
    ///
    /// Out-of-range values are clamped rather than rejected so that the
    /// pipeline always produces a result.
    pub fn normalize(&self, defaults: &GuardRailConfig) -> Query {
        let requested_k = self.max_results.unwrap_or(defaults.default_max_results);
        let max_results = requested_k.clamp(*MAX_RESULTS_RANGE.start(), *MAX_RESULTS_RANGE.end());
        if max_results != requested_k {
            tracing::warn!("max_results {} out of range, clamped to {}", requested_k, max_results);
        }

        let requested_threshold = self
            .similarity_threshold
            .unwrap_or(defaults.default_similarity_threshold);
        let similarity_threshold = if requested_threshold.is_nan() {
            tracing::warn!("similarity_threshold is NaN, using default");
            defaults.default_similarity_threshold.clamp(0.0, 1.0)
        } else {
            requested_threshold.clamp(0.0, 1.0)
        };
        if similarity_threshold != requested_threshold && !requested_threshold.is_nan() {
            tracing::warn!(
                "similarity_threshold {} out of range, clamped to {}",
                requested_threshold,
                similarity_threshold
            );
        }

        Query {
            text: self.query.trim().to_string(),
            max_results,
            similarity_threshold,
        }
    }
}

/// A normalized query: trimmed text and in-range bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Trimmed query text (may be empty)
    pub text: String,
    /// Number of matches to retrieve, within 1-20
    pub max_results: usize,
    /// Minimum similarity score, within 0.0-1.0
    pub similarity_threshold: f32,
}

impl Query {
    /// Length of the normalized text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
