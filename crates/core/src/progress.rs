//! Learner progress summaries computed from stored conversation metrics.

use std::collections::HashMap;

use serde::Serialize;

/// How many recurring errors a summary reports.
pub const TOP_ERROR_COUNT: usize = 3;

/// The subset of a stored metrics row that feeds a summary.
#[derive(Debug, Clone, Default)]
pub struct MetricSample {
    pub detected_errors: Option<String>,
    pub pronunciation_score: Option<f64>,
    pub correction_attempts: Option<i32>,
    pub duration_seconds: Option<i32>,
}

/// Aggregated progress across all of a learner's conversations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub conversations: usize,
    pub total_duration_secs: i64,
    /// Mean over samples that carry a score; `None` when none do.
    pub average_pronunciation_score: Option<f64>,
    pub total_correction_attempts: i64,
    pub common_errors: Vec<ErrorFrequency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorFrequency {
    pub error: String,
    pub count: usize,
}

/// Build a [`ProgressSummary`] from metric samples.
pub fn summarize(samples: &[MetricSample]) -> ProgressSummary {
    let total_duration_secs = samples
        .iter()
        .filter_map(|s| s.duration_seconds)
        .map(i64::from)
        .sum();

    let total_correction_attempts = samples
        .iter()
        .filter_map(|s| s.correction_attempts)
        .map(i64::from)
        .sum();

    let scores: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.pronunciation_score)
        .collect();
    let average_pronunciation_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    ProgressSummary {
        conversations: samples.len(),
        total_duration_secs,
        average_pronunciation_score,
        total_correction_attempts,
        common_errors: most_common_errors(samples, TOP_ERROR_COUNT),
    }
}

/// Split a free-text error list into normalised entries.
///
/// Entries are separated by commas, semicolons or newlines, trimmed and
/// lowercased. Empty entries are dropped.
pub fn split_errors(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split([',', ';', '\n'])
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

/// Rank errors by frequency, breaking ties alphabetically.
fn most_common_errors(samples: &[MetricSample], limit: usize) -> Vec<ErrorFrequency> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for raw in samples.iter().filter_map(|s| s.detected_errors.as_deref()) {
        for error in split_errors(raw) {
            *counts.entry(error).or_default() += 1;
        }
    }

    let mut ranked: Vec<ErrorFrequency> = counts
        .into_iter()
        .map(|(error, count)| ErrorFrequency { error, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.error.cmp(&b.error)));
    ranked.truncate(limit);
    ranked
}
