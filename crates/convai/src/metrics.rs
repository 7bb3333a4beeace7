//! Progress metrics extracted from a finished conversation's analysis.

use serde::Serialize;
use serde_json::Value;

/// Metrics recorded for one practice conversation. Every field is
/// optional: the agent's data-collection step may skip any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationMetrics {
    pub detected_errors: Option<String>,
    pub pronunciation_score: Option<f64>,
    pub correction_attempts: Option<i32>,
    pub duration_seconds: Option<i32>,
}

/// Pull metrics out of a conversation detail document.
///
/// Reads `analysis.data_collection_results.<field>.value` for the
/// collected fields and `metadata.call_duration_secs` for the duration.
pub fn extract_metrics(conversation: &Value) -> ConversationMetrics {
    let collected = |field: &str| {
        conversation
            .pointer(&format!("/analysis/data_collection_results/{field}/value"))
            .filter(|v| !v.is_null())
    };

    ConversationMetrics {
        detected_errors: collected("detected_errors").and_then(as_text),
        pronunciation_score: collected("pronunciation_score").and_then(as_f64),
        correction_attempts: collected("correction_attempts")
            .and_then(as_f64)
            .and_then(to_count),
        duration_seconds: conversation
            .pointer("/metadata/call_duration_secs")
            .and_then(as_f64)
            .and_then(to_count),
    }
}

/// Strings pass through, lists are joined with `", "`, scalars are
/// stringified.
fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(as_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

/// Numbers, or strings holding a number.
fn as_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

/// Counts and durations are never negative; anything else is dropped.
fn to_count(value: f64) -> Option<i32> {
    let rounded = value.round();
    (rounded >= 0.0 && rounded <= i32::MAX as f64).then_some(rounded as i32)
}
