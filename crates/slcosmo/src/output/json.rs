//! JSON serialization for inference results.

use crate::result::InferenceResult;

/// Serialize an `InferenceResult` to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails. Non-finite floats (for example a
/// `-inf` log-likelihood) are written as `null`.
pub fn to_json(result: &InferenceResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize an `InferenceResult` to a pretty-printed JSON string.
pub fn to_json_pretty(result: &InferenceResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
