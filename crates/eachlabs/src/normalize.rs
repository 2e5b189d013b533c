//! Normalization of provider response payloads.
//!
//! The provider's response shape varies: the prediction id may sit at the
//! root or under a nested `prediction` object, and the image list may be
//! keyed `output` or `images` with entries that are not always strings.
//! These functions give that duck-typed payload one typed reading, with a
//! fixed precedence order.

use serde_json::Value;

use logoloco_core::status::GenerationStatus;

/// Normalized result of a prediction submission.
#[derive(Debug, Clone)]
pub struct ProviderSubmission {
    /// Provider correlation id; `None` when the payload carried none, in
    /// which case the caller falls back to its internal generation id.
    pub prediction_id: Option<String>,
    pub status: GenerationStatus,
    pub images: Vec<String>,
    /// The raw payload, captured for diagnostics.
    pub raw: Value,
}

/// Normalized result of a status poll.
#[derive(Debug, Clone)]
pub struct ProviderStatusResult {
    pub status: GenerationStatus,
    pub images: Vec<String>,
    pub raw: Value,
}

/// Extract the prediction id: root `id` first, then nested `prediction.id`.
pub fn extract_prediction_id(raw: &Value) -> Option<String> {
    if let Some(id) = raw.get("id").and_then(Value::as_str) {
        return Some(id.to_string());
    }
    raw.get("prediction")
        .and_then(|p| p.get("id"))
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

/// Extract the image list: the `output` key first, then `images`.
///
/// Non-string entries are serialized to their JSON text form rather than
/// dropped, so a provider that returns objects still yields one entry per
/// generated image.
pub fn extract_images(raw: &Value) -> Vec<String> {
    let candidate = raw.get("output").or_else(|| raw.get("images"));
    let Some(Value::Array(items)) = candidate else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

/// Normalize a submission response.
///
/// When the payload carries no `status` field, the presence of at least one
/// image decides between `succeeded` and `running`; a prediction without
/// output is still in flight and a later poll settles it.
pub fn normalize_submission(raw: Value) -> ProviderSubmission {
    let prediction_id = extract_prediction_id(&raw);
    let images = extract_images(&raw);
    let status = match raw.get("status").and_then(Value::as_str) {
        Some(s) => GenerationStatus::from_provider(s),
        None if images.is_empty() => GenerationStatus::Running,
        None => GenerationStatus::Succeeded,
    };
    ProviderSubmission {
        prediction_id,
        status,
        images,
        raw,
    }
}

/// Normalize a status-poll response.
pub fn normalize_status(raw: Value) -> ProviderStatusResult {
    let images = extract_images(&raw);
    let status = raw
        .get("status")
        .and_then(Value::as_str)
        .map(GenerationStatus::from_provider)
        .unwrap_or(GenerationStatus::Running);
    ProviderStatusResult {
        status,
        images,
        raw,
    }
}
