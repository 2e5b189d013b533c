//! Model catalog, request validation, and prompt construction for logo
//! generation.
//!
//! The catalog is a fixed mapping from the short model names the client
//! sends to the identifiers the provider expects. Pricing is one credit per
//! requested output image.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Model catalog
// ---------------------------------------------------------------------------

/// Short model names accepted from clients.
pub const MODEL_NANO_BANANA: &str = "nano-banana";
pub const MODEL_SEEDREAM_V4: &str = "seedream-v4";
pub const MODEL_REVE_TEXT: &str = "reve-text";

/// All model names accepted by the create-generation endpoint.
pub const VALID_MODELS: &[&str] = &[MODEL_NANO_BANANA, MODEL_SEEDREAM_V4, MODEL_REVE_TEXT];

/// Resolve a client model name to the provider's model identifier.
pub fn provider_model_id(model: &str) -> Option<&'static str> {
    match model {
        MODEL_NANO_BANANA => Some("nano-banana"),
        MODEL_SEEDREAM_V4 => Some("seedream-v4-text-to-image"),
        MODEL_REVE_TEXT => Some("reve-text-to-image"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Output count and pricing
// ---------------------------------------------------------------------------

/// Minimum images per generation request.
pub const MIN_OUTPUT_COUNT: i32 = 1;
/// Maximum images per generation request.
pub const MAX_OUTPUT_COUNT: i32 = 4;

/// Clamp a requested output count into the allowed range.
///
/// A missing value defaults to one image.
pub fn clamp_output_count(requested: Option<i32>) -> i32 {
    requested
        .unwrap_or(MIN_OUTPUT_COUNT)
        .clamp(MIN_OUTPUT_COUNT, MAX_OUTPUT_COUNT)
}

/// Credits charged for a generation: one credit per output image.
pub fn credits_required(output_count: i32) -> i32 {
    output_count
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Minimum length for the app name and focus fields.
pub const MIN_NAME_LENGTH: usize = 2;

/// Validate the descriptive fields of a create-generation request.
///
/// Mirrors the constraints enforced at the API boundary: name and focus must
/// carry at least two characters, both colors must be non-empty, and the
/// model must come from the catalog.
pub fn validate_generation_request(
    app_name: &str,
    app_focus: &str,
    color1: &str,
    color2: &str,
    model: &str,
) -> Result<(), CoreError> {
    if app_name.trim().len() < MIN_NAME_LENGTH {
        return Err(CoreError::Validation(
            "app_name must be at least 2 characters".to_string(),
        ));
    }
    if app_focus.trim().len() < MIN_NAME_LENGTH {
        return Err(CoreError::Validation(
            "app_focus must be at least 2 characters".to_string(),
        ));
    }
    if color1.trim().is_empty() || color2.trim().is_empty() {
        return Err(CoreError::Validation(
            "color1 and color2 must not be empty".to_string(),
        ));
    }
    if !VALID_MODELS.contains(&model) {
        return Err(CoreError::Validation(format!(
            "Invalid model '{model}'. Must be one of: {}",
            VALID_MODELS.join(", ")
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the provider prompt for an app-icon generation.
///
/// The wording is load-bearing: it is what produces the consistent icon
/// style across all three models, so it changes only deliberately.
pub fn build_prompt(app_name: &str, app_focus: &str, color1: &str, color2: &str) -> String {
    format!(
        "Design an iOS 16–ready, minimalist, and modern app icon for {app_name}. \
         Use a softly rounded square background with a sophisticated gradient that \
         blends {color1} and {color2}. Center a clean, easily recognizable symbol \
         that represents {app_focus}, with subtle depth via gentle shadow and light \
         effects. If including text, weave the app name or initials in a sleek, \
         highly legible way. The icon must remain crisp and recognizable at every \
         size on a plain white background."
    )
}
