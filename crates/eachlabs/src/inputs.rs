//! Per-model provider input shaping.
//!
//! Each supported model takes the same prompt/count fields plus a fixed set
//! of model-specific options. This is a lookup table, not business logic;
//! the option values must match what the provider expects for each model,
//! so they change only in lockstep with the provider's documentation.

use serde_json::{json, Value};

/// Build the `input` object for a prediction request.
pub fn build_input(provider_model_id: &str, prompt: &str, output_count: i32) -> Value {
    let mut input = json!({
        "prompt": prompt,
        "num_images": output_count,
        "sync_mode": false,
    });

    match provider_model_id {
        "nano-banana" => {
            input["output_format"] = json!("png");
            input["aspect_ratio"] = json!("1:1");
            input["limit_generations"] = json!(true);
        }
        "seedream-v4-text-to-image" => {
            input["image_size"] = json!("square_hd");
            input["enable_safety_checker"] = json!(true);
        }
        "reve-text-to-image" => {
            input["aspect_ratio"] = json!("1:1");
            input["output_format"] = json!("png");
        }
        _ => {}
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_models_carry_common_fields() {
        for model in [
            "nano-banana",
            "seedream-v4-text-to-image",
            "reve-text-to-image",
        ] {
            let input = build_input(model, "a logo", 2);
            assert_eq!(input["prompt"], "a logo");
            assert_eq!(input["num_images"], 2);
            assert_eq!(input["sync_mode"], false);
        }
    }

    #[test]
    fn nano_banana_options() {
        let input = build_input("nano-banana", "p", 1);
        assert_eq!(input["output_format"], "png");
        assert_eq!(input["aspect_ratio"], "1:1");
        assert_eq!(input["limit_generations"], true);
        assert!(input.get("image_size").is_none());
    }

    #[test]
    fn seedream_options() {
        let input = build_input("seedream-v4-text-to-image", "p", 1);
        assert_eq!(input["image_size"], "square_hd");
        assert_eq!(input["enable_safety_checker"], true);
        assert!(input.get("aspect_ratio").is_none());
    }

    #[test]
    fn reve_options() {
        let input = build_input("reve-text-to-image", "p", 1);
        assert_eq!(input["aspect_ratio"], "1:1");
        assert_eq!(input["output_format"], "png");
        assert!(input.get("enable_safety_checker").is_none());
    }
}
