//! Validation and defaulting of loosely typed generation requests.
//!
//! Clients send whatever their form produced: numbers as strings, zeros for
//! "unset", camelCase or snake_case keys. Every coercion rule lives here so
//! providers only ever see a [`GenerationRequest`].

use serde_json::Value;

use crate::types::{
    GenerationRequest, RequestDefaults, DEFAULT_CFG_SCALE, DEFAULT_DIMENSION, DEFAULT_STEPS,
};
use crate::GenerationError;

pub const PROMPT_REQUIRED: &str = "prompt is required";

/// Turn a raw JSON payload into a normalized request.
///
/// Fails with [`GenerationError::InvalidInput`] when `prompt` is missing,
/// empty, or not a string. Every other field falls back to its default when
/// absent, zero, empty, or not coercible.
pub fn normalize(raw: &Value, defaults: &RequestDefaults) -> Result<GenerationRequest, GenerationError> {
    let prompt = match field(raw, &["prompt"]) {
        Some(Value::String(prompt)) if !prompt.is_empty() => prompt.clone(),
        _ => return Err(GenerationError::invalid_input(PROMPT_REQUIRED)),
    };

    let width = field(raw, &["width"]).and_then(coerce_u32);
    let height = field(raw, &["height"]).and_then(coerce_u32);

    Ok(GenerationRequest {
        prompt,
        negative_prompt: field(raw, &["negative_prompt", "negativePrompt"])
            .and_then(coerce_string)
            .unwrap_or_default(),
        model: field(raw, &["model"])
            .and_then(coerce_string)
            .unwrap_or_else(|| defaults.model.clone()),
        steps: field(raw, &["steps"])
            .and_then(coerce_u32)
            .unwrap_or(DEFAULT_STEPS),
        cfg_scale: field(raw, &["cfg_scale", "cfgScale"])
            .and_then(coerce_f64)
            .filter(|scale| *scale != 0.0)
            .unwrap_or(DEFAULT_CFG_SCALE),
        width: width.unwrap_or(DEFAULT_DIMENSION),
        height: height.unwrap_or(DEFAULT_DIMENSION),
        seed: field(raw, &["seed"]).and_then(coerce_i64),
        sampler: field(raw, &["sampler"])
            .and_then(coerce_string)
            .unwrap_or_else(|| defaults.sampler.clone()),
        dimensions_supplied: width.is_some() || height.is_some(),
    })
}

/// First non-null value under any of the given keys.
fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = raw.as_object()?;
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Numbers and numeric strings; anything non-finite is rejected.
fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Positive integers; fractions truncate toward zero, zero and negatives are "unset".
fn coerce_u32(value: &Value) -> Option<u32> {
    let number = coerce_f64(value)?.trunc();
    (number >= 1.0 && number <= u32::MAX as f64).then(|| number as u32)
}

/// Seeds keep zero; only absence or garbage means "unset".
fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(f64_to_i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(f64_to_i64))
        }
        _ => None,
    }
}

fn f64_to_i64(number: f64) -> Option<i64> {
    let number = number.trunc();
    (number.is_finite() && number >= i64::MIN as f64 && number <= i64::MAX as f64)
        .then(|| number as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn defaults() -> RequestDefaults {
        RequestDefaults::new("banana-v3", "euler_a")
    }

    #[test]
    fn test_missing_prompt_is_invalid() {
        for raw in [
            json!({}),
            json!({ "prompt": "" }),
            json!({ "prompt": 42 }),
            json!({ "prompt": null }),
            json!({ "prompt": ["a", "b"] }),
            json!("just a string"),
            json!([]),
        ] {
            let err = normalize(&raw, &defaults()).unwrap_err();
            assert!(
                matches!(&err, GenerationError::InvalidInput(msg) if msg == PROMPT_REQUIRED),
                "expected InvalidInput for {raw}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_defaults_applied() {
        let request = normalize(&json!({ "prompt": "a banana spaceship" }), &defaults()).unwrap();

        assert_eq!(request.prompt, "a banana spaceship");
        assert_eq!(request.negative_prompt, "");
        assert_eq!(request.model, "banana-v3");
        assert_eq!(request.steps, 28);
        assert_eq!(request.cfg_scale, 7.0);
        assert_eq!(request.width, 512);
        assert_eq!(request.height, 512);
        assert_eq!(request.seed, None);
        assert_eq!(request.sampler, "euler_a");
        assert!(!request.dimensions_supplied);
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let raw = json!({
            "prompt": "p",
            "steps": "40",
            "cfg_scale": " 7.5 ",
            "width": "1024",
            "height": 768,
            "seed": "1234"
        });
        let request = normalize(&raw, &defaults()).unwrap();

        assert_eq!(request.steps, 40);
        assert_eq!(request.cfg_scale, 7.5);
        assert_eq!(request.width, 1024);
        assert_eq!(request.height, 768);
        assert_eq!(request.seed, Some(1234));
        assert!(request.dimensions_supplied);
    }

    #[test]
    fn test_falsy_and_garbage_fall_back() {
        let raw = json!({
            "prompt": "p",
            "model": "",
            "steps": 0,
            "cfg_scale": "lots",
            "width": -64,
            "height": true,
            "sampler": 3,
            "negative_prompt": 12
        });
        let request = normalize(&raw, &defaults()).unwrap();

        assert_eq!(request.model, "banana-v3");
        assert_eq!(request.steps, 28);
        assert_eq!(request.cfg_scale, 7.0);
        assert_eq!(request.width, 512);
        assert_eq!(request.height, 512);
        assert_eq!(request.sampler, "euler_a");
        assert_eq!(request.negative_prompt, "");
        assert!(!request.dimensions_supplied);
    }

    #[test]
    fn test_seed_absent_vs_zero() {
        let absent = normalize(&json!({ "prompt": "p" }), &defaults()).unwrap();
        assert_eq!(absent.seed, None);

        let empty = normalize(&json!({ "prompt": "p", "seed": "" }), &defaults()).unwrap();
        assert_eq!(empty.seed, None);

        let zero = normalize(&json!({ "prompt": "p", "seed": 0 }), &defaults()).unwrap();
        assert_eq!(zero.seed, Some(0));
    }

    #[test]
    fn test_large_seed_keeps_precision() {
        let raw = json!({ "prompt": "p", "seed": 9_007_199_254_740_993_i64 });
        let request = normalize(&raw, &defaults()).unwrap();
        assert_eq!(request.seed, Some(9_007_199_254_740_993));
    }

    #[test]
    fn test_camel_case_aliases() {
        let raw = json!({ "prompt": "p", "negativePrompt": "blurry", "cfgScale": 12 });
        let request = normalize(&raw, &defaults()).unwrap();

        assert_eq!(request.negative_prompt, "blurry");
        assert_eq!(request.cfg_scale, 12.0);
    }

    #[test]
    fn test_fractional_steps_truncate() {
        let request = normalize(&json!({ "prompt": "p", "steps": 30.9 }), &defaults()).unwrap();
        assert_eq!(request.steps, 30);
    }

    #[test]
    fn test_single_dimension_counts_as_supplied() {
        let request = normalize(&json!({ "prompt": "p", "height": 1024 }), &defaults()).unwrap();
        assert_eq!(request.width, 512);
        assert_eq!(request.height, 1024);
        assert!(request.dimensions_supplied);
    }
}
