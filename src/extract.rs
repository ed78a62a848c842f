//! Locating the image in a provider response.
//!
//! Providers disagree on where the image lives. Candidates are tried in a
//! fixed order and the first non-empty value wins.

use serde_json::Value;

use crate::types::ImageReference;

type Candidate = fn(&Value) -> Option<ImageReference>;

const CANDIDATES: &[(&str, Candidate)] = &[
    ("image_base64", inline_base64_field),
    ("image_url", remote_url_field),
    ("data[].url", result_array_url),
    ("candidates[0].content.parts[]", conversational_inline_part),
    ("images[0]", images_array_bytes),
];

/// Pull a displayable image reference out of a provider response body.
pub fn extract_image(body: &Value) -> Option<ImageReference> {
    CANDIDATES.iter().find_map(|(location, candidate)| {
        let image = candidate(body)?;
        tracing::debug!(location, "Found image in provider response");
        Some(image)
    })
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn inline_base64_field(body: &Value) -> Option<ImageReference> {
    non_empty_str(body.get("image_base64")).map(ImageReference::inline_png)
}

fn remote_url_field(body: &Value) -> Option<ImageReference> {
    non_empty_str(body.get("image_url")).map(ImageReference::remote)
}

fn result_array_url(body: &Value) -> Option<ImageReference> {
    body.get("data")?
        .as_array()?
        .iter()
        .find_map(|item| non_empty_str(item.get("url")))
        .map(ImageReference::remote)
}

fn conversational_inline_part(body: &Value) -> Option<ImageReference> {
    body.pointer("/candidates/0/content/parts")?
        .as_array()?
        .iter()
        .find_map(|part| {
            let inline = part.get("inlineData").or_else(|| part.get("inline_data"))?;
            non_empty_str(inline.get("data"))
        })
        .map(ImageReference::inline_png)
}

fn images_array_bytes(body: &Value) -> Option<ImageReference> {
    let first = body.pointer("/images/0")?;
    non_empty_str(first.get("bytesBase64Encoded"))
        .or_else(|| non_empty_str(first.pointer("/image/imageBytes")))
        .map(ImageReference::inline_png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_base64_wraps_as_png_data_uri() {
        let image = extract_image(&json!({ "image_base64": "AAAA" })).unwrap();
        assert_eq!(image.to_uri(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_direct_url() {
        let image = extract_image(&json!({ "image_url": "https://cdn/x.png" })).unwrap();
        assert_eq!(image, ImageReference::remote("https://cdn/x.png"));
    }

    #[test]
    fn test_base64_wins_over_url() {
        let body = json!({ "image_url": "https://cdn/x.png", "image_base64": "AAAA" });
        assert_eq!(extract_image(&body).unwrap(), ImageReference::inline_png("AAAA"));
    }

    #[test]
    fn test_empty_values_fall_through() {
        let body = json!({
            "image_base64": "",
            "image_url": "  ",
            "data": [{ "url": "" }, { "url": "https://cdn/second.png" }]
        });
        assert_eq!(
            extract_image(&body).unwrap(),
            ImageReference::remote("https://cdn/second.png")
        );
    }

    #[test]
    fn test_conversational_camel_case() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your image" },
                    { "inlineData": { "mimeType": "image/png", "data": "QUJD" } }
                ]}
            }]
        });
        assert_eq!(extract_image(&body).unwrap().to_uri(), "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_conversational_snake_case() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "inline_data": { "mime_type": "image/png", "data": "REVG" } }
                ]}
            }]
        });
        assert_eq!(extract_image(&body).unwrap().to_uri(), "data:image/png;base64,REVG");
    }

    #[test]
    fn test_images_array_conventions() {
        let flat = json!({ "images": [{ "bytesBase64Encoded": "R0hJ" }] });
        assert_eq!(extract_image(&flat).unwrap().to_uri(), "data:image/png;base64,R0hJ");

        let nested = json!({ "images": [{ "image": { "imageBytes": "SktM" } }] });
        assert_eq!(extract_image(&nested).unwrap().to_uri(), "data:image/png;base64,SktM");
    }

    #[test]
    fn test_text_only_response_has_no_image() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "I can't draw that." }] } }]
        });
        assert_eq!(extract_image(&body), None);
        assert_eq!(extract_image(&json!(null)), None);
        assert_eq!(extract_image(&json!({ "data": "nope" })), None);
    }
}
