use std::fmt;

/// Media type used for inline images when the provider does not say otherwise.
pub const DEFAULT_MEDIA_TYPE: &str = "image/png";

/// A displayable reference to a generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageReference {
    /// Base64 image bytes returned inline by the provider.
    InlineBase64 { media_type: String, data: String },
    /// A URL the provider hosts the image at.
    Remote(String),
}

impl ImageReference {
    pub fn inline_png(data: impl Into<String>) -> Self {
        ImageReference::InlineBase64 {
            media_type: DEFAULT_MEDIA_TYPE.to_string(),
            data: data.into(),
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        ImageReference::Remote(url.into())
    }

    /// Render as something a browser can put in an `<img src>`.
    pub fn to_uri(&self) -> String {
        match self {
            ImageReference::InlineBase64 { media_type, data } => {
                format!("data:{media_type};base64,{data}")
            }
            ImageReference::Remote(url) => url.clone(),
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Inline payloads can be megabytes; keep logs readable.
            ImageReference::InlineBase64 { media_type, data } => {
                write!(f, "inline {media_type} ({} base64 chars)", data.len())
            }
            ImageReference::Remote(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_png_uri() {
        let image = ImageReference::inline_png("iVBORw0KGgo=");
        assert_eq!(image.to_uri(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_remote_uri_passthrough() {
        let image = ImageReference::remote("https://cdn.example.com/a.png");
        assert_eq!(image.to_uri(), "https://cdn.example.com/a.png");
        assert_eq!(image.to_string(), "https://cdn.example.com/a.png");
    }
}
