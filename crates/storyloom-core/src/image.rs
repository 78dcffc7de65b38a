//! Opaque image references.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

/// Width of placeholder illustrations, matching the 16:9 scene aspect ratio.
const PLACEHOLDER_WIDTH: u32 = 1280;
/// Height of placeholder illustrations.
const PLACEHOLDER_HEIGHT: u32 = 720;

/// Raw image bytes returned inline by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type reported by the provider, e.g. `image/png`.
    pub mime_type: String,
    /// Decoded image bytes.
    pub bytes: Vec<u8>,
}

/// An opaque, serializable reference to an image: either a `data:` URL
/// carrying the bytes or a remote placeholder URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wraps an existing reference string (uploaded data URL, remote URL).
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Encodes inline provider bytes as a `data:` URL.
    #[must_use]
    pub fn from_inline(image: &InlineImage) -> Self {
        Self(format!(
            "data:{};base64,{}",
            image.mime_type,
            BASE64_STANDARD.encode(&image.bytes)
        ))
    }

    /// Deterministic placeholder illustration keyed by `seed`.
    #[must_use]
    pub fn placeholder(seed: u32) -> Self {
        Self(format!(
            "https://picsum.photos/seed/{seed}/{PLACEHOLDER_WIDTH}/{PLACEHOLDER_HEIGHT}"
        ))
    }

    /// Returns the reference string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes a `data:<mime>;base64,<payload>` reference back into bytes.
    ///
    /// Returns `None` for remote references or malformed data URLs.
    #[must_use]
    pub fn to_inline(&self) -> Option<InlineImage> {
        let rest = self.0.strip_prefix("data:")?;
        let (mime_type, payload) = rest.split_once(";base64,")?;
        let bytes = BASE64_STANDARD.decode(payload).ok()?;
        Some(InlineImage {
            mime_type: mime_type.to_owned(),
            bytes,
        })
    }

    /// Returns `true` if this is a placeholder rather than a generated image.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with("https://picsum.photos/seed/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_image_encodes_as_data_url() {
        // Arrange
        let image = InlineImage {
            mime_type: "image/png".to_owned(),
            bytes: vec![1, 2, 3],
        };

        // Act
        let reference = ImageRef::from_inline(&image);

        // Assert
        assert_eq!(reference.as_str(), "data:image/png;base64,AQID");
        assert_eq!(reference.to_inline(), Some(image));
        assert!(!reference.is_placeholder());
    }

    #[test]
    fn test_placeholder_is_keyed_by_seed() {
        let reference = ImageRef::placeholder(42);
        assert_eq!(
            reference.as_str(),
            "https://picsum.photos/seed/42/1280/720"
        );
        assert!(reference.is_placeholder());
        assert!(reference.to_inline().is_none());
    }

    #[test]
    fn test_malformed_data_url_does_not_decode() {
        assert!(ImageRef::new("data:image/png;base64,@@@").to_inline().is_none());
        assert!(ImageRef::new("data:image/png,raw").to_inline().is_none());
    }
}
