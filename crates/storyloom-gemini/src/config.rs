//! Gemini client settings.

use std::fmt;
use std::time::Duration;

/// Default model for scene, profile and short-text calls.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
/// Default model for illustrations.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for [`GeminiProvider`](crate::GeminiProvider).
#[derive(Clone)]
pub struct GeminiConfig {
    pub(crate) api_key: String,
    pub(crate) text_model: String,
    pub(crate) image_model: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl GeminiConfig {
    /// Creates settings with default models, endpoint and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_owned(),
            image_model: DEFAULT_IMAGE_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the text model.
    #[must_use]
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Overrides the image model.
    #[must_use]
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Overrides the API root, e.g. to point at a local stub server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The text model in use.
    #[must_use]
    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    /// The image model in use.
    #[must_use]
    pub fn image_model(&self) -> &str {
        &self.image_model
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
