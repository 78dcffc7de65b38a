//! Storyloom — Gemini content provider.
//!
//! Implements [`ContentProvider`] against the Gemini `generateContent` REST
//! endpoint. Structured calls are constrained with a response schema; image
//! calls ask for an `IMAGE` modality and read the inline bytes back.
//!
//! [`ContentProvider`]: storyloom_core::provider::ContentProvider

pub mod config;
mod http_error;
pub mod provider;
mod wire;

pub use config::GeminiConfig;
pub use provider::GeminiProvider;
