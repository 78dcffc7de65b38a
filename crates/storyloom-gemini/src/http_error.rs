//! HTTP failure classification.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use storyloom_core::provider::ProviderError;

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Maps a non-success response to a provider error.
///
/// Rate limiting, billing and authorization rejections are quota errors:
/// retrying will not help until the key or billing is fixed. Everything else
/// is a transport error.
pub(crate) fn map_http_error(
    status: StatusCode,
    body: &str,
    retry_after: Option<Duration>,
) -> ProviderError {
    let (status_text, detail) = match serde_json::from_str::<ErrorWrapper>(body) {
        Ok(wrapper) => (
            wrapper.error.status.unwrap_or_default(),
            wrapper.error.message.unwrap_or_else(|| body.to_owned()),
        ),
        Err(_) => (String::new(), body.to_owned()),
    };

    let mut message = if status_text.is_empty() {
        format!("HTTP {}: {detail}", status.as_u16())
    } else {
        format!("HTTP {} {status_text}: {detail}", status.as_u16())
    };
    if let Some(delay) = retry_after {
        message.push_str(&format!(" (retry after {}s)", delay.as_secs()));
    }

    let is_quota = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::PAYMENT_REQUIRED
            | StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
    ) || status_text == "RESOURCE_EXHAUSTED"
        || status_text == "PERMISSION_DENIED";

    if is_quota {
        ProviderError::Quota(message)
    } else {
        ProviderError::Transport(message)
    }
}

/// Reads a `Retry-After` header given in seconds. HTTP-date values are
/// ignored.
pub(crate) fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
