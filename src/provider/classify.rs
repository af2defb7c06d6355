use crate::error::{TransportCategory, TransportError};

/// Classify a backend failure from its message text.
///
/// CLI backends only give us stderr, so status codes and keywords in the text
/// are all there is to go on. Checked in order; the first match wins.
pub fn classify_failure(message: &str) -> TransportError {
    let lower = message.to_lowercase();

    let category = if message.contains("429")
        || lower.contains("quota")
        || lower.contains("rate limit")
        || lower.contains("resource_exhausted")
    {
        TransportCategory::RateLimited
    } else if message.contains("403") || lower.contains("permission") {
        TransportCategory::PermissionDenied
    } else if lower.contains("api key") || lower.contains("api_key") || message.contains("401") {
        TransportCategory::AuthInvalid
    } else if message.contains("400") || lower.contains("invalid") {
        TransportCategory::MalformedRequest
    } else if message.contains("500")
        || message.contains("502")
        || message.contains("503")
        || lower.contains("overloaded")
        || lower.contains("unavailable")
    {
        TransportCategory::ServerUnavailable
    } else {
        TransportCategory::Other
    };

    TransportError::new(category, message.trim())
}
