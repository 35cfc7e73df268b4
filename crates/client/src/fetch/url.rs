//! URL normalization to the canonical storage key.

/// Error type for URL normalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Normalize a URL string into the canonical key used for storage and
/// lookup.
///
/// Rules, applied in order:
/// 1. Trim leading/trailing whitespace
/// 2. Lowercase the scheme and host (path, query, fragment untouched)
/// 3. Strip all trailing slashes from the path, so `https://example.com/`,
///    `https://example.com` and `https://example.com//` produce the same key
/// 4. Keep query string and fragment verbatim (do not reorder)
///
/// Only `http` and `https` URLs are accepted. The result is
/// deterministic and idempotent: normalizing a canonical key returns
/// the key unchanged.
pub fn normalize(input: &str) -> Result<String, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    // The url crate lowercases scheme and host during parsing.
    let host = parsed.host_str().ok_or(UrlError::MissingHost)?;

    let mut canonical = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        canonical.push(':');
        canonical.push_str(&port.to_string());
    }
    canonical.push_str(parsed.path().trim_end_matches('/'));
    if let Some(query) = parsed.query() {
        canonical.push('?');
        canonical.push_str(query);
    }
    if let Some(fragment) = parsed.fragment() {
        canonical.push('#');
        canonical.push_str(fragment);
    }

    Ok(canonical)
}
