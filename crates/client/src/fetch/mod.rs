//! Outbound HTTP fetch producing metadata snapshots.
//!
//! One GET per invocation, no retries. Transport-level failures
//! (timeout, redirect limit, DNS, refused connection, TLS) are
//! classified as typed errors; a remote 4xx/5xx response is a
//! successful fetch recorded in the snapshot's status code.

pub mod url;

use bytes::Bytes;
use chrono::Utc;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;

pub use url::{UrlError, normalize};

use sitemeta_core::{Error, MetadataRecord};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string identifying this service to remote servers.
    pub user_agent: String,

    /// Byte ceiling for the stored page source (default: 500 000).
    pub max_body_bytes: usize,

    /// Overall request timeout (default: 20s).
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5).
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "sitemeta-bot/0.1".to_string(),
            max_body_bytes: 500_000,
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
        }
    }
}

/// HTTP fetch client for metadata collection.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchTransport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Fetch a canonical URL and capture its response metadata.
    ///
    /// The returned record carries the canonical URL it was requested
    /// under, the response status, headers, cookies, and the body
    /// truncated to the configured byte ceiling. Truncation is silent.
    pub async fn fetch(&self, url: &str) -> Result<MetadataRecord, Error> {
        let mut response = self.http.get(url).send().await.map_err(classify_error)?;

        let status_code = response.status().as_u16() as i32;

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in response.headers().iter() {
            let value = String::from_utf8_lossy(value.as_bytes());
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.to_string());
        }

        let cookies: BTreeMap<String, String> = response
            .cookies()
            .map(|c| (c.name().to_string(), c.value().to_string()))
            .collect();

        let mut body: Vec<u8> = Vec::new();
        loop {
            let chunk: Option<Bytes> = response.chunk().await.map_err(classify_error)?;
            let Some(chunk) = chunk else { break };
            let room = self.config.max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                break;
            }
            body.extend_from_slice(&chunk);
        }
        let page_source = truncate_utf8(String::from_utf8_lossy(&body).into_owned(), self.config.max_body_bytes);

        let record = MetadataRecord {
            url: url.to_string(),
            status_code,
            headers,
            cookies,
            page_source,
            fetched_at: Utc::now(),
        };

        tracing::debug!(
            url,
            status = status_code,
            headers = record.headers.len(),
            body_bytes = record.page_source.len(),
            "fetched metadata"
        );

        Ok(record)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// Classify a reqwest failure into the service error taxonomy.
fn classify_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(err.to_string())
    } else if err.is_redirect() {
        Error::TooManyRedirects(err.to_string())
    } else {
        Error::FetchTransport(err.to_string())
    }
}

/// Cut a string back to at most `max_bytes` at a char boundary.
///
/// Lossy decoding can replace a cut-off trailing byte sequence with a
/// wider replacement character, so the decoded string is trimmed again
/// to keep the stored length within the ceiling.
fn truncate_utf8(mut s: String, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
    s
}
