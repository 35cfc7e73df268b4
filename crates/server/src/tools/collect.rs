//! metadata_collect tool implementation.
//!
//! Synchronous fetch-and-store: always fetches fresh metadata and
//! reports whether the snapshot was created or refreshed.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sitemeta_core::{Error, MetadataRecord};

use crate::service::{CollectOutcome, MetadataService};

/// Parameters for the metadata_collect tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetadataCollectParams {
    /// The URL to collect metadata for.
    pub url: String,
}

/// Output from the metadata_collect tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetadataCollectOutput {
    pub message: String,
    /// "created" for a first-time snapshot, "refreshed" otherwise.
    pub operation: String,
    pub record: MetadataRecord,
    pub stats: CollectStats,
}

/// Summary counters for the stored snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CollectStats {
    pub headers_count: usize,
    pub cookies_count: usize,
    pub page_source_length: usize,
}

/// Implementation of the metadata_collect tool.
pub async fn collect_impl(service: &MetadataService, params: MetadataCollectParams) -> Result<CallToolResult, McpError> {
    if params.url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let (operation, message, record) = match service.collect(&params.url).await? {
        CollectOutcome::Created(record) => ("created", "Metadata collected and stored successfully", record),
        CollectOutcome::Refreshed(record) => ("refreshed", "Metadata refreshed successfully", record),
    };

    let stats = CollectStats {
        headers_count: record.headers.len(),
        cookies_count: record.cookies.len(),
        page_source_length: record.page_source.len(),
    };
    let output = MetadataCollectOutput {
        message: message.to_string(),
        operation: operation.to_string(),
        record,
        stats,
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MetadataService;
    use sitemeta_client::{FetchClient, FetchConfig};
    use sitemeta_core::MetadataStore;
    use std::sync::Arc;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn test_service() -> MetadataService {
        let store = MetadataStore::open_in_memory().await.unwrap();
        let fetcher = FetchClient::new(FetchConfig::default()).unwrap();
        MetadataService::new(store, Arc::new(fetcher))
    }

    #[tokio::test]
    async fn test_collect_empty_url() {
        let service = test_service().await;
        let params = MetadataCollectParams { url: "".into() };
        let result = collect_impl(&service, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_collect_invalid_url_is_error() {
        let service = test_service().await;
        let params = MetadataCollectParams { url: "not a url".into() };
        let result = collect_impl(&service, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_collect_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let service = test_service().await;
        let params = MetadataCollectParams { url: server.uri() };

        let result = collect_impl(&service, params.clone()).await;
        assert!(result.is_ok());

        // a second collect for the same key succeeds as a refresh
        let result = collect_impl(&service, params).await;
        assert!(result.is_ok());
    }
}
