//! metadata_lookup tool implementation.
//!
//! Returns the stored snapshot when present. On a miss the service
//! schedules a background collection and this tool acknowledges
//! immediately; the caller repeats the lookup later for the result.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sitemeta_core::{Error, MetadataRecord};

use crate::service::{LookupOutcome, MetadataService};

/// Parameters for the metadata_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MetadataLookupParams {
    /// The URL to look up.
    pub url: String,
}

/// Output when the snapshot exists.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LookupFoundOutput {
    pub record: MetadataRecord,
}

/// Acknowledgment when no snapshot exists yet.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LookupAcceptedOutput {
    pub status: String,
    pub url: String,
    pub message: String,
}

/// Implementation of the metadata_lookup tool.
pub async fn lookup_impl(service: &MetadataService, params: MetadataLookupParams) -> Result<CallToolResult, McpError> {
    if params.url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let json = match service.lookup(&params.url).await? {
        LookupOutcome::Found(record) => {
            let output = LookupFoundOutput { record };
            serde_json::to_string_pretty(&output)
        }
        LookupOutcome::Accepted { url } => {
            let output = LookupAcceptedOutput {
                status: "pending_collection".to_string(),
                url,
                message: "No snapshot stored yet; collection scheduled, check back later".to_string(),
            };
            serde_json::to_string_pretty(&output)
        }
    }
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

    async fn test_service() -> MetadataService {
        let store = MetadataStore::open_in_memory().await.unwrap();
        let fetcher = FetchClient::new(FetchConfig::default()).unwrap();
        MetadataService::new(store, Arc::new(fetcher))
    }

    #[tokio::test]
    async fn test_lookup_empty_url() {
        let service = test_service().await;
        let params = MetadataLookupParams { url: "".into() };
        let result = lookup_impl(&service, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_lookup_miss_acknowledges() {
        let service = test_service().await;
        // the background fetch will fail (nothing listens on port 1),
        // but the acknowledgment itself must succeed
        let params = MetadataLookupParams { url: "http://127.0.0.1:1/missing".into() };
        let result = lookup_impl(&service, params).await;
        assert!(result.is_ok());
    }
}
