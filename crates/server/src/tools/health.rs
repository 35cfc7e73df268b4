//! health tool implementation.
//!
//! Reports store reachability. Always returns a result; an unreachable
//! store is reported as status "unhealthy" rather than a tool error, so
//! monitors can distinguish the two conditions.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sitemeta_core::Error;

use crate::service::MetadataService;

/// Output from the health tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthOutput {
    pub status: String,
    pub store: String,
}

/// Implementation of the health tool.
pub async fn health_impl(service: &MetadataService) -> Result<CallToolResult, McpError> {
    let output = match service.ping().await {
        Ok(()) => HealthOutput { status: "healthy".to_string(), store: "connected".to_string() },
        Err(err) => {
            tracing::error!(error = %err, "store health check failed");
            HealthOutput { status: "unhealthy".to_string(), store: "disconnected".to_string() }
        }
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

    #[tokio::test]
    async fn test_health_reports_ok() {
        let store = MetadataStore::open_in_memory().await.unwrap();
        let fetcher = FetchClient::new(FetchConfig::default()).unwrap();
        let service = MetadataService::new(store, Arc::new(fetcher));

        let result = health_impl(&service).await;
        assert!(result.is_ok());
    }
}
