//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::service::MetadataService;
use crate::tools::collect::{MetadataCollectParams, collect_impl};
use crate::tools::health::health_impl;
use crate::tools::lookup::{MetadataLookupParams, lookup_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main server handler for sitemeta.
#[derive(Clone)]
pub struct SiteMetaServer {
    service: MetadataService,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SiteMetaServer {
    /// Create a new server handler around the orchestrating service.
    pub fn new(service: MetadataService) -> Self {
        Self { service, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Collect and store HTTP response metadata (status, headers, cookies, truncated page source) for a URL. Always fetches fresh data and reports whether the snapshot was created or refreshed."
    )]
    async fn metadata_collect(&self, params: Parameters<MetadataCollectParams>) -> Result<CallToolResult, McpError> {
        collect_impl(&self.service, params.0).await
    }

    #[tool(
        description = "Retrieve the stored metadata snapshot for a URL. On a miss, schedules a background collection and acknowledges immediately without waiting for it."
    )]
    async fn metadata_lookup(&self, params: Parameters<MetadataLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.service, params.0).await
    }

    #[tool(description = "Check that the metadata store is reachable.")]
    async fn health(&self) -> Result<CallToolResult, McpError> {
        health_impl(&self.service).await
    }
}

impl ServerHandler for SiteMetaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "sitemeta".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "HTTP metadata inventory: metadata_collect fetches and stores a URL's response \
                 metadata, metadata_lookup returns the stored snapshot (scheduling a background \
                 collection on a miss), health reports store reachability."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
