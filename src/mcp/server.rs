//! News MCP Server implementation

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::PathBuf;

use crate::core::store::ArticleStore;
use crate::search::embedding::OllamaEmbedder;
use crate::search::engine::SearchEngine;

/// Parameters for news_search tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Free-text search query (e.g., "flooding risk downtown")
    #[schemars(description = "Free-text search query")]
    pub query: String,
    /// Whether to use semantic ranking (default: true)
    #[schemars(description = "Use semantic ranking via the embedding provider (default: true)")]
    #[serde(default = "default_ai_enabled")]
    pub ai_enabled: bool,
    /// Maximum number of semantic candidates (default: 5)
    #[schemars(description = "Maximum semantic candidates (default: 5)")]
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_ai_enabled() -> bool {
    true
}

fn default_limit() -> usize {
    5
}

/// Parameters for news_latest tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LatestParams {
    /// Maximum number of articles (default: 20)
    #[schemars(description = "Maximum number of articles (default: 20)")]
    #[serde(default = "default_latest_limit")]
    pub limit: usize,
}

fn default_latest_limit() -> usize {
    20
}

/// Parameters for news_bounds tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct BoundsParams {
    #[schemars(description = "Minimum latitude")]
    pub min_lat: f64,
    #[schemars(description = "Maximum latitude")]
    pub max_lat: f64,
    #[schemars(description = "Minimum longitude")]
    pub min_lon: f64,
    #[schemars(description = "Maximum longitude")]
    pub max_lon: f64,
}

/// News MCP Service
#[derive(Clone)]
pub struct NewsService {
    db_path: PathBuf,
    tool_router: ToolRouter<Self>,
}

impl NewsService {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            tool_router: Self::tool_router(),
        }
    }

    fn get_store(&self) -> Result<ArticleStore, McpError> {
        ArticleStore::open(&self.db_path)
            .map_err(|e| McpError::internal_error(format!("Failed to open store: {}", e), None))
    }
}

#[tool_router]
impl NewsService {
    /// Hybrid article search
    #[tool(
        description = "Search news articles by blending semantic similarity with keyword matching. Falls back to keyword-only results if the embedding provider is unavailable."
    )]
    async fn news_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        // Clamp limit: default 5, max 100 (DoS prevention)
        let limit = params.0.limit.clamp(1, 100);

        // Provider setup failure degrades to keyword-only, like any other
        // semantic failure
        let engine = if params.0.ai_enabled {
            match OllamaEmbedder::from_env() {
                Ok(provider) => SearchEngine::new(&self.db_path, Box::new(provider)),
                Err(e) => {
                    tracing::warn!(error = %e, "embedding provider setup failed, keyword matches only");
                    SearchEngine::keyword_only(&self.db_path)
                }
            }
        } else {
            SearchEngine::keyword_only(&self.db_path)
        }
        .with_top_k(limit);

        let results = engine
            .search(&params.0.query, params.0.ai_enabled)
            .map_err(|e| McpError::internal_error(format!("Search failed: {}", e), None))?;

        let output = serde_json::to_string_pretty(&results).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Latest articles
    #[tool(description = "List the latest news articles in reverse-chronological order.")]
    async fn news_latest(
        &self,
        params: Parameters<LatestParams>,
    ) -> Result<CallToolResult, McpError> {
        let store = self.get_store()?;
        // Clamp limit: default 20, max 200 (DoS prevention)
        let limit = params.0.limit.clamp(1, 200);

        let articles = store
            .latest(limit)
            .map_err(|e| McpError::internal_error(format!("Query failed: {}", e), None))?;

        let output = serde_json::to_string_pretty(&articles).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Articles within a bounding box
    #[tool(description = "List news articles whose coordinates fall inside a geographic bounding box. Unranked.")]
    async fn news_bounds(
        &self,
        params: Parameters<BoundsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        if p.min_lat > p.max_lat || p.min_lon > p.max_lon {
            return Err(McpError::invalid_params(
                "Invalid bounding box: min must not exceed max".to_string(),
                None,
            ));
        }

        let store = self.get_store()?;
        let articles = store
            .within_bounds(p.min_lat, p.max_lat, p.min_lon, p.max_lon)
            .map_err(|e| McpError::internal_error(format!("Query failed: {}", e), None))?;

        let output = serde_json::to_string_pretty(&articles).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Article store statistics
    #[tool(description = "Get article store statistics: article count and embedding coverage.")]
    async fn news_status(&self) -> Result<CallToolResult, McpError> {
        let store = self.get_store()?;
        let stats = store
            .stats()
            .map_err(|e| McpError::internal_error(format!("Query failed: {}", e), None))?;

        let coverage = if stats.article_count > 0 {
            stats.embedded_count as f64 / stats.article_count as f64 * 100.0
        } else {
            0.0
        };

        let output = serde_json::json!({
            "articles": stats.article_count,
            "with_embedding": stats.embedded_count,
            "embedding_coverage": format!("{:.0}%", coverage),
            "last_ingested": stats.last_ingested,
        });

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&output).unwrap_or_default(),
        )]))
    }
}

impl ServerHandler for NewsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Regional news MCP server. Provides hybrid semantic + keyword article search, latest listings, and geographic lookups.".to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(db_path: PathBuf) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let service = NewsService::new(db_path);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
