//! MCP server for the news article store
//!
//! Exposes hybrid search and the read-only article listings as tools.

mod server;

pub use server::run_mcp_server;
