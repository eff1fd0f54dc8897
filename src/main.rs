mod commands;
mod core;
#[cfg(feature = "mcp")]
mod mcp;
mod search;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geonews")]
#[command(about = "Hybrid semantic + keyword search over region-tagged news", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a JSON array of articles into the store
    Ingest {
        file: PathBuf,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Hybrid search: semantic ranking blended with keyword matches
    Search {
        query: String,
        #[arg(long, help = "Skip the embedding provider, keyword matches only")]
        keyword_only: bool,
        #[arg(long, short, help = "Semantic candidates per query (default: 5)")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Latest articles, newest first
    Latest {
        #[arg(long, short, help = "Limit results (default: 20)")]
        limit: Option<usize>,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Articles within a geographic bounding box
    Bounds {
        #[arg(long, allow_negative_numbers = true)]
        min_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        max_lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        min_lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        max_lon: f64,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Article store statistics
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    /// Start MCP server
    #[cfg(feature = "mcp")]
    Mcp {
        #[arg(long, help = "Show client configuration instructions")]
        install: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("geonews=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { file, json } => commands::ingest::run(&file, json),
        Commands::Search {
            query,
            keyword_only,
            limit,
            json,
        } => commands::search::run(&query, keyword_only, limit, json),
        Commands::Latest { limit, json } => commands::latest::run(limit, json),
        Commands::Bounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            json,
        } => commands::bounds::run(min_lat, max_lat, min_lon, max_lon, json),
        Commands::Status { json } => commands::status::run(json),

        #[cfg(feature = "mcp")]
        Commands::Mcp { install } => {
            if install {
                print_mcp_install_instructions();
                Ok(())
            } else {
                run_mcp_server()
            }
        }
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server() -> anyhow::Result<()> {
    let db_path = commands::default_db_path();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mcp::run_mcp_server(db_path))
}

#[cfg(feature = "mcp")]
fn print_mcp_install_instructions() {
    use colored::Colorize;

    let cwd = std::env::current_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "/path/to/your/data".to_string());

    let binary_path = std::env::current_exe()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "geonews".to_string());

    println!("{}", "MCP Server Installation Guide".bold().cyan());
    println!();
    println!("Add the following to your MCP client configuration:");
    println!();
    println!(
        r#"{{
  "mcpServers": {{
    "geonews": {{
      "command": "{}",
      "args": ["mcp"],
      "cwd": "{}"
    }}
  }}
}}"#,
        binary_path, cwd
    );
    println!();
    println!("{}", "Available tools:".bold());
    println!(
        "  • {} - Hybrid semantic + keyword article search",
        "news_search".green()
    );
    println!("  • {} - Latest articles, newest first", "news_latest".green());
    println!(
        "  • {} - Articles within a bounding box",
        "news_bounds".green()
    );
    println!("  • {} - Article store statistics", "news_status".green());
}
