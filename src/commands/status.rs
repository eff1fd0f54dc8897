//! Status command - article store statistics

use anyhow::Result;
use chrono::{TimeZone, Utc};
use colored::Colorize;

use crate::core::store::ArticleStore;

/// Run status command
pub fn run(json: bool) -> Result<()> {
    let db_path = super::default_db_path();

    if !db_path.exists() {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "exists": false,
                    "db_path": db_path.display().to_string(),
                })
            );
        } else {
            println!("{} No article store at: {}", "→".dimmed(), db_path.display());
        }
        return Ok(());
    }

    let store = ArticleStore::open(&db_path)?;
    let stats = store.stats()?;

    let coverage = if stats.article_count > 0 {
        stats.embedded_count as f64 / stats.article_count as f64 * 100.0
    } else {
        0.0
    };

    let last_ingested = stats
        .last_ingested
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .map(|t| t.to_rfc3339());

    if json {
        println!(
            "{}",
            serde_json::json!({
                "exists": true,
                "db_path": db_path.display().to_string(),
                "articles": stats.article_count,
                "with_embedding": stats.embedded_count,
                "embedding_coverage": format!("{:.0}%", coverage),
                "last_ingested": last_ingested,
            })
        );
    } else {
        println!("{}", "Article store".bold());
        println!("  Path:       {}", db_path.display());
        println!("  Articles:   {}", stats.article_count);
        println!(
            "  Embeddings: {} ({:.0}% coverage)",
            stats.embedded_count, coverage
        );
        if let Some(ts) = last_ingested {
            println!("  Last ingest: {}", ts.dimmed());
        }
    }

    Ok(())
}
