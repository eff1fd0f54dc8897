//! Ingest command - load article records into the store
//!
//! The ETL pipeline that fetches articles and computes their embeddings
//! lives outside this repo; this command only loads its JSON output.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::core::article::Article;
use crate::core::store::ArticleStore;
use crate::search::embedding::EmbeddingConfig;

/// Run ingest command
pub fn run(file: &Path, json: bool) -> Result<()> {
    let db_path = super::default_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let articles: Vec<Article> =
        serde_json::from_str(&content).context("Expected a JSON array of articles")?;

    let dimension = EmbeddingConfig::from_env().dimension;
    let store = ArticleStore::open(&db_path)?;

    let mut ingested = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for mut article in articles {
        // Embeddings of the wrong dimension would poison vector ranking;
        // keep the article but drop the vector.
        if let Some(ref embedding) = article.embedding {
            if embedding.len() != dimension {
                eprintln!(
                    "{} Article {}: embedding has {} dimensions, expected {}",
                    "!".yellow(),
                    article.id,
                    embedding.len(),
                    dimension
                );
                article.embedding = None;
                skipped += 1;
            }
        }

        match store.upsert_article(&article) {
            Ok(()) => ingested += 1,
            Err(e) => {
                eprintln!("Failed to ingest article {}: {}", article.id, e);
                failed += 1;
            }
        }
    }

    if json {
        println!(
            "{}",
            serde_json::json!({
                "ingested": ingested,
                "embeddings_dropped": skipped,
                "failed": failed,
                "db_path": db_path.display().to_string(),
            })
        );
    } else {
        println!(
            "{} Ingested {} articles ({} embeddings dropped, {} failed)",
            "→".dimmed(),
            ingested.to_string().bold(),
            skipped,
            failed
        );
        println!("{} Store: {}", "→".dimmed(), db_path.display());
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
