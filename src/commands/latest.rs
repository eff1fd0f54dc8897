//! Latest command - reverse-chronological article listing

use anyhow::Result;
use colored::Colorize;

use crate::core::store::ArticleStore;

const DEFAULT_LIMIT: usize = 20;

/// Run latest command
pub fn run(limit: Option<usize>, json: bool) -> Result<()> {
    let db_path = super::default_db_path();
    let store = ArticleStore::open(&db_path)?;
    let articles = store.latest(limit.unwrap_or(DEFAULT_LIMIT))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    if articles.is_empty() {
        println!("{} No articles in the store", "→".dimmed());
        return Ok(());
    }

    for article in &articles {
        let published = article
            .published_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{}  {}",
            published.dimmed(),
            article.title.cyan()
        );
        if let Some(ref region) = article.region {
            println!("{}  {}", " ".repeat(16), region.dimmed());
        }
    }

    Ok(())
}
