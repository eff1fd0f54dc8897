//! Search command - hybrid semantic + keyword search

use anyhow::Result;
use colored::Colorize;
use tracing::warn;

use crate::search::embedding::OllamaEmbedder;
use crate::search::engine::{SearchEngine, DEFAULT_TOP_K};
use crate::search::relevance::RelevanceTier;

/// Run search command
pub fn run(query: &str, keyword_only: bool, limit: Option<usize>, json: bool) -> Result<()> {
    let db_path = super::default_db_path();

    if !db_path.exists() {
        eprintln!(
            "{} No article store at: {}",
            "Error:".red().bold(),
            db_path.display()
        );
        eprintln!();
        eprintln!("Run {} first.", "geonews ingest <file>".cyan());
        std::process::exit(1);
    }

    // The provider is only needed for the semantic path; failure to set
    // it up degrades to keyword-only like any other semantic failure.
    let engine = if keyword_only {
        SearchEngine::keyword_only(&db_path)
    } else {
        match OllamaEmbedder::from_env() {
            Ok(provider) => SearchEngine::new(&db_path, Box::new(provider)),
            Err(e) => {
                warn!(error = %e, "embedding provider setup failed, keyword matches only");
                SearchEngine::keyword_only(&db_path)
            }
        }
    }
    .with_top_k(limit.unwrap_or(DEFAULT_TOP_K));

    let results = engine.search(query, !keyword_only)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("{} No results found for: {}", "→".dimmed(), query.cyan());
        return Ok(());
    }

    println!(
        "{} {} results for: {}",
        "→".dimmed(),
        results.len(),
        query.cyan()
    );
    println!();

    for (i, result) in results.iter().enumerate() {
        let badge = match (result.score, result.relevance) {
            (Some(score), Some(RelevanceTier::HighlyRelevant)) => {
                format!("Highly Relevant {:.2}", score).green().to_string()
            }
            (Some(score), Some(RelevanceTier::Related)) => {
                format!("Related {:.2}", score).yellow().to_string()
            }
            _ => "keyword".dimmed().to_string(),
        };

        println!(
            "{}. [{}] {}",
            (i + 1).to_string().bold(),
            badge,
            result.article.title.cyan()
        );

        if let Some(ref summary) = result.article.summary {
            // Truncate summary for display (char-aware for Unicode)
            let display_summary = if summary.chars().count() > 100 {
                format!("{}...", summary.chars().take(100).collect::<String>())
            } else {
                summary.clone()
            };
            println!("   {}", display_summary.dimmed());
        }

        if let (Some(ref region), Some(ref category)) =
            (&result.article.region, &result.article.category)
        {
            println!("   {} | {}", region, category);
        }
        println!();
    }

    Ok(())
}
