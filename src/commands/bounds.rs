//! Bounds command - bounding-box article lookup

use anyhow::{bail, Result};
use colored::Colorize;

use crate::core::store::ArticleStore;

/// Run bounds command
pub fn run(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64, json: bool) -> Result<()> {
    if min_lat > max_lat || min_lon > max_lon {
        bail!("Invalid bounding box: min must not exceed max");
    }

    let db_path = super::default_db_path();
    let store = ArticleStore::open(&db_path)?;
    let articles = store.within_bounds(min_lat, max_lat, min_lon, max_lon)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    println!(
        "{} {} articles within [{}, {}] x [{}, {}]",
        "→".dimmed(),
        articles.len(),
        min_lat,
        max_lat,
        min_lon,
        max_lon
    );

    for article in &articles {
        let coords = match (article.lat, article.lon) {
            (Some(lat), Some(lon)) => format!("({:.4}, {:.4})", lat, lon),
            _ => String::new(),
        };
        println!("  {} {}", article.title.cyan(), coords.dimmed());
    }

    Ok(())
}
