//! Article store backed by SQLite.
//!
//! Embeddings are stored as little-endian f32 BLOBs and similarity is
//! computed in Rust. Good enough for a regional corpus; can be migrated
//! to sqlite-vec for native vector operations later.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::article::Article;
use crate::search::embedding::cosine_similarity;

/// Read/write access to the article corpus.
pub struct ArticleStore {
    conn: Connection,
}

/// Corpus statistics.
#[derive(Debug)]
pub struct StoreStats {
    pub article_count: usize,
    pub embedded_count: usize,
    pub last_ingested: Option<i64>,
}

const ARTICLE_COLUMNS: &str = "article_id, title, summary, body_text, source_url, region, \
                               category, published_at, sentiment_score, lat, lon";

impl ArticleStore {
    /// Open or create database at path
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                article_id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                summary TEXT,
                body_text TEXT,
                source_url TEXT NOT NULL,
                region TEXT,
                category TEXT,
                published_at TEXT,  -- RFC 3339
                sentiment_score REAL,
                lat REAL,
                lon REAL,
                embedding BLOB,
                ingested_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_articles_published ON articles(published_at);
            CREATE INDEX IF NOT EXISTS idx_articles_region ON articles(region);
            "#,
        )?;

        Ok(())
    }

    /// Insert or update an article, embedding included when present.
    pub fn upsert_article(&self, article: &Article) -> Result<()> {
        let embedding_blob = article.embedding.as_deref().map(embedding_to_blob);
        let published_at = article.published_at.map(|t| t.to_rfc3339());
        let now = Utc::now().timestamp();

        self.conn.execute(
            r#"
            INSERT INTO articles (article_id, title, summary, body_text, source_url, region,
                                  category, published_at, sentiment_score, lat, lon, embedding,
                                  ingested_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(article_id) DO UPDATE SET
                title = excluded.title,
                summary = excluded.summary,
                body_text = excluded.body_text,
                source_url = excluded.source_url,
                region = excluded.region,
                category = excluded.category,
                published_at = excluded.published_at,
                sentiment_score = excluded.sentiment_score,
                lat = excluded.lat,
                lon = excluded.lon,
                embedding = excluded.embedding,
                ingested_at = excluded.ingested_at
            "#,
            params![
                article.id,
                article.title,
                article.summary,
                article.body_text,
                article.source_url,
                article.region,
                article.category,
                published_at,
                article.sentiment_score,
                article.lat,
                article.lon,
                embedding_blob,
                now,
            ],
        )?;

        Ok(())
    }

    /// Get article by ID (embedding not loaded)
    pub fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = ?1"),
                params![id],
                article_from_row,
            )
            .optional()?;

        Ok(result)
    }

    /// Latest articles, reverse-chronological by published time.
    /// Undated articles come last.
    pub fn latest(&self, limit: usize) -> Result<Vec<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             ORDER BY published_at IS NULL, published_at DESC LIMIT ?1"
        ))?;

        let rows = stmt.query_map(params![limit as i64], article_from_row)?;
        collect_articles(rows)
    }

    /// Articles within a geographic bounding box, unranked.
    pub fn within_bounds(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    ) -> Result<Vec<Article>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             WHERE lat BETWEEN ?1 AND ?2 AND lon BETWEEN ?3 AND ?4"
        ))?;

        let rows = stmt.query_map(params![min_lat, max_lat, min_lon, max_lon], article_from_row)?;
        collect_articles(rows)
    }

    /// Lexical match: every article whose title or body contains the whole
    /// query as a case-insensitive substring. Not tokenized, not ranked;
    /// order is store scan order.
    ///
    /// The fold happens in Rust because SQLite's lower() only handles
    /// ASCII.
    pub fn containing_substring(&self, query: &str) -> Result<Vec<Article>> {
        let needle = query.to_lowercase();

        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ARTICLE_COLUMNS} FROM articles"))?;
        let rows = stmt.query_map([], article_from_row)?;

        let mut articles = Vec::new();
        for row in rows {
            let article = row?;
            let title_hit = article.title.to_lowercase().contains(&needle);
            let body_hit = article
                .body_text
                .as_deref()
                .map(|body| body.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if title_hit || body_hit {
                articles.push(article);
            }
        }

        Ok(articles)
    }

    /// Top-k articles by cosine similarity against the query vector.
    ///
    /// Only rows with an embedding of the same dimension as the query are
    /// considered. Returns an empty list if the corpus has no eligible
    /// embeddings. Ties among equal similarities keep scan order.
    pub fn nearest_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<(Article, f32)>> {
        // Load all embeddings and compute similarity in Rust.
        // O(n) but fine for < 10,000 articles.
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS}, embedding FROM articles WHERE embedding IS NOT NULL"
        ))?;

        let rows = stmt.query_map([], |row| {
            let article = article_from_row(row)?;
            let embedding_blob: Vec<u8> = row.get(11)?;
            Ok((article, embedding_blob))
        })?;

        let mut results: Vec<(Article, f32)> = Vec::new();

        for row_result in rows {
            let (article, embedding_blob) = row_result?;
            let embedding = blob_to_embedding(&embedding_blob);
            if embedding.len() != query.len() {
                continue;
            }
            let similarity = cosine_similarity(query, &embedding);
            results.push((article, similarity));
        }

        // Sort by similarity descending
        results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        Ok(results)
    }

    /// Get corpus statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let article_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;

        let embedded_count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM articles WHERE embedding IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        let last_ingested: Option<i64> = self
            .conn
            .query_row("SELECT MAX(ingested_at) FROM articles", [], |row| row.get(0))
            .optional()?
            .flatten();

        Ok(StoreStats {
            article_count: article_count as usize,
            embedded_count: embedded_count as usize,
            last_ingested,
        })
    }
}

fn article_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Article> {
    let published_at: Option<String> = row.get(7)?;

    Ok(Article {
        id: row.get(0)?,
        title: row.get(1)?,
        summary: row.get(2)?,
        body_text: row.get(3)?,
        source_url: row.get(4)?,
        region: row.get(5)?,
        category: row.get(6)?,
        published_at: published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc)),
        sentiment_score: row.get(8)?,
        lat: row.get(9)?,
        lon: row.get(10)?,
        embedding: None,
    })
}

fn collect_articles(
    rows: impl Iterator<Item = rusqlite::Result<Article>>,
) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    for row in rows {
        articles.push(row?);
    }
    Ok(articles)
}

/// Convert f32 embedding to BLOB
fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(embedding.len() * 4);
    for &val in embedding {
        blob.extend_from_slice(&val.to_le_bytes());
    }
    blob
}

/// Convert BLOB to f32 embedding
fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}
