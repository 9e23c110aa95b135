use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Category, StoredArticle};

use super::schema::SCHEMA;

const SELECT_COLUMNS: &str = "SELECT id, category, title, content, created_at, updated_at FROM articles";

/// CRUD over the `articles` table.
///
/// Every call opens its own connection, runs a single statement and closes the
/// connection again. Concurrent writers to the same row are last-write-wins.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    db_path: PathBuf,
}

impl ArticleStore {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let store = Self { db_path };
        let conn = store.connect().await?;
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        conn.close().await?;

        tracing::debug!("Article store ready at {}", store.db_path.display());
        Ok(store)
    }

    async fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path).await?)
    }

    pub async fn create(&self, category: Category, title: &str, content: &str) -> Result<i64> {
        let title = title.to_string();
        let content = content.to_string();
        let now = timestamp_now();

        let conn = self.connect().await?;
        let id = conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO articles (category, title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
                    params![category.slug(), title, content, now],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        conn.close().await?;

        tracing::info!("Created article {} in {}", id, category);
        Ok(id)
    }

    /// Newest first.
    pub async fn list(&self, category: Category) -> Result<Vec<StoredArticle>> {
        let conn = self.connect().await?;
        let articles = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "{SELECT_COLUMNS} WHERE category = ?1 ORDER BY created_at DESC, id DESC"
                ))?;
                let articles = stmt
                    .query_map(params![category.slug()], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        conn.close().await?;

        tracing::debug!("Loaded {} stored articles for {}", articles.len(), category);
        Ok(articles)
    }

    pub async fn get(&self, id: i64) -> Result<Option<StoredArticle>> {
        let conn = self.connect().await?;
        let article = conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
                let article = stmt
                    .query_row(params![id], article_from_row)
                    .optional()?;
                Ok(article)
            })
            .await?;
        conn.close().await?;
        Ok(article)
    }

    /// Returns `false` when no row has this id; that is not an error.
    pub async fn update(&self, id: i64, title: &str, content: &str) -> Result<bool> {
        let title = title.to_string();
        let content = content.to_string();
        let now = timestamp_now();

        let conn = self.connect().await?;
        let changed = conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE articles SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
                    params![title, content, now, id],
                )?;
                Ok(changed)
            })
            .await?;
        conn.close().await?;

        if changed == 0 {
            tracing::debug!("Update skipped, article {} does not exist", id);
        } else {
            tracing::info!("Updated article {}", id);
        }
        Ok(changed > 0)
    }

    /// Idempotent; returns `false` when nothing was removed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.connect().await?;
        let changed = conn
            .call(move |conn| {
                let changed = conn.execute("DELETE FROM articles WHERE id = ?1", params![id])?;
                Ok(changed)
            })
            .await?;
        conn.close().await?;

        if changed == 0 {
            tracing::debug!("Delete skipped, article {} does not exist", id);
        } else {
            tracing::info!("Deleted article {}", id);
        }
        Ok(changed > 0)
    }
}

// Fixed-width UTC so lexical order in SQL matches time order.
fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Rows written by hand with sqlite's datetime('now')
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn timestamp_column(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_datetime(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("invalid timestamp '{raw}'").into(),
        )
    })
}

fn article_from_row(row: &Row) -> rusqlite::Result<StoredArticle> {
    let category: String = row.get(1)?;
    let category = category.parse::<Category>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, e.to_string().into())
    })?;

    Ok(StoredArticle {
        id: row.get(0)?,
        category,
        title: row.get(2)?,
        content: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        updated_at: timestamp_column(row, 5)?,
    })
}
