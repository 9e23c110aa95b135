use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Db,
    File,
}

/// Admin-authored article kept in the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredArticle {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Static article read from `<articles_dir>/<category>/<name>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileArticle {
    pub category: Category,
    pub title: String,
    pub content: String,
    #[serde(skip)]
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source")]
pub enum Article {
    #[serde(rename = "db")]
    Stored(StoredArticle),
    #[serde(rename = "file")]
    File(FileArticle),
}

impl Article {
    pub fn title(&self) -> &str {
        match self {
            Article::Stored(a) => &a.title,
            Article::File(a) => &a.title,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Article::Stored(a) => &a.content,
            Article::File(a) => &a.content,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Article::Stored(a) => a.category,
            Article::File(a) => a.category,
        }
    }

    pub fn origin(&self) -> Origin {
        match self {
            Article::Stored(_) => Origin::Db,
            Article::File(_) => Origin::File,
        }
    }

    /// Only stored articles can be edited or deleted.
    pub fn id(&self) -> Option<i64> {
        match self {
            Article::Stored(a) => Some(a.id),
            Article::File(_) => None,
        }
    }

    pub fn as_stored(&self) -> Option<&StoredArticle> {
        match self {
            Article::Stored(a) => Some(a),
            Article::File(_) => None,
        }
    }
}
