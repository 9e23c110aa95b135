use crate::db::ArticleStore;
use crate::error::Result;
use crate::models::{Article, Category, FileArticle, StoredArticle};

use super::FileLoader;

/// Builds the list a category tab shows: stored articles, then file articles.
#[derive(Debug, Clone)]
pub struct Aggregator {
    store: ArticleStore,
    loader: FileLoader,
}

impl Aggregator {
    pub fn new(store: ArticleStore, loader: FileLoader) -> Self {
        Self { store, loader }
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub async fn aggregate(&self, category: Category) -> Result<Vec<Article>> {
        let stored = self.store.list(category).await?;
        let files = self.loader.load(category)?;
        Ok(merge(stored, files))
    }
}

pub fn merge(stored: Vec<StoredArticle>, files: Vec<FileArticle>) -> Vec<Article> {
    stored
        .into_iter()
        .map(Article::Stored)
        .chain(files.into_iter().map(Article::File))
        .collect()
}
