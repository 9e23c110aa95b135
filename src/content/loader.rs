use std::path::PathBuf;

use crate::error::Result;
use crate::models::{Category, FileArticle};

const EXTENSIONS: [&str; 3] = ["txt", "md", "html"];

/// Read-only view over `<root>/<category>/` directories.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scans the category directory on every call; sorted by file name.
    pub fn load(&self, category: Category) -> Result<Vec<FileArticle>> {
        let dir = self.root.join(category.slug());
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<(String, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !is_article_file(name) || !path.is_file() {
                continue;
            }
            entries.push((name.to_string(), path));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut articles = Vec::with_capacity(entries.len());
        for (name, path) in entries {
            let content = std::fs::read_to_string(&path)?;
            articles.push(FileArticle {
                category,
                title: strip_extension(&name).to_string(),
                content,
                path,
            });
        }

        tracing::debug!("Loaded {} file articles from {}", articles.len(), dir.display());
        Ok(articles)
    }
}

fn is_article_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && EXTENSIONS.contains(&ext),
        None => false,
    }
}

fn strip_extension(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}
