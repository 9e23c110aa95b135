use crate::content::markup;
use crate::error::ValidationError;
use crate::models::{Category, StoredArticle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTarget {
    Create(Category),
    Update { id: i64, category: Category },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorField {
    #[default]
    Title,
    Content,
}

/// In-progress article form with a live preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub target: EditorTarget,
    pub title: String,
    pub content: String,
    pub field: EditorField,
}

impl Editor {
    pub fn create(category: Category) -> Self {
        Self {
            target: EditorTarget::Create(category),
            title: String::new(),
            content: String::new(),
            field: EditorField::Title,
        }
    }

    pub fn edit(article: &StoredArticle) -> Self {
        Self {
            target: EditorTarget::Update {
                id: article.id,
                category: article.category,
            },
            title: article.title.clone(),
            content: article.content.clone(),
            field: EditorField::Content,
        }
    }

    pub fn heading(&self) -> String {
        match self.target {
            EditorTarget::Create(category) => format!(" New article in {} ", category.label()),
            EditorTarget::Update { id, category } => {
                format!(" Edit article #{id} in {} ", category.label())
            }
        }
    }

    fn focused(&mut self) -> &mut String {
        match self.field {
            EditorField::Title => &mut self.title,
            EditorField::Content => &mut self.content,
        }
    }

    pub fn push(&mut self, c: char) {
        self.focused().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused().pop();
    }

    /// Titles are single-line: Enter moves on to the content.
    pub fn newline(&mut self) {
        match self.field {
            EditorField::Title => self.field = EditorField::Content,
            EditorField::Content => self.content.push('\n'),
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            EditorField::Title => EditorField::Content,
            EditorField::Content => EditorField::Title,
        };
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_draft(&self.title, &self.content)
    }

    pub fn preview(&self, width: usize) -> String {
        markup::render(&self.content, width)
    }
}

pub fn validate_draft(title: &str, content: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}
