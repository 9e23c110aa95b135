mod article;
mod category;

pub use article::{Article, FileArticle, Origin, StoredArticle};
pub use category::Category;
