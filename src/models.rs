//! Domain models that mirror the `articles` table. They stay plain data holders
//! so the persistence layer and the screens can pass them around freely.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A stored knowledge-base entry. Articles are append-only: once the store
/// hands one back, none of its fields change.
pub struct Article {
    /// Primary key assigned by SQLite on insert.
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Free-form label, there is no category table.
    pub category: String,
    /// Unstructured tag text exactly as the user typed it.
    pub tags: Option<String>,
    /// Path to an image on disk. Only read when a search result is previewed.
    pub image_path: Option<String>,
}

impl Article {
    /// Footer text for the tags bar of the search screen.
    pub fn tags_label(&self) -> String {
        match self.tags.as_deref() {
            Some(tags) if !tags.trim().is_empty() => format!("Tags: {tags}"),
            _ => "Tags: None".to_string(),
        }
    }

    /// The image path as stored, unless it is missing or blank.
    pub fn image(&self) -> Option<&str> {
        self.image_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Insert payload for a new article. The store writes these values verbatim;
/// validation belongs to whoever builds the payload.
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Option<String>,
    pub image_path: Option<String>,
}

impl NewArticle {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags: None,
            image_path: None,
        }
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Attach the id the store assigned to produce the stored form.
    pub fn into_article(self, id: i64) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            category: self.category,
            tags: self.tags,
            image_path: self.image_path,
        }
    }
}
