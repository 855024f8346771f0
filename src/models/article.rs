use super::Tag;
use serde::{Deserialize, Serialize};

/// Display name forced onto every article produced by promotion. Sources are
/// never identified, whatever the submission carried.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub body_markdown: String,
    pub body_html: String,
    pub evidence: Option<String>,
    pub evidence_sha256: Option<String>,
    pub category: String,
    pub author: Option<String>,
    pub published: bool,
    pub featured: bool,
    pub meta_description: Option<String>,
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArticleWithTags {
    #[serde(flatten)]
    pub article: Article,
    pub tags: Vec<Tag>,
    pub reading_time_minutes: u32,
}

#[derive(Debug, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub body_markdown: String,
    #[serde(default)]
    pub category: String,
    pub author: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    pub meta_description: Option<String>,
    pub evidence: Option<String>,
    pub evidence_sha256: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Operator edit. Slug and publication timestamp are deliberately absent:
/// both are immutable once the row exists.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body_markdown: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub meta_description: Option<String>,
    pub tags: Option<Vec<String>>,
}
