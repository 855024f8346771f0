use super::{StoredEvidence, Tag};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    UserSubmitted,
    Corruption,
    Investigative,
    Justice,
    Other,
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user-submitted" => Ok(Self::UserSubmitted),
            "corruption" => Ok(Self::Corruption),
            "investigative" => Ok(Self::Investigative),
            "justice" => Ok(Self::Justice),
            "other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserSubmitted => write!(f, "user-submitted"),
            Self::Corruption => write!(f, "corruption"),
            Self::Investigative => write!(f, "investigative"),
            Self::Justice => write!(f, "justice"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub story_markdown: String,
    pub story_html: String,
    pub evidence: Option<String>,
    pub evidence_sha256: Option<String>,
    pub category: Category,
    pub meta_description: Option<String>,
    /// Set exactly once, when promotion commits. NULL means pending.
    pub promoted_article_id: Option<i64>,
    pub created_at: String,
}

impl Submission {
    pub fn is_promoted(&self) -> bool {
        self.promoted_article_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionWithTags {
    #[serde(flatten)]
    pub submission: Submission,
    pub tags: Vec<Tag>,
}

/// Validated intake payload. Evidence, when present, has already been
/// written to the media store.
#[derive(Debug)]
pub struct NewSubmission {
    pub title: String,
    pub summary: String,
    pub story_markdown: String,
    pub category: Category,
    pub meta_description: Option<String>,
    pub evidence: Option<StoredEvidence>,
    pub tags: Vec<String>,
}

/// Outcome of a promotion call. A retried promotion of an already-promoted
/// submission reports the original article with `newly_created = false`.
#[derive(Debug, Clone, Serialize)]
pub struct Promotion {
    pub article_id: i64,
    pub article_slug: String,
    pub newly_created: bool,
}
