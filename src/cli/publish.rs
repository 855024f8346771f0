use crate::models::NewArticle;
use crate::services::slug::SystemClock;
use crate::services::{articles, submissions};
use crate::{Config, Database};
use anyhow::Result;
use std::path::{Path, PathBuf};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config_path: &Path,
    title: String,
    summary: String,
    body_file: PathBuf,
    category: String,
    author: Option<String>,
    meta_description: Option<String>,
    tags: Vec<String>,
    featured: bool,
    draft: bool,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;

    let body_markdown = std::fs::read_to_string(&body_file)?;

    submissions::validate_intake(&title, &summary, &body_markdown, meta_description.as_deref())?;

    let article_id = articles::create_article(
        &db,
        &SystemClock,
        NewArticle {
            title,
            summary,
            body_markdown,
            category,
            author,
            published: !draft,
            featured,
            meta_description,
            evidence: None,
            evidence_sha256: None,
            tags,
        },
    )?;

    println!(
        "Article #{} created{}",
        article_id,
        if draft { " (draft)" } else { " and published" }
    );

    Ok(())
}
