use crate::error::{PromotionError, StoreError, ValidationError};
use crate::models::{
    Category, NewSubmission, Promotion, Submission, SubmissionWithTags, ANONYMOUS_AUTHOR,
};
use crate::services::rich_text;
use crate::services::slug::{self, Clock};
use crate::services::tags;
use crate::Database;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::str::FromStr;

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_META_DESCRIPTION_LENGTH: usize = 160;

const SUBMISSION_COLUMNS: &str = "id, slug, title, summary, story_markdown, story_html, \
     evidence, evidence_sha256, category, meta_description, promoted_article_id, created_at";

/// Field-level intake validation, run before any storage write. Evidence
/// constraints are checked separately by the evidence service, before the
/// upload is stored.
pub fn validate_intake(
    title: &str,
    summary: &str,
    story: &str,
    meta_description: Option<&str>,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::Required("title"));
    }
    if title.len() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title",
            max: MAX_TITLE_LENGTH,
        });
    }
    if summary.trim().is_empty() {
        return Err(ValidationError::Required("summary"));
    }
    if story.trim().is_empty() {
        return Err(ValidationError::Required("story"));
    }
    if let Some(meta) = meta_description {
        if meta.len() > MAX_META_DESCRIPTION_LENGTH {
            return Err(ValidationError::TooLong {
                field: "meta_description",
                max: MAX_META_DESCRIPTION_LENGTH,
            });
        }
    }
    Ok(())
}

/// Persist a validated story tip. The slug is allocated against the
/// submissions namespace; submission row and tag references commit in one
/// transaction, and `created_at` matches the allocated slug suffix.
pub fn create_submission(
    db: &Database,
    clock: &dyn Clock,
    input: NewSubmission,
) -> Result<SubmissionWithTags, StoreError> {
    let story_html = rich_text::render_markdown(&input.story_markdown);

    let mut conn = db.get()?;
    let tx = conn.transaction()?;

    let (mut candidate, mut at) = slug::allocate_slug(&input.title, clock, |s| {
        Ok(tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM submissions WHERE slug = ?)",
            [s],
            |row| row.get::<_, bool>(0),
        )?)
    })?;

    let (evidence, evidence_sha256) = match &input.evidence {
        Some(e) => (Some(e.filename.clone()), Some(e.sha256.clone())),
        None => (None, None),
    };

    let mut attempts = 0;
    let submission_id = loop {
        let inserted = tx.execute(
            r#"
            INSERT INTO submissions (slug, title, summary, story_markdown, story_html,
                evidence, evidence_sha256, category, meta_description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            (
                &candidate,
                &input.title,
                &input.summary,
                &input.story_markdown,
                &story_html,
                &evidence,
                &evidence_sha256,
                input.category.to_string(),
                &input.meta_description,
                at.to_rfc3339(),
            ),
        );
        match inserted {
            Ok(_) => break tx.last_insert_rowid(),
            Err(err) if slug::is_slug_conflict(&err, "submissions") => {
                attempts += 1;
                if attempts >= slug::MAX_SLUG_ATTEMPTS {
                    return Err(StoreError::SlugExhausted {
                        base: slug::generate_slug(&input.title),
                        attempts,
                    });
                }
                at = slug::next_attempt(clock, at);
                candidate = slug::timestamp_slug(&input.title, at);
            }
            Err(err) => return Err(err.into()),
        }
    };

    for name in &input.tags {
        let tag_id = tags::ensure_tag(&tx, name)?;
        tx.execute(
            "INSERT OR IGNORE INTO submission_tags (submission_id, tag_id) VALUES (?, ?)",
            (submission_id, tag_id),
        )?;
    }

    tx.commit()?;
    tracing::info!(slug = %candidate, "submission stored");

    let submission = conn.query_row(
        &format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?"),
        [submission_id],
        row_to_submission,
    )?;
    with_tags(&conn, submission)
}

pub fn get_submission_by_slug(
    db: &Database,
    slug: &str,
) -> Result<Option<SubmissionWithTags>, StoreError> {
    let conn = db.get()?;
    let submission = conn
        .query_row(
            &format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE slug = ?"),
            [slug],
            row_to_submission,
        )
        .optional()?;

    match submission {
        Some(s) => Ok(Some(with_tags(&conn, s)?)),
        None => Ok(None),
    }
}

/// Operator listing, newest first. `pending_only` hides submissions that
/// already produced an article.
pub fn list_submissions(
    db: &Database,
    pending_only: bool,
    limit: usize,
    offset: usize,
) -> Result<Vec<SubmissionWithTags>, StoreError> {
    let conn = db.get()?;
    let mut sql = format!("SELECT {SUBMISSION_COLUMNS} FROM submissions");
    if pending_only {
        sql.push_str(" WHERE promoted_article_id IS NULL");
    }
    sql.push_str(" ORDER BY created_at DESC LIMIT ? OFFSET ?");

    let mut stmt = conn.prepare(&sql)?;
    let submissions = stmt
        .query_map((limit, offset), row_to_submission)?
        .collect::<Result<Vec<_>, _>>()?;

    submissions
        .into_iter()
        .map(|s| with_tags(&conn, s))
        .collect()
}

/// Publish a pending submission as an article.
///
/// Runs as a single transaction: article insert, tag-reference copy, and the
/// promotion marker all commit together, so readers never observe an article
/// whose tag set lags its content. Any failure before commit leaves the
/// submission pending with no article row.
///
/// Retried promotions are safe: once `promoted_article_id` is set, the call
/// returns the original article instead of creating another.
pub fn promote_submission(
    db: &Database,
    clock: &dyn Clock,
    media_dir: &Path,
    submission_slug: &str,
) -> Result<Promotion, PromotionError> {
    let mut conn = db.get()?;
    let tx = conn.transaction()?;

    let submission = tx
        .query_row(
            &format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE slug = ?"),
            [submission_slug],
            row_to_submission,
        )
        .optional()?
        .ok_or_else(|| PromotionError::NotFound(submission_slug.to_string()))?;

    if let Some(article_id) = submission.promoted_article_id {
        let article_slug: String = tx.query_row(
            "SELECT slug FROM articles WHERE id = ?",
            [article_id],
            |row| row.get(0),
        )?;
        tracing::info!(submission = %submission.slug, article = %article_slug,
            "promotion retried on an already-promoted submission");
        return Ok(Promotion {
            article_id,
            article_slug,
            newly_created: false,
        });
    }

    // The evidence reference is copied, not re-uploaded; a dangling
    // reference would outlive the transaction, so the blob must exist now.
    if let Some(ref filename) = submission.evidence {
        if !media_dir.join(filename).is_file() {
            return Err(PromotionError::MissingEvidence(filename.clone()));
        }
    }

    // The article slug is allocated against the articles namespace; the
    // submission's own slug is never reused.
    let (mut candidate, mut at) = slug::allocate_slug(&submission.title, clock, |s| {
        Ok(tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM articles WHERE slug = ?)",
            [s],
            |row| row.get::<_, bool>(0),
        )?)
    })?;

    let mut attempts = 0;
    let article_id = loop {
        let inserted = tx.execute(
            r#"
            INSERT INTO articles (slug, title, summary, body_markdown, body_html, evidence,
                evidence_sha256, category, author, published, featured, meta_description, published_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 0, ?, ?)
            "#,
            (
                &candidate,
                &submission.title,
                &submission.summary,
                &submission.story_markdown,
                &submission.story_html,
                &submission.evidence,
                &submission.evidence_sha256,
                submission.category.to_string(),
                ANONYMOUS_AUTHOR,
                &submission.meta_description,
                at.to_rfc3339(),
            ),
        );
        match inserted {
            Ok(_) => break tx.last_insert_rowid(),
            Err(err) if slug::is_slug_conflict(&err, "articles") => {
                attempts += 1;
                if attempts >= slug::MAX_SLUG_ATTEMPTS {
                    return Err(StoreError::SlugExhausted {
                        base: slug::generate_slug(&submission.title),
                        attempts,
                    }
                    .into());
                }
                at = slug::next_attempt(clock, at);
                candidate = slug::timestamp_slug(&submission.title, at);
            }
            Err(err) => return Err(err.into()),
        }
    };

    // Tag references are shared, not moved; the submission keeps its set.
    tx.execute(
        "INSERT INTO article_tags (article_id, tag_id) \
         SELECT ?, tag_id FROM submission_tags WHERE submission_id = ?",
        (article_id, submission.id),
    )?;

    tx.execute(
        "UPDATE submissions SET promoted_article_id = ? WHERE id = ?",
        (article_id, submission.id),
    )?;

    tx.commit()?;
    tracing::info!(submission = %submission.slug, article = %candidate, "submission promoted");

    Ok(Promotion {
        article_id,
        article_slug: candidate,
        newly_created: true,
    })
}

fn row_to_submission(row: &rusqlite::Row) -> rusqlite::Result<Submission> {
    Ok(Submission {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        summary: row.get(3)?,
        story_markdown: row.get(4)?,
        story_html: row.get(5)?,
        evidence: row.get(6)?,
        evidence_sha256: row.get(7)?,
        category: Category::from_str(&row.get::<_, String>(8)?).unwrap_or_default(),
        meta_description: row.get(9)?,
        promoted_article_id: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn with_tags(conn: &Connection, submission: Submission) -> Result<SubmissionWithTags, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug, t.created_at FROM tags t \
         JOIN submission_tags st ON t.id = st.tag_id WHERE st.submission_id = ? ORDER BY t.name",
    )?;
    let tag_list = stmt
        .query_map([submission.id], tags::row_to_tag)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SubmissionWithTags {
        submission,
        tags: tag_list,
    })
}
