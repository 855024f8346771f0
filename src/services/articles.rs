use crate::error::StoreError;
use crate::models::{Article, ArticleWithTags, NewArticle, UpdateArticle};
use crate::services::rich_text;
use crate::services::slug::{self, Clock};
use crate::services::tags;
use crate::Database;
use rusqlite::{Connection, OptionalExtension};

const ARTICLE_COLUMNS: &str = "id, slug, title, summary, body_markdown, body_html, evidence, \
     evidence_sha256, category, author, published, featured, meta_description, \
     published_at, created_at, updated_at";

/// Insert a new article, allocating its slug against the articles namespace.
/// The advisory membership check runs first; a UNIQUE-index conflict at
/// write time is recovered by re-deriving the candidate, up to the retry
/// budget. Article row and tag associations commit in one transaction.
pub fn create_article(
    db: &Database,
    clock: &dyn Clock,
    input: NewArticle,
) -> Result<i64, StoreError> {
    let body_html = rich_text::render_markdown(&input.body_markdown);

    let mut conn = db.get()?;
    let tx = conn.transaction()?;

    let (mut candidate, mut at) = slug::allocate_slug(&input.title, clock, |s| {
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
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            (
                &candidate,
                &input.title,
                &input.summary,
                &input.body_markdown,
                &body_html,
                &input.evidence,
                &input.evidence_sha256,
                &input.category,
                &input.author,
                input.published,
                input.featured,
                &input.meta_description,
                at.to_rfc3339(),
            ),
        );
        match inserted {
            Ok(_) => break tx.last_insert_rowid(),
            Err(err) if slug::is_slug_conflict(&err, "articles") => {
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
            "INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)",
            (article_id, tag_id),
        )?;
    }

    tx.commit()?;
    tracing::info!(slug = %candidate, "article created");
    Ok(article_id)
}

/// Operator edit of mutable fields. The slug and publication timestamp are
/// never rewritten, whatever the input carries.
pub fn update_article(db: &Database, id: i64, input: UpdateArticle) -> Result<(), StoreError> {
    let mut conn = db.get()?;
    let tx = conn.transaction()?;

    let current = tx.query_row(
        &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = ?"),
        [id],
        row_to_article,
    )?;

    let title = input.title.unwrap_or(current.title);
    let summary = input.summary.unwrap_or(current.summary);
    let body_markdown = input.body_markdown.unwrap_or(current.body_markdown);
    let body_html = rich_text::render_markdown(&body_markdown);
    let category = input.category.unwrap_or(current.category);
    let author = input.author.or(current.author);
    let published = input.published.unwrap_or(current.published);
    let featured = input.featured.unwrap_or(current.featured);
    let meta_description = input.meta_description.or(current.meta_description);

    tx.execute(
        r#"
        UPDATE articles SET title = ?, summary = ?, body_markdown = ?, body_html = ?,
            category = ?, author = ?, published = ?, featured = ?, meta_description = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
        (
            &title,
            &summary,
            &body_markdown,
            &body_html,
            &category,
            &author,
            published,
            featured,
            &meta_description,
            id,
        ),
    )?;

    if let Some(tag_names) = input.tags {
        tx.execute("DELETE FROM article_tags WHERE article_id = ?", [id])?;
        for name in &tag_names {
            let tag_id = tags::ensure_tag(&tx, name)?;
            tx.execute(
                "INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?, ?)",
                (id, tag_id),
            )?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Any article regardless of published state. Operator-facing.
pub fn get_article_by_slug(
    db: &Database,
    slug: &str,
) -> Result<Option<ArticleWithTags>, StoreError> {
    let conn = db.get()?;
    let article = conn
        .query_row(
            &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = ?"),
            [slug],
            row_to_article,
        )
        .optional()?;

    match article {
        Some(a) => Ok(Some(with_tags(&conn, a)?)),
        None => Ok(None),
    }
}

/// Public read path: absent and unpublished articles look identical.
pub fn get_published_by_slug(
    db: &Database,
    slug: &str,
) -> Result<Option<ArticleWithTags>, StoreError> {
    let conn = db.get()?;
    let article = conn
        .query_row(
            &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE slug = ? AND published = 1"),
            [slug],
            row_to_article,
        )
        .optional()?;

    match article {
        Some(a) => Ok(Some(with_tags(&conn, a)?)),
        None => Ok(None),
    }
}

/// Published articles newest-first, optionally narrowed to a category
/// and/or a tag slug.
pub fn list_published(
    db: &Database,
    category: Option<&str>,
    tag_slug: Option<&str>,
    limit: usize,
    offset: usize,
) -> Result<Vec<ArticleWithTags>, StoreError> {
    let conn = db.get()?;

    let mut sql = format!(
        "SELECT DISTINCT a.id, a.slug, a.title, a.summary, a.body_markdown, a.body_html, \
         a.evidence, a.evidence_sha256, a.category, a.author, a.published, a.featured, \
         a.meta_description, a.published_at, a.created_at, a.updated_at FROM articles a"
    );
    let mut params: Vec<String> = Vec::new();

    if tag_slug.is_some() {
        sql.push_str(
            " JOIN article_tags art ON a.id = art.article_id JOIN tags t ON art.tag_id = t.id",
        );
    }
    sql.push_str(" WHERE a.published = 1");
    if let Some(c) = category {
        sql.push_str(" AND a.category = ?");
        params.push(c.to_string());
    }
    if let Some(t) = tag_slug {
        sql.push_str(" AND t.slug = ?");
        params.push(t.to_string());
    }
    sql.push_str(" ORDER BY a.published_at DESC LIMIT ? OFFSET ?");

    let mut stmt = conn.prepare(&sql)?;
    let param_refs: Vec<&dyn rusqlite::ToSql> = params
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .chain(std::iter::once(&limit as &dyn rusqlite::ToSql))
        .chain(std::iter::once(&offset as &dyn rusqlite::ToSql))
        .collect();

    let articles = stmt
        .query_map(param_refs.as_slice(), row_to_article)?
        .collect::<Result<Vec<_>, _>>()?;

    articles.into_iter().map(|a| with_tags(&conn, a)).collect()
}

pub fn count_published(
    db: &Database,
    category: Option<&str>,
    tag_slug: Option<&str>,
) -> Result<i64, StoreError> {
    let conn = db.get()?;

    let mut sql = String::from("SELECT COUNT(DISTINCT a.id) FROM articles a");
    let mut params: Vec<String> = Vec::new();

    if tag_slug.is_some() {
        sql.push_str(
            " JOIN article_tags art ON a.id = art.article_id JOIN tags t ON art.tag_id = t.id",
        );
    }
    sql.push_str(" WHERE a.published = 1");
    if let Some(c) = category {
        sql.push_str(" AND a.category = ?");
        params.push(c.to_string());
    }
    if let Some(t) = tag_slug {
        sql.push_str(" AND t.slug = ?");
        params.push(t.to_string());
    }

    let param_refs: Vec<&dyn rusqlite::ToSql> =
        params.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;
    Ok(count)
}

/// Most recent published article flagged as featured, if any.
pub fn featured_article(db: &Database) -> Result<Option<ArticleWithTags>, StoreError> {
    let conn = db.get()?;
    let article = conn
        .query_row(
            &format!(
                "SELECT {ARTICLE_COLUMNS} FROM articles \
                 WHERE featured = 1 AND published = 1 ORDER BY published_at DESC LIMIT 1"
            ),
            [],
            row_to_article,
        )
        .optional()?;

    match article {
        Some(a) => Ok(Some(with_tags(&conn, a)?)),
        None => Ok(None),
    }
}

/// Published articles sharing at least one tag with `article_id`, excluding
/// the article itself. Falls back to the newest published articles when
/// nothing overlaps.
pub fn related_articles(
    db: &Database,
    article_id: i64,
    limit: usize,
) -> Result<Vec<ArticleWithTags>, StoreError> {
    let conn = db.get()?;

    let mut stmt = conn.prepare(
        "SELECT DISTINCT a.id, a.slug, a.title, a.summary, a.body_markdown, a.body_html, \
         a.evidence, a.evidence_sha256, a.category, a.author, a.published, a.featured, \
         a.meta_description, a.published_at, a.created_at, a.updated_at \
         FROM articles a \
         JOIN article_tags art ON a.id = art.article_id \
         WHERE art.tag_id IN (SELECT tag_id FROM article_tags WHERE article_id = ?) \
           AND a.id != ? AND a.published = 1 \
         ORDER BY a.published_at DESC LIMIT ?",
    )?;
    let related = stmt
        .query_map((article_id, article_id, limit), row_to_article)?
        .collect::<Result<Vec<_>, _>>()?;

    let related = if related.is_empty() {
        let mut stmt = conn.prepare(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles \
             WHERE id != ? AND published = 1 ORDER BY published_at DESC LIMIT ?"
        ))?;
        let fallback = stmt
            .query_map((article_id, limit), row_to_article)?
            .collect::<Result<Vec<_>, _>>()?;
        fallback
    } else {
        related
    };

    related.into_iter().map(|a| with_tags(&conn, a)).collect()
}

pub(crate) fn row_to_article(row: &rusqlite::Row) -> rusqlite::Result<Article> {
    Ok(Article {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        summary: row.get(3)?,
        body_markdown: row.get(4)?,
        body_html: row.get(5)?,
        evidence: row.get(6)?,
        evidence_sha256: row.get(7)?,
        category: row.get(8)?,
        author: row.get(9)?,
        published: row.get(10)?,
        featured: row.get(11)?,
        meta_description: row.get(12)?,
        published_at: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

fn with_tags(conn: &Connection, article: Article) -> Result<ArticleWithTags, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.slug, t.created_at FROM tags t \
         JOIN article_tags art ON t.id = art.tag_id WHERE art.article_id = ? ORDER BY t.name",
    )?;
    let tag_list = stmt
        .query_map([article.id], tags::row_to_tag)?
        .collect::<Result<Vec<_>, _>>()?;

    let reading_time_minutes = rich_text::reading_time_minutes(&article.body_markdown);

    Ok(ArticleWithTags {
        article,
        tags: tag_list,
        reading_time_minutes,
    })
}
