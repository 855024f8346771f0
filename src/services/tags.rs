use crate::error::StoreError;
use crate::models::{Tag, TagWithCount};
use crate::services::slug::generate_slug;
use crate::Database;
use rusqlite::{Connection, OptionalExtension};

/// Insert the tag if its slug is new, and return its id either way. Shared
/// by article and submission tag attachment.
pub(crate) fn ensure_tag(conn: &Connection, name: &str) -> Result<i64, rusqlite::Error> {
    let slug = generate_slug(name);
    conn.execute(
        "INSERT OR IGNORE INTO tags (name, slug) VALUES (?, ?)",
        (name, &slug),
    )?;
    conn.query_row("SELECT id FROM tags WHERE slug = ?", [&slug], |row| {
        row.get(0)
    })
}

pub(crate) fn row_to_tag(row: &rusqlite::Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn create_tag(db: &Database, name: &str) -> Result<i64, StoreError> {
    let conn = db.get()?;
    Ok(ensure_tag(&conn, name)?)
}

pub fn get_tag_by_slug(db: &Database, slug: &str) -> Result<Option<Tag>, StoreError> {
    let conn = db.get()?;
    let tag = conn
        .query_row(
            "SELECT id, name, slug, created_at FROM tags WHERE slug = ?",
            [slug],
            row_to_tag,
        )
        .optional()?;
    Ok(tag)
}

pub fn list_tags(db: &Database) -> Result<Vec<Tag>, StoreError> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("SELECT id, name, slug, created_at FROM tags ORDER BY name")?;
    let tags = stmt
        .query_map([], row_to_tag)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

/// Tags with the number of published articles carrying each, most-used
/// first. Tags only referenced by submissions count zero but still appear.
pub fn list_tags_with_counts(db: &Database) -> Result<Vec<TagWithCount>, StoreError> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        r#"
        SELECT t.id, t.name, t.slug, t.created_at, COUNT(a.id) AS article_count
        FROM tags t
        LEFT JOIN article_tags art ON t.id = art.tag_id
        LEFT JOIN articles a ON art.article_id = a.id AND a.published = 1
        GROUP BY t.id
        ORDER BY article_count DESC, t.name
        "#,
    )?;
    let tags = stmt
        .query_map([], |row| {
            Ok(TagWithCount {
                tag: Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    slug: row.get(2)?,
                    created_at: row.get(3)?,
                },
                article_count: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn delete_tag(db: &Database, id: i64) -> Result<(), StoreError> {
    let conn = db.get()?;
    conn.execute("DELETE FROM tags WHERE id = ?", [id])?;
    Ok(())
}

/// Drop tags no article or submission references anymore.
pub fn cleanup_orphaned_tags(db: &Database) -> Result<usize, StoreError> {
    let conn = db.get()?;
    let deleted = conn.execute(
        "DELETE FROM tags WHERE id NOT IN (SELECT tag_id FROM article_tags)
         AND id NOT IN (SELECT tag_id FROM submission_tags)",
        [],
    )?;
    Ok(deleted)
}
