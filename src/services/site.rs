use crate::error::StoreError;
use crate::models::{
    AboutPage, FooterSection, HeroSection, HomeSection, NavigationLink, NewNavigationLink, Quote,
    SectionType, SiteMetadata,
};
use crate::Database;
use rusqlite::OptionalExtension;
use std::str::FromStr;

pub fn get_site_metadata(db: &Database) -> Result<Option<SiteMetadata>, StoreError> {
    let conn = db.get()?;
    let metadata = conn
        .query_row(
            "SELECT site_name, tagline, footer_text, contact_email, contact_phone, \
             contact_address, facebook_url, twitter_url, instagram_url, linkedin_url \
             FROM site_metadata WHERE id = 1",
            [],
            |row| {
                Ok(SiteMetadata {
                    site_name: row.get(0)?,
                    tagline: row.get(1)?,
                    footer_text: row.get(2)?,
                    contact_email: row.get(3)?,
                    contact_phone: row.get(4)?,
                    contact_address: row.get(5)?,
                    facebook_url: row.get(6)?,
                    twitter_url: row.get(7)?,
                    instagram_url: row.get(8)?,
                    linkedin_url: row.get(9)?,
                })
            },
        )
        .optional()?;
    Ok(metadata)
}

pub fn set_site_metadata(db: &Database, metadata: &SiteMetadata) -> Result<(), StoreError> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO site_metadata (id, site_name, tagline, footer_text, contact_email, \
         contact_phone, contact_address, facebook_url, twitter_url, instagram_url, linkedin_url) \
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) \
         ON CONFLICT(id) DO UPDATE SET site_name = ?1, tagline = ?2, footer_text = ?3, \
         contact_email = ?4, contact_phone = ?5, contact_address = ?6, facebook_url = ?7, \
         twitter_url = ?8, instagram_url = ?9, linkedin_url = ?10",
        (
            &metadata.site_name,
            &metadata.tagline,
            &metadata.footer_text,
            &metadata.contact_email,
            &metadata.contact_phone,
            &metadata.contact_address,
            &metadata.facebook_url,
            &metadata.twitter_url,
            &metadata.instagram_url,
            &metadata.linkedin_url,
        ),
    )?;
    Ok(())
}

pub fn list_navigation(db: &Database, active_only: bool) -> Result<Vec<NavigationLink>, StoreError> {
    let conn = db.get()?;
    let mut sql = String::from("SELECT id, title, url, position, is_active FROM navigation_links");
    if active_only {
        sql.push_str(" WHERE is_active = 1");
    }
    sql.push_str(" ORDER BY position, id");

    let mut stmt = conn.prepare(&sql)?;
    let links = stmt
        .query_map([], |row| {
            Ok(NavigationLink {
                id: row.get(0)?,
                title: row.get(1)?,
                url: row.get(2)?,
                position: row.get(3)?,
                is_active: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(links)
}

pub fn create_navigation_link(db: &Database, link: &NewNavigationLink) -> Result<i64, StoreError> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO navigation_links (title, url, position, is_active) VALUES (?, ?, ?, ?)",
        (&link.title, &link.url, link.position, link.is_active),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_navigation_link(db: &Database, id: i64) -> Result<(), StoreError> {
    let conn = db.get()?;
    conn.execute("DELETE FROM navigation_links WHERE id = ?", [id])?;
    Ok(())
}

pub fn list_footer_sections(db: &Database) -> Result<Vec<FooterSection>, StoreError> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, title, content, position FROM footer_sections ORDER BY position, id",
    )?;
    let sections = stmt
        .query_map([], |row| {
            Ok(FooterSection {
                id: row.get(0)?,
                title: row.get(1)?,
                content: row.get(2)?,
                position: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sections)
}

pub fn create_footer_section(
    db: &Database,
    title: &str,
    content: &str,
    position: i64,
) -> Result<i64, StoreError> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO footer_sections (title, content, position) VALUES (?, ?, ?)",
        (title, content, position),
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_hero(db: &Database) -> Result<Option<HeroSection>, StoreError> {
    let conn = db.get()?;
    let hero = conn
        .query_row(
            "SELECT title, description, cta_text, cta_link FROM hero_section WHERE id = 1",
            [],
            |row| {
                Ok(HeroSection {
                    title: row.get(0)?,
                    description: row.get(1)?,
                    cta_text: row.get(2)?,
                    cta_link: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(hero)
}

pub fn set_hero(db: &Database, hero: &HeroSection) -> Result<(), StoreError> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO hero_section (id, title, description, cta_text, cta_link) \
         VALUES (1, ?1, ?2, ?3, ?4) \
         ON CONFLICT(id) DO UPDATE SET title = ?1, description = ?2, cta_text = ?3, cta_link = ?4",
        (&hero.title, &hero.description, &hero.cta_text, &hero.cta_link),
    )?;
    Ok(())
}

/// One content block per section type; writing an existing type replaces it.
pub fn upsert_home_section(
    db: &Database,
    section_type: SectionType,
    title: &str,
    description: &str,
    cta_text: &str,
    cta_link: &str,
) -> Result<(), StoreError> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO home_sections (section_type, title, description, cta_text, cta_link) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(section_type) DO UPDATE SET title = ?2, description = ?3, \
         cta_text = ?4, cta_link = ?5",
        (
            section_type.to_string(),
            title,
            description,
            cta_text,
            cta_link,
        ),
    )?;
    Ok(())
}

pub fn list_home_sections(db: &Database) -> Result<Vec<HomeSection>, StoreError> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT id, section_type, title, description, cta_text, cta_link FROM home_sections",
    )?;
    let sections = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(sections
        .into_iter()
        .filter_map(|(id, ty, title, description, cta_text, cta_link)| {
            SectionType::from_str(&ty).ok().map(|section_type| HomeSection {
                id,
                section_type,
                title,
                description,
                cta_text,
                cta_link,
            })
        })
        .collect())
}

pub fn add_quote(db: &Database, text: &str, author: &str) -> Result<i64, StoreError> {
    let conn = db.get()?;
    conn.execute(
        "INSERT INTO quotes (text, author) VALUES (?, ?)",
        (text, author),
    )?;
    Ok(conn.last_insert_rowid())
}

/// The quote shown beside the article listing; newest wins.
pub fn current_quote(db: &Database) -> Result<Option<Quote>, StoreError> {
    let conn = db.get()?;
    let quote = conn
        .query_row(
            "SELECT id, text, author, created_at FROM quotes ORDER BY id DESC LIMIT 1",
            [],
            |row| {
                Ok(Quote {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    author: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(quote)
}

pub fn get_about_page(db: &Database) -> Result<Option<AboutPage>, StoreError> {
    let conn = db.get()?;
    let about = conn
        .query_row(
            "SELECT intro, mission, body, process_steps, closing FROM about_page WHERE id = 1",
            [],
            |row| {
                let steps_json: String = row.get(3)?;
                Ok(AboutPage {
                    intro: row.get(0)?,
                    mission: row.get(1)?,
                    body: row.get(2)?,
                    process_steps: serde_json::from_str(&steps_json).unwrap_or_default(),
                    closing: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(about)
}

pub fn set_about_page(db: &Database, about: &AboutPage) -> Result<(), StoreError> {
    let conn = db.get()?;
    let steps_json = serde_json::to_string(&about.process_steps).unwrap_or_else(|_| "[]".into());
    conn.execute(
        "INSERT INTO about_page (id, intro, mission, body, process_steps, closing) \
         VALUES (1, ?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(id) DO UPDATE SET intro = ?1, mission = ?2, body = ?3, \
         process_steps = ?4, closing = ?5",
        (
            &about.intro,
            &about.mission,
            &about.body,
            &steps_json,
            &about.closing,
        ),
    )?;
    Ok(())
}
