use crate::models::{AboutPage, HeroSection, NewNavigationLink, SectionType, SiteMetadata};
use crate::services::{auth, site};
use crate::Database;
use anyhow::Result;
use serde::Serialize;

/// What a bootstrap run actually did. Re-running against a seeded database
/// reports `false` everywhere.
#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub seeded_metadata: bool,
    pub seeded_hero: bool,
    pub seeded_navigation: bool,
    pub seeded_footer: bool,
    pub seeded_home_sections: bool,
    pub seeded_about: bool,
}

/// Seed the operator-curated site chrome with starting content. Explicit and
/// idempotent: every table is checked for existing rows first, and nothing
/// here runs implicitly at startup.
pub fn seed_site_defaults(db: &Database, site_name: &str) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if site::get_site_metadata(db)?.is_none() {
        site::set_site_metadata(
            db,
            &SiteMetadata {
                site_name: site_name.to_string(),
                tagline: "Independent reporting, sourced from the inside.".to_string(),
                footer_text: format!("{site_name}. All rights reserved."),
                contact_email: String::new(),
                contact_phone: String::new(),
                contact_address: String::new(),
                facebook_url: String::new(),
                twitter_url: String::new(),
                instagram_url: String::new(),
                linkedin_url: String::new(),
            },
        )?;
        report.seeded_metadata = true;
    }

    if site::get_hero(db)?.is_none() {
        site::set_hero(
            db,
            &HeroSection {
                title: format!("Welcome to {site_name}"),
                description: "Read the stories institutions would rather keep quiet, \
                              or share one of your own."
                    .to_string(),
                cta_text: "Submit your story".to_string(),
                cta_link: "/submit".to_string(),
            },
        )?;
        report.seeded_hero = true;
    }

    if site::list_navigation(db, false)?.is_empty() {
        let defaults = [
            ("Home", "/"),
            ("Exposes", "/articles"),
            ("Submit a story", "/submit"),
            ("About", "/about"),
            ("Contact", "/contact"),
        ];
        for (position, (title, url)) in defaults.iter().enumerate() {
            site::create_navigation_link(
                db,
                &NewNavigationLink {
                    title: title.to_string(),
                    url: url.to_string(),
                    position: position as i64,
                    is_active: true,
                },
            )?;
        }
        report.seeded_navigation = true;
    }

    if site::list_footer_sections(db)?.is_empty() {
        site::create_footer_section(db, "About", "", 0)?;
        site::create_footer_section(db, "Quick links", "", 1)?;
        report.seeded_footer = true;
    }

    if site::list_home_sections(db)?.is_empty() {
        for section_type in SectionType::ALL {
            site::upsert_home_section(db, section_type, "", "", "", "")?;
        }
        report.seeded_home_sections = true;
    }

    if site::get_about_page(db)?.is_none() {
        site::set_about_page(
            db,
            &AboutPage {
                intro: String::new(),
                mission: String::new(),
                body: String::new(),
                process_steps: Vec::new(),
                closing: String::new(),
            },
        )?;
        report.seeded_about = true;
    }

    Ok(report)
}

/// Create the first operator account unless one already exists. Returns
/// whether an account was created.
pub fn ensure_operator(
    db: &Database,
    username: &str,
    email: &str,
    password: &str,
) -> Result<bool> {
    if auth::has_operators(db)? {
        tracing::info!("operator account already present, skipping");
        return Ok(false);
    }
    auth::create_operator(db, username, email, password)?;
    tracing::info!(%username, "operator account created");
    Ok(true)
}
