use crate::services::{auth, bootstrap};
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

/// Explicit deploy-time setup. Safe to run any number of times: seeding
/// checks for existing rows and the operator account is only created when
/// none exists.
pub async fn run(
    config_path: &Path,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;

    let report = bootstrap::seed_site_defaults(&db, &config.site.title)?;
    println!(
        "Seeded: metadata={} hero={} navigation={} footer={} home_sections={} about={}",
        report.seeded_metadata,
        report.seeded_hero,
        report.seeded_navigation,
        report.seeded_footer,
        report.seeded_home_sections,
        report.seeded_about,
    );

    if auth::has_operators(&db)? {
        println!("Operator account already exists; nothing more to do.");
        return Ok(());
    }

    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Operator password: ")?,
    };

    bootstrap::ensure_operator(&db, username, email, &password)?;
    println!("Operator '{}' created.", username);

    Ok(())
}
