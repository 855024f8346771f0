use crate::cli::StoryCommand;
use crate::services::slug::SystemClock;
use crate::services::submissions;
use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

pub async fn run(config_path: &Path, command: StoryCommand) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;
    db.migrate()?;

    match command {
        StoryCommand::List { all } => {
            let stories = submissions::list_submissions(&db, !all, 100, 0)?;
            if stories.is_empty() {
                println!("No submissions.");
                return Ok(());
            }
            for s in stories {
                let status = if s.submission.is_promoted() {
                    "promoted"
                } else {
                    "pending"
                };
                println!(
                    "{}  {:<10} [{}] {}",
                    s.submission.created_at, status, s.submission.category, s.submission.slug
                );
            }
        }
        StoryCommand::Promote { slug } => {
            let media_dir = Path::new(&config.media.upload_dir);
            let promotion =
                submissions::promote_submission(&db, &SystemClock, media_dir, &slug)?;
            if promotion.newly_created {
                println!("Promoted '{}' to article '{}'", slug, promotion.article_slug);
            } else {
                println!(
                    "'{}' was already promoted to article '{}'",
                    slug, promotion.article_slug
                );
            }
        }
    }

    Ok(())
}
