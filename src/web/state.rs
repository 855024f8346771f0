use crate::web::security::RateLimiter;
use crate::{Config, Database};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub media_dir: PathBuf,
    pub intake_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: Config, db: Database) -> Self {
        let media_dir = PathBuf::from(&config.media.upload_dir);
        let intake_limiter = Arc::new(RateLimiter::new(
            config.intake.max_requests,
            Duration::from_secs(config.intake.window_secs),
        ));

        Self {
            config,
            db,
            media_dir,
            intake_limiter,
        }
    }
}
