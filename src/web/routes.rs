use super::handlers;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

// Evidence cap plus headroom for the other multipart fields.
const SUBMISSION_BODY_LIMIT: usize = 105 * 1024 * 1024;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::public::home))
        .route("/articles", get(handlers::public::articles))
        .route("/articles/:slug", get(handlers::public::article))
        .route("/tags", get(handlers::public::tags_index))
        .route("/tags/:slug", get(handlers::public::tag_detail))
        .route("/about", get(handlers::public::about))
        .route("/media/:filename", get(handlers::public::serve_media))
        .route(
            "/submissions",
            post(handlers::intake::submit_story)
                .layer(DefaultBodyLimit::max(SUBMISSION_BODY_LIMIT)),
        )
        .route("/contact", post(handlers::intake::contact))
}
