use crate::error::ValidationError;
use crate::models::{Category, NewContact, NewSubmission};
use crate::services::slug::SystemClock;
use crate::services::{contact as contact_service, evidence, submissions};
use crate::web::error::{ApiError, ApiResult};
use crate::web::state::AppState;
use axum::extract::{ConnectInfo, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Default)]
struct StoryForm {
    title: String,
    summary: String,
    story: String,
    category: Option<String>,
    meta_description: Option<String>,
    tags: Vec<String>,
    evidence: Option<(String, Vec<u8>)>,
}

/// Anonymous story intake. Field validation and evidence constraints run
/// before anything is written; the submission row and its tags land in one
/// transaction via the submissions service.
pub async fn submit_story(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    if !state.intake_limiter.allow(&addr.ip().to_string()) {
        return Err(ApiError::TooManyRequests);
    }

    let mut form = StoryForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => form.title = field.text().await?,
            "summary" => form.summary = field.text().await?,
            "story" => form.story = field.text().await?,
            "category" => form.category = Some(field.text().await?),
            "meta_description" => form.meta_description = Some(field.text().await?),
            "tags" => {
                form.tags = field
                    .text()
                    .await?
                    .split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
            }
            "evidence" => {
                let original = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await?.to_vec();
                if !original.is_empty() && !data.is_empty() {
                    form.evidence = Some((original, data));
                }
            }
            _ => {}
        }
    }

    submissions::validate_intake(
        &form.title,
        &form.summary,
        &form.story,
        form.meta_description.as_deref(),
    )?;

    let category = match form.category.as_deref() {
        None | Some("") => Category::default(),
        Some(raw) => Category::from_str(raw).map_err(|_| ValidationError::Invalid {
            field: "category",
            reason: format!("unknown category '{raw}'"),
        })?,
    };

    let stored = match form.evidence {
        Some((original, data)) => {
            let ext = evidence::validate_evidence(&original, &data)?;
            Some(evidence::store_evidence(
                &state.media_dir,
                &original,
                &ext,
                &data,
            )?)
        }
        None => None,
    };

    let submission = submissions::create_submission(
        &state.db,
        &SystemClock,
        NewSubmission {
            title: form.title,
            summary: form.summary,
            story_markdown: form.story,
            category,
            meta_description: form.meta_description.filter(|m| !m.is_empty()),
            evidence: stored,
            tags: form.tags,
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "slug": submission.submission.slug,
            "message": "Your story has been received and is awaiting review."
        })),
    ))
}

pub async fn contact(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(input): Json<NewContact>,
) -> ApiResult<impl IntoResponse> {
    if !state.intake_limiter.allow(&addr.ip().to_string()) {
        return Err(ApiError::TooManyRequests);
    }

    contact_service::validate(&input)?;
    contact_service::create_contact(&state.db, &input)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Your message has been saved. We will get back to you soon." })),
    ))
}
