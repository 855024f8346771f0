use crate::services::{articles, site, tags};
use crate::web::error::{ApiError, ApiResult};
use crate::web::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const MAX_PAGE: usize = 10000;

#[derive(Deserialize)]
pub struct ArticleListQuery {
    #[serde(default = "default_page")]
    page: usize,
    category: Option<String>,
    tag: Option<String>,
}

fn default_page() -> usize {
    1
}

fn clamp_page(page: usize) -> usize {
    page.max(1).min(MAX_PAGE)
}

/// Homepage payload: site chrome plus the featured and most recent exposes.
pub async fn home(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let metadata = site::get_site_metadata(&state.db)?;
    let navigation = site::list_navigation(&state.db, true)?;
    let footer = site::list_footer_sections(&state.db)?;
    let hero = site::get_hero(&state.db)?;
    let sections = site::list_home_sections(&state.db)?;
    let featured = articles::featured_article(&state.db)?;
    let recent = articles::list_published(
        &state.db,
        None,
        None,
        state.config.content.recent_limit,
        0,
    )?;

    Ok(Json(json!({
        "site": metadata,
        "navigation": navigation,
        "footer": footer,
        "hero": hero,
        "sections": sections,
        "featured": featured,
        "recent": recent,
    })))
}

pub async fn articles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ArticleListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let per_page = state.config.content.articles_per_page;
    let page = clamp_page(query.page);
    let offset = (page - 1) * per_page;

    let category = query.category.as_deref();
    let tag = query.tag.as_deref();

    let list = articles::list_published(&state.db, category, tag, per_page, offset)?;
    let total = articles::count_published(&state.db, category, tag)?;
    let total_pages = (total as usize + per_page - 1) / per_page;

    let featured = articles::featured_article(&state.db)?;
    let quote = site::current_quote(&state.db)?;

    Ok(Json(json!({
        "articles": list,
        "page": page,
        "total_pages": total_pages,
        "total": total,
        "featured": featured,
        "quote": quote,
    })))
}

/// Single published article. Unpublished and unknown slugs both 404.
pub async fn article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let article = articles::get_published_by_slug(&state.db, &slug)?.ok_or(ApiError::NotFound)?;

    let related = articles::related_articles(
        &state.db,
        article.article.id,
        state.config.content.related_limit,
    )?;

    Ok(Json(json!({
        "article": article,
        "related": related,
    })))
}

pub async fn tags_index(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let tag_list = tags::list_tags_with_counts(&state.db)?;
    Ok(Json(json!({ "tags": tag_list })))
}

pub async fn tag_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(query): Query<ArticleListQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let tag = tags::get_tag_by_slug(&state.db, &slug)?.ok_or(ApiError::NotFound)?;

    let per_page = state.config.content.articles_per_page;
    let page = clamp_page(query.page);
    let offset = (page - 1) * per_page;

    let list = articles::list_published(&state.db, None, Some(&slug), per_page, offset)?;
    let total = articles::count_published(&state.db, None, Some(&slug))?;
    let total_pages = (total as usize + per_page - 1) / per_page;

    Ok(Json(json!({
        "tag": tag,
        "articles": list,
        "page": page,
        "total_pages": total_pages,
    })))
}

pub async fn about(State(state): State<Arc<AppState>>) -> ApiResult<Json<serde_json::Value>> {
    let about = site::get_about_page(&state.db)?;
    let metadata = site::get_site_metadata(&state.db)?;
    Ok(Json(json!({ "about": about, "site": metadata })))
}

pub async fn serve_media(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    // Stored names are UUID-based; anything that walks the tree is bogus.
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(ApiError::NotFound);
    }

    let file_path = state.media_dir.join(&filename);
    let content = match tokio::fs::read(&file_path).await {
        Ok(content) => content,
        Err(_) => return Err(ApiError::NotFound),
    };
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.as_ref())], content).into_response())
}
