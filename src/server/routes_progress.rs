//! Watch progress API routes.
//!
//! Stores resume positions so playback can continue where it stopped.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use homestream_common::{EpisodeId, Error};
use homestream_db::{
    models::WatchProgress,
    queries::{content, episodes, progress},
};
use serde::Deserialize;

use super::routes_content::parse_content_id;
use super::{ApiError, AppContext};

const DEFAULT_CONTINUE_LIMIT: u32 = 20;

/// Create progress routes.
pub fn progress_routes() -> Router<AppContext> {
    Router::new()
        .route("/progress", get(list_progress))
        .route(
            "/content/:content_id/progress",
            get(get_progress).put(save_progress),
        )
}

/// Query parameters for the continue-watching list.
#[derive(Debug, Deserialize)]
pub struct ListProgressQuery {
    pub limit: Option<u32>,
}

/// Selects the episode for series progress.
#[derive(Debug, Deserialize)]
pub struct EpisodeQuery {
    pub episode_id: Option<EpisodeId>,
}

/// Body of `PUT /api/content/:id/progress`.
#[derive(Debug, Deserialize)]
pub struct SaveProgressRequest {
    pub episode_id: Option<EpisodeId>,
    pub position_secs: f64,
    pub duration_secs: Option<f64>,
}

async fn list_progress(
    State(ctx): State<AppContext>,
    Query(query): Query<ListProgressQuery>,
) -> Result<Json<Vec<WatchProgress>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_CONTINUE_LIMIT);
    let rows = ctx
        .with_conn(move |conn| progress::list_in_progress(conn, limit))
        .await?;
    Ok(Json(rows))
}

async fn get_progress(
    State(ctx): State<AppContext>,
    Path(content_id): Path<String>,
    Query(query): Query<EpisodeQuery>,
) -> Result<Json<WatchProgress>, ApiError> {
    let id = parse_content_id(&content_id)?;

    let saved = ctx
        .with_conn(move |conn| progress::get_progress(conn, id, query.episode_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Progress"))?;

    Ok(Json(saved))
}

async fn save_progress(
    State(ctx): State<AppContext>,
    Path(content_id): Path<String>,
    Json(request): Json<SaveProgressRequest>,
) -> Result<Json<WatchProgress>, ApiError> {
    let id = parse_content_id(&content_id)?;

    let saved = ctx
        .with_conn(move |conn| {
            if content::get_content(conn, id)?.is_none() {
                return Err(Error::not_found("Content"));
            }
            if let Some(episode_id) = request.episode_id {
                let belongs = episodes::get_episode(conn, episode_id)?
                    .is_some_and(|episode| episode.content_id == id);
                if !belongs {
                    return Err(Error::not_found("Episode"));
                }
            }
            progress::save_progress(
                conn,
                id,
                request.episode_id,
                request.position_secs,
                request.duration_secs,
            )
        })
        .await?;

    tracing::debug!(content = %id, position = saved.position_secs, "Progress saved");

    Ok(Json(saved))
}
