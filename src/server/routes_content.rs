//! Content catalog API routes.
//!
//! Browse, search, upload and delete movies and series, and add episodes to
//! a series. Uploads are multipart forms; file parts are stored under the
//! media root and the catalog records their public paths.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use homestream_common::{ContentId, ContentKind, Error};
use homestream_db::{
    models::{Content, ContentDetail, NewContent, NewEpisode},
    queries::{content, episodes},
};
use serde::{Deserialize, Serialize};

use super::upload::{remove_quietly, UploadForm};
use super::{ApiError, AppContext};

/// Create content routes.
pub fn content_routes() -> Router<AppContext> {
    // Multipart bodies are limited per file by the media store instead.
    let uploads = Router::new()
        .route("/content", post(create_content))
        .route("/content/:content_id/episodes", post(add_episode))
        .layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/content", get(list_content))
        .route("/content/type/:kind", get(list_content_by_kind))
        .route("/content/recent/:limit", get(list_recent_content))
        .route("/content/search", get(search_content))
        .route(
            "/content/:content_id",
            get(get_content).delete(delete_content),
        )
        .merge(uploads)
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Substring matched against title and description
    #[serde(default)]
    pub q: String,
}

/// Response to a successful content upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedContent {
    pub id: ContentId,
    pub message: String,
    pub video_path: Option<String>,
    pub thumbnail: Option<String>,
}

/// Response to a successfully added episode.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedEpisode {
    pub id: String,
    pub message: String,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Parse a content ID from the path; an unparsable ID cannot exist.
pub(crate) fn parse_content_id(raw: &str) -> Result<ContentId, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found("Content"))
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_content(State(ctx): State<AppContext>) -> Result<Json<Vec<Content>>, ApiError> {
    let rows = ctx.with_conn(|conn| content::list_content(conn)).await?;
    Ok(Json(rows))
}

async fn list_content_by_kind(
    State(ctx): State<AppContext>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<Content>>, ApiError> {
    let kind: ContentKind = kind.parse().map_err(ApiError::bad_request)?;
    let rows = ctx
        .with_conn(move |conn| content::list_content_by_kind(conn, kind))
        .await?;
    Ok(Json(rows))
}

async fn list_recent_content(
    State(ctx): State<AppContext>,
    Path(limit): Path<u32>,
) -> Result<Json<Vec<Content>>, ApiError> {
    let rows = ctx
        .with_conn(move |conn| content::list_recent_content(conn, limit))
        .await?;
    Ok(Json(rows))
}

async fn search_content(
    State(ctx): State<AppContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Content>>, ApiError> {
    let rows = ctx
        .with_conn(move |conn| content::search_content(conn, query.q.trim()))
        .await?;
    Ok(Json(rows))
}

async fn get_content(
    State(ctx): State<AppContext>,
    Path(content_id): Path<String>,
) -> Result<Json<ContentDetail>, ApiError> {
    let id = parse_content_id(&content_id)?;

    let detail = ctx
        .with_conn(move |conn| {
            let record = content::get_content(conn, id)?
                .ok_or_else(|| Error::not_found("Content"))?;
            let episodes = match record.kind {
                ContentKind::Series => Some(episodes::list_episodes(conn, id)?),
                ContentKind::Movie => None,
            };
            Ok(ContentDetail {
                content: record,
                episodes,
            })
        })
        .await?;

    Ok(Json(detail))
}

async fn create_content(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = UploadForm::read(&ctx.store, multipart).await?;

    let new = match new_content_from_form(&form) {
        Ok(new) => new,
        Err(e) => {
            form.discard(&ctx.store).await;
            return Err(e);
        }
    };

    let created = match ctx.with_conn(move |conn| content::create_content(conn, &new)).await {
        Ok(created) => created,
        Err(e) => {
            form.discard(&ctx.store).await;
            return Err(e);
        }
    };

    tracing::info!(id = %created.id, title = %created.title, kind = %created.kind, "Content created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedContent {
            id: created.id,
            message: "Content uploaded successfully".to_string(),
            video_path: created.video_path,
            thumbnail: created.thumbnail,
        }),
    ))
}

fn new_content_from_form(form: &UploadForm) -> Result<NewContent, ApiError> {
    let title = form
        .text("title")
        .ok_or_else(|| ApiError::bad_request("title is required"))?;
    let kind = form.parse::<ContentKind>("type")?.unwrap_or(ContentKind::Movie);

    let mut new = NewContent::new(title, kind);
    new.description = form.text("description").map(str::to_owned);
    new.genre = form.text("genre").map(str::to_owned);
    new.year = form.parse("year")?;
    new.duration = form.parse("duration")?;
    new.video_path = form.video_path();
    new.thumbnail = form.thumbnail_path();
    Ok(new)
}

async fn add_episode(
    State(ctx): State<AppContext>,
    Path(content_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let id = content_id
        .parse::<ContentId>()
        .map_err(|_| ApiError::not_found("Series"))?;

    // Check the parent before storing any uploaded file.
    let parent = ctx
        .with_conn(move |conn| content::get_content(conn, id))
        .await?
        .ok_or_else(|| ApiError::not_found("Series"))?;
    if parent.kind != ContentKind::Series {
        return Err(ApiError::rejected("Can only add episodes to series"));
    }

    let form = UploadForm::read(&ctx.store, multipart).await?;

    let new = match new_episode_from_form(&form) {
        Ok(new) => new,
        Err(e) => {
            form.discard(&ctx.store).await;
            return Err(e);
        }
    };

    let episode = match ctx
        .with_conn(move |conn| episodes::create_episode(conn, id, &new))
        .await
    {
        Ok(episode) => episode,
        Err(e) => {
            form.discard(&ctx.store).await;
            return Err(e);
        }
    };

    tracing::info!(
        series = %id,
        season = episode.season,
        episode = episode.episode,
        "Episode added"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedEpisode {
            id: episode.id.to_string(),
            message: "Episode added successfully".to_string(),
        }),
    ))
}

fn new_episode_from_form(form: &UploadForm) -> Result<NewEpisode, ApiError> {
    let defaults = NewEpisode::default();
    Ok(NewEpisode {
        season: form.parse("season")?.unwrap_or(defaults.season),
        episode: form.parse("episode")?.unwrap_or(defaults.episode),
        title: form.text("title").map(str::to_owned),
        description: form.text("description").map(str::to_owned),
        duration: form.parse("duration")?,
        video_path: form.video_path(),
        thumbnail: form.thumbnail_path(),
    })
}

async fn delete_content(
    State(ctx): State<AppContext>,
    Path(content_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_content_id(&content_id)?;

    // Collect file paths before the cascade removes the episode rows.
    let files = ctx
        .with_conn(move |conn| {
            let record = content::get_content(conn, id)?
                .ok_or_else(|| Error::not_found("Content"))?;
            let mut files: Vec<String> = [record.video_path, record.thumbnail]
                .into_iter()
                .flatten()
                .collect();
            for episode in episodes::list_episodes(conn, id)? {
                files.extend([episode.video_path, episode.thumbnail].into_iter().flatten());
            }

            if !content::delete_content(conn, id)? {
                return Err(Error::not_found("Content"));
            }
            Ok(files)
        })
        .await?;

    for public_path in &files {
        remove_quietly(&ctx.store, public_path).await;
    }

    tracing::info!(id = %id, files = files.len(), "Content deleted");

    Ok(Json(MessageResponse {
        message: "Content deleted successfully".to_string(),
    }))
}
