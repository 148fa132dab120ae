//! Direct streaming with HTTP range requests.
//!
//! Serves video files from the videos directory with support for single
//! `Range: bytes=` requests. Every request stats the file again, so a file
//! replaced on disk is picked up on the next request.

use std::io::SeekFrom;
use std::path::PathBuf;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use serde_json::json;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::body::ExactLengthStream;
use super::range::{parse_range_header, ByteRange, RangeError};
use super::target::{resolve, ResolveError, StreamTarget};
use crate::server::AppContext;

/// Default read size per body chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Where and how video files are streamed from.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Directory holding streamable videos; request names resolve inside it.
    pub videos_dir: PathBuf,
    /// Read buffer size per body chunk.
    pub chunk_size: usize,
    /// Content type for files with an unknown extension.
    pub default_mime: String,
}

impl StreamSettings {
    pub fn new(videos_dir: impl Into<PathBuf>) -> Self {
        Self {
            videos_dir: videos_dir.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            default_mime: "video/mp4".to_string(),
        }
    }
}

/// Stream request failure, rendered before any body byte is sent.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("video not found")]
    NotFound,

    #[error("range not satisfiable for {size} byte file")]
    RangeNotSatisfiable { size: u64 },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ResolveError> for StreamError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => StreamError::NotFound,
            ResolveError::Io(e) => StreamError::Io(e),
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response {
        match self {
            StreamError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Video not found" })),
            )
                .into_response(),
            StreamError::RangeNotSatisfiable { size } => (
                StatusCode::RANGE_NOT_SATISFIABLE,
                [(header::CONTENT_RANGE, format!("bytes */{}", size))],
            )
                .into_response(),
            StreamError::Io(e) => {
                tracing::error!("Stream I/O error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to read video" })),
                )
                    .into_response()
            }
        }
    }
}

/// Serve `name` from the videos directory.
///
/// `range` is the raw `Range` header, if any. The range is validated against
/// the current file size before the file is opened.
pub async fn serve(
    settings: &StreamSettings,
    name: &str,
    range: Option<&HeaderValue>,
) -> Result<Response, StreamError> {
    let target = resolve(&settings.videos_dir, name, &settings.default_mime).await?;

    let requested = match range {
        Some(value) => {
            let parsed = value
                .to_str()
                .map_err(|_| RangeError::Malformed)
                .and_then(|raw| parse_range_header(raw, target.size));
            match parsed {
                Ok(range) => Some(range),
                Err(e) => {
                    tracing::debug!(name, size = target.size, ?value, "Rejected range: {}", e);
                    return Err(StreamError::RangeNotSatisfiable { size: target.size });
                }
            }
        }
        None => None,
    };

    tracing::debug!(name, size = target.size, range = ?requested, "Streaming video");

    match requested {
        Some(range) => partial_response(&target, range, settings.chunk_size).await,
        None => full_response(&target, settings.chunk_size).await,
    }
}

async fn partial_response(
    target: &StreamTarget,
    range: ByteRange,
    chunk_size: usize,
) -> Result<Response, StreamError> {
    let body = file_body(target, range, chunk_size).await?;

    Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(header::CONTENT_TYPE, &target.content_type)
        .header(header::CONTENT_LENGTH, range.len())
        .header(header::CONTENT_RANGE, range.content_range(target.size))
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| StreamError::Io(std::io::Error::other(e)))
}

async fn full_response(target: &StreamTarget, chunk_size: usize) -> Result<Response, StreamError> {
    let body = match ByteRange::full(target.size) {
        Some(range) => file_body(target, range, chunk_size).await?,
        None => Body::empty(),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &target.content_type)
        .header(header::CONTENT_LENGTH, target.size)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| StreamError::Io(std::io::Error::other(e)))
}

/// Open the file and build a body yielding exactly `range.len()` bytes.
async fn file_body(
    target: &StreamTarget,
    range: ByteRange,
    chunk_size: usize,
) -> Result<Body, StreamError> {
    let mut file = match File::open(&target.path).await {
        Ok(file) => file,
        // Deleted between stat and open
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StreamError::NotFound),
        Err(e) => return Err(StreamError::Io(e)),
    };

    if range.start > 0 {
        file.seek(SeekFrom::Start(range.start)).await?;
    }

    let reader = ReaderStream::with_capacity(file.take(range.len()), chunk_size.max(1));
    let path = target.path.clone();
    let stream = ExactLengthStream::new(reader, range.len()).inspect_err(move |e| {
        tracing::warn!(path = %path.display(), "Aborting video stream: {}", e);
    });

    Ok(Body::from_stream(stream))
}

/// `GET /stream/:filename`
pub async fn stream_video(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StreamError> {
    serve(&ctx.stream, &filename, headers.get(header::RANGE)).await
}
