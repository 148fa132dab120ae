//! Stream target resolution.
//!
//! Maps a requested file name onto a regular file inside the videos
//! directory. Names that could escape the directory are rejected before the
//! filesystem is touched.

use std::path::{Path, PathBuf};

use homestream_common::paths::{is_safe_file_name, video_content_type};

/// A resolved video file ready to be streamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTarget {
    pub path: PathBuf,
    pub size: u64,
    pub content_type: String,
}

/// Resolution failure.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Unsafe name, missing file, or not a regular file.
    #[error("video not found")]
    NotFound,
    /// Any other metadata failure (permissions, I/O).
    #[error("failed to read video metadata: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolve `name` against `videos_dir`.
///
/// The content type is derived from the file extension, falling back to
/// `default_mime` for unknown extensions.
pub async fn resolve(
    videos_dir: &Path,
    name: &str,
    default_mime: &str,
) -> Result<StreamTarget, ResolveError> {
    if !is_safe_file_name(name) {
        tracing::debug!(name, "Rejected unsafe stream file name");
        return Err(ResolveError::NotFound);
    }

    let path = videos_dir.join(name);
    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(ResolveError::NotFound),
        Err(e) => return Err(ResolveError::Io(e)),
    };

    if !metadata.is_file() {
        return Err(ResolveError::NotFound);
    }

    let content_type = video_content_type(&path)
        .unwrap_or(default_mime)
        .to_string();

    Ok(StreamTarget {
        path,
        size: metadata.len(),
        content_type,
    })
}
