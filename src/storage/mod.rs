//! Uploaded media storage.
//!
//! Uploaded videos and thumbnails are written under the media root with a
//! generated `<uuid>.<ext>` name:
//!
//! ```text
//! <root>/videos/3f0c...e1.mp4      -> /media/videos/3f0c...e1.mp4
//! <root>/thumbnails/9a1b...07.jpg  -> /media/thumbnails/9a1b...07.jpg
//! ```
//!
//! The public path is what the catalog stores and what the browser requests
//! through the `/media` static route. Videos are also reachable by bare file
//! name through `/stream/{filename}`.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use homestream_common::paths::{is_safe_file_name, stored_extension};
use homestream_common::{AssetKind, Error, Result};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// URL prefix the media root is served under.
pub const PUBLIC_PREFIX: &str = "/media";

/// A file written by [`MediaStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated name, e.g. `<uuid>.mp4`.
    pub file_name: String,
    /// Path as stored in the catalog, e.g. `/media/videos/<uuid>.mp4`.
    pub public_path: String,
    /// Bytes written.
    pub size: u64,
}

/// Writes and removes uploaded files under the media root.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    videos_dir: PathBuf,
    thumbnails_dir: PathBuf,
    max_upload_bytes: u64,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, max_upload_bytes: u64) -> Self {
        let root = root.into();
        Self {
            videos_dir: root.join(AssetKind::Video.dir_name()),
            thumbnails_dir: root.join(AssetKind::Thumbnail.dir_name()),
            root,
            max_upload_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn videos_dir(&self) -> &Path {
        &self.videos_dir
    }

    pub fn thumbnails_dir(&self) -> &Path {
        &self.thumbnails_dir
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Directory holding files of `kind`.
    pub fn dir(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Video => &self.videos_dir,
            AssetKind::Thumbnail => &self.thumbnails_dir,
        }
    }

    /// Create the videos and thumbnails directories if missing.
    pub async fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.videos_dir).await?;
        fs::create_dir_all(&self.thumbnails_dir).await?;
        Ok(())
    }

    /// Write an uploaded file chunk by chunk.
    ///
    /// The stored name keeps the original extension when it is a short
    /// alphanumeric one. On any failure, including exceeding the upload
    /// limit, the partial file is removed.
    pub async fn save<S, E>(
        &self,
        kind: AssetKind,
        original_name: Option<&str>,
        chunks: S,
    ) -> Result<StoredFile>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let file_name = match original_name.and_then(stored_extension) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let path = self.dir(kind).join(&file_name);

        match self.write_chunks(&path, chunks).await {
            Ok(size) => {
                tracing::info!(kind = %kind, file = %file_name, size, "Stored upload");
                Ok(StoredFile {
                    public_path: format!("{}/{}/{}", PUBLIC_PREFIX, kind.dir_name(), file_name),
                    file_name,
                    size,
                })
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&path).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %path.display(), "Failed to remove partial upload: {}", cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    async fn write_chunks<S, E>(&self, path: &Path, chunks: S) -> Result<u64>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let mut chunks = std::pin::pin!(chunks);
        let mut file = File::create(path).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| Error::invalid_input(format!("upload interrupted: {}", e)))?;
            written += chunk.len() as u64;
            if written > self.max_upload_bytes {
                return Err(Error::PayloadTooLarge {
                    limit: self.max_upload_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(written)
    }

    /// Map a catalog public path back to a file under the media root.
    ///
    /// Only `/media/videos/<name>` and `/media/thumbnails/<name>` with a
    /// plain file name are accepted.
    pub fn resolve_public_path(&self, public_path: &str) -> Option<PathBuf> {
        let rest = public_path.strip_prefix(PUBLIC_PREFIX)?.strip_prefix('/')?;
        let (dir, name) = rest.split_once('/')?;
        if !is_safe_file_name(name) {
            return None;
        }
        [AssetKind::Video, AssetKind::Thumbnail]
            .into_iter()
            .find(|kind| kind.dir_name() == dir)
            .map(|kind| self.dir(kind).join(name))
    }

    /// Delete the file behind a catalog public path.
    ///
    /// Returns `Ok(false)` when the path is not a stored media path or the
    /// file is already gone.
    pub async fn remove_public_path(&self, public_path: &str) -> Result<bool> {
        let Some(path) = self.resolve_public_path(public_path) else {
            tracing::debug!(public_path, "Not a stored media path, skipping removal");
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed stored file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
