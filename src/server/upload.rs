//! Multipart upload forms.
//!
//! Upload forms mix text fields with `video` and `thumbnail` file parts.
//! File parts are streamed straight into the [`MediaStore`] as they arrive;
//! text parts are collected for the handler to validate.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Multipart;
use homestream_common::AssetKind;

use super::error::ApiError;
use crate::storage::{MediaStore, StoredFile};

/// A fully read upload form.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    pub video: Option<StoredFile>,
    pub thumbnail: Option<StoredFile>,
}

impl UploadForm {
    /// Read every part of `multipart`, storing file parts on the way.
    ///
    /// If any part fails, files already stored for this form are removed.
    pub async fn read(store: &MediaStore, mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        if let Err(e) = form.read_parts(store, &mut multipart).await {
            form.discard(store).await;
            return Err(e);
        }

        Ok(form)
    }

    async fn read_parts(
        &mut self,
        store: &MediaStore,
        multipart: &mut Multipart,
    ) -> Result<(), ApiError> {
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            let kind = match name.as_str() {
                "video" => AssetKind::Video,
                "thumbnail" => AssetKind::Thumbnail,
                _ => {
                    let value = field.text().await?;
                    self.fields.insert(name, value);
                    continue;
                }
            };

            // Browsers send an empty, unnamed part for an untouched file input.
            let file_name = field.file_name().map(str::to_owned);
            if file_name.as_deref().map_or(true, str::is_empty) {
                continue;
            }

            let stored = store.save(kind, file_name.as_deref(), field).await?;
            let slot = match kind {
                AssetKind::Video => &mut self.video,
                AssetKind::Thumbnail => &mut self.thumbnail,
            };
            // A repeated part replaces the earlier one.
            if let Some(previous) = slot.replace(stored) {
                remove_quietly(store, &previous.public_path).await;
            }
        }

        Ok(())
    }

    /// Trimmed text field, `None` when missing or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Parse an optional text field.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, ApiError> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| ApiError::bad_request(format!("invalid value for '{}'", name)))
            })
            .transpose()
    }

    pub fn video_path(&self) -> Option<String> {
        self.video.as_ref().map(|f| f.public_path.clone())
    }

    pub fn thumbnail_path(&self) -> Option<String> {
        self.thumbnail.as_ref().map(|f| f.public_path.clone())
    }

    /// Remove any files stored for this form.
    pub async fn discard(&self, store: &MediaStore) {
        for file in [&self.video, &self.thumbnail].into_iter().flatten() {
            remove_quietly(store, &file.public_path).await;
        }
    }
}

/// Best-effort removal of a stored file; failures are only logged.
pub async fn remove_quietly(store: &MediaStore, public_path: &str) {
    if let Err(e) = store.remove_public_path(public_path).await {
        tracing::warn!(public_path, "Failed to remove stored file: {}", e);
    }
}
