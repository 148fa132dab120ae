//! Database query modules.
//!
//! This module organizes all database operations into logical groups:
//! - content: Movie/series CRUD, listing and search
//! - episodes: Episodes of a series
//! - progress: Resume positions ("continue watching")

pub mod content;
pub mod episodes;
pub mod progress;

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Fixed-width RFC 3339 timestamp so text ordering matches time ordering.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

/// Read a UUID text column into a typed ID.
pub(crate) fn id_column<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map(T::from)
        .map_err(|e| conversion_error(idx, e))
}

/// Read an RFC 3339 text column.
pub(crate) fn time_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}
