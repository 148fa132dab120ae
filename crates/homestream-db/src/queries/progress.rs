//! Watch progress queries.
//!
//! One resume position per movie, or per episode of a series. Movies are
//! keyed with an empty episode column.

use chrono::Utc;
use homestream_common::{ContentId, EpisodeId, Error, Result};
use rusqlite::Connection;
use uuid::Uuid;

use super::{id_column, time_column, timestamp};
use crate::models::WatchProgress;

fn episode_key(episode_id: Option<EpisodeId>) -> String {
    episode_id.map(|id| id.to_string()).unwrap_or_default()
}

fn parse_progress_row(row: &rusqlite::Row) -> rusqlite::Result<WatchProgress> {
    let episode_raw: String = row.get(1)?;
    let episode_id = if episode_raw.is_empty() {
        None
    } else {
        Some(EpisodeId::from(Uuid::parse_str(&episode_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?))
    };

    Ok(WatchProgress {
        content_id: id_column(row, 0)?,
        episode_id,
        position_secs: row.get(2)?,
        duration_secs: row.get(3)?,
        updated_at: time_column(row, 4)?,
    })
}

/// Insert or replace the resume position for a movie or episode.
pub fn save_progress(
    conn: &Connection,
    content_id: ContentId,
    episode_id: Option<EpisodeId>,
    position_secs: f64,
    duration_secs: Option<f64>,
) -> Result<WatchProgress> {
    if !position_secs.is_finite() || position_secs < 0.0 {
        return Err(Error::invalid_input("position must be a non-negative number"));
    }
    if let Some(duration) = duration_secs {
        if !duration.is_finite() || duration < 0.0 {
            return Err(Error::invalid_input("duration must be a non-negative number"));
        }
    }

    let now = Utc::now();

    conn.execute(
        "INSERT INTO watch_progress (content_id, episode_id, position_secs, duration_secs, updated_at)
         VALUES (:content_id, :episode_id, :position_secs, :duration_secs, :updated_at)
         ON CONFLICT (content_id, episode_id) DO UPDATE SET
             position_secs = excluded.position_secs,
             duration_secs = excluded.duration_secs,
             updated_at = excluded.updated_at",
        rusqlite::named_params! {
            ":content_id": content_id.to_string(),
            ":episode_id": episode_key(episode_id),
            ":position_secs": position_secs,
            ":duration_secs": duration_secs,
            ":updated_at": timestamp(now),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(WatchProgress {
        content_id,
        episode_id,
        position_secs,
        duration_secs,
        updated_at: now,
    })
}

/// Get the resume position for a movie (`episode_id = None`) or an episode.
pub fn get_progress(
    conn: &Connection,
    content_id: ContentId,
    episode_id: Option<EpisodeId>,
) -> Result<Option<WatchProgress>> {
    let result = conn.query_row(
        "SELECT content_id, episode_id, position_secs, duration_secs, updated_at
         FROM watch_progress WHERE content_id = :content_id AND episode_id = :episode_id",
        rusqlite::named_params! {
            ":content_id": content_id.to_string(),
            ":episode_id": episode_key(episode_id),
        },
        parse_progress_row,
    );

    match result {
        Ok(progress) => Ok(Some(progress)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Most recently updated positions, for a "continue watching" row.
pub fn list_in_progress(conn: &Connection, limit: u32) -> Result<Vec<WatchProgress>> {
    let mut stmt = conn
        .prepare(
            "SELECT content_id, episode_id, position_secs, duration_secs, updated_at
             FROM watch_progress
             WHERE position_secs > 0
             ORDER BY updated_at DESC, rowid DESC
             LIMIT :limit",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(rusqlite::named_params! { ":limit": limit }, parse_progress_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}
