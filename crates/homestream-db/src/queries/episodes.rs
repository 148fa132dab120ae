//! Episode database queries.

use chrono::Utc;
use homestream_common::{ContentId, EpisodeId, Error, Result};
use rusqlite::Connection;

use super::{id_column, time_column, timestamp};
use crate::models::{Episode, NewEpisode};

fn parse_episode_row(row: &rusqlite::Row) -> rusqlite::Result<Episode> {
    Ok(Episode {
        id: id_column(row, 0)?,
        content_id: id_column(row, 1)?,
        season: row.get(2)?,
        episode: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        video_path: row.get(6)?,
        duration: row.get(7)?,
        thumbnail: row.get(8)?,
        created_at: time_column(row, 9)?,
    })
}

/// Add an episode to a series.
///
/// The caller is responsible for checking that `content_id` is a series;
/// a missing parent is reported by the foreign key as a database error.
pub fn create_episode(
    conn: &Connection,
    content_id: ContentId,
    new: &NewEpisode,
) -> Result<Episode> {
    if new.season < 0 || new.episode < 0 {
        return Err(Error::invalid_input("season and episode must not be negative"));
    }

    let id = EpisodeId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO episodes (id, content_id, season, episode, title, description, video_path,
                               duration, thumbnail, created_at)
         VALUES (:id, :content_id, :season, :episode, :title, :description, :video_path,
                 :duration, :thumbnail, :created_at)",
        rusqlite::named_params! {
            ":id": id.to_string(),
            ":content_id": content_id.to_string(),
            ":season": new.season,
            ":episode": new.episode,
            ":title": new.title,
            ":description": new.description,
            ":video_path": new.video_path,
            ":duration": new.duration,
            ":thumbnail": new.thumbnail,
            ":created_at": timestamp(now),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Episode {
        id,
        content_id,
        season: new.season,
        episode: new.episode,
        title: new.title.clone(),
        description: new.description.clone(),
        video_path: new.video_path.clone(),
        duration: new.duration,
        thumbnail: new.thumbnail.clone(),
        created_at: now,
    })
}

/// Get an episode by ID.
pub fn get_episode(conn: &Connection, id: EpisodeId) -> Result<Option<Episode>> {
    let result = conn.query_row(
        "SELECT id, content_id, season, episode, title, description, video_path, duration,
                thumbnail, created_at
         FROM episodes WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_episode_row,
    );

    match result {
        Ok(episode) => Ok(Some(episode)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List the episodes of a series ordered by season, then episode number.
pub fn list_episodes(conn: &Connection, content_id: ContentId) -> Result<Vec<Episode>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, content_id, season, episode, title, description, video_path, duration,
                    thumbnail, created_at
             FROM episodes WHERE content_id = :content_id
             ORDER BY season, episode",
        )
        .map_err(|e| Error::database(e.to_string()))?;

    let episodes = stmt
        .query_map(
            rusqlite::named_params! { ":content_id": content_id.to_string() },
            parse_episode_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(episodes)
}
