//! Content database queries.
//!
//! CRUD, listing and search for movies and series.

use chrono::Utc;
use homestream_common::{ContentId, ContentKind, Error, Result};
use rusqlite::Connection;

use super::{id_column, time_column, timestamp};
use crate::models::{Content, NewContent};

const CONTENT_COLUMNS: &str = "id, title, description, kind, genre, year, thumbnail, video_path, \
     duration, created_at, updated_at";

fn parse_content_row(row: &rusqlite::Row) -> rusqlite::Result<Content> {
    let kind_raw: String = row.get(3)?;
    let kind = kind_raw.parse::<ContentKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;

    Ok(Content {
        id: id_column(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        kind,
        genre: row.get(4)?,
        year: row.get(5)?,
        thumbnail: row.get(6)?,
        video_path: row.get(7)?,
        duration: row.get(8)?,
        created_at: time_column(row, 9)?,
        updated_at: time_column(row, 10)?,
    })
}

fn query_content(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Content>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::database(e.to_string()))?;

    let rows = stmt
        .query_map(params, parse_content_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows)
}

/// Create a new content record.
///
/// # Returns
///
/// * `Ok(Content)` - The created record with its generated ID
/// * `Err(Error)` - If the title is blank or a database error occurs
pub fn create_content(conn: &Connection, new: &NewContent) -> Result<Content> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(Error::invalid_input("title is required"));
    }

    let id = ContentId::new();
    let now = Utc::now();

    conn.execute(
        "INSERT INTO content (id, title, description, kind, genre, year, thumbnail, video_path,
                              duration, created_at, updated_at)
         VALUES (:id, :title, :description, :kind, :genre, :year, :thumbnail, :video_path,
                 :duration, :created_at, :updated_at)",
        rusqlite::named_params! {
            ":id": id.to_string(),
            ":title": title,
            ":description": new.description,
            ":kind": new.kind.to_string(),
            ":genre": new.genre,
            ":year": new.year,
            ":thumbnail": new.thumbnail,
            ":video_path": new.video_path,
            ":duration": new.duration,
            ":created_at": timestamp(now),
            ":updated_at": timestamp(now),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(Content {
        id,
        title: title.to_string(),
        description: new.description.clone(),
        kind: new.kind,
        genre: new.genre.clone(),
        year: new.year,
        thumbnail: new.thumbnail.clone(),
        video_path: new.video_path.clone(),
        duration: new.duration,
        created_at: now,
        updated_at: now,
    })
}

/// Get a content record by ID.
///
/// # Returns
///
/// * `Ok(Some(Content))` - The record if found
/// * `Ok(None)` - If it does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_content(conn: &Connection, id: ContentId) -> Result<Option<Content>> {
    let result = conn.query_row(
        &format!("SELECT {CONTENT_COLUMNS} FROM content WHERE id = :id"),
        rusqlite::named_params! { ":id": id.to_string() },
        parse_content_row,
    );

    match result {
        Ok(content) => Ok(Some(content)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List all content, newest first.
pub fn list_content(conn: &Connection) -> Result<Vec<Content>> {
    query_content(
        conn,
        &format!("SELECT {CONTENT_COLUMNS} FROM content ORDER BY created_at DESC, rowid DESC"),
        [],
    )
}

/// List content of one kind, newest first.
pub fn list_content_by_kind(conn: &Connection, kind: ContentKind) -> Result<Vec<Content>> {
    query_content(
        conn,
        &format!(
            "SELECT {CONTENT_COLUMNS} FROM content WHERE kind = :kind
             ORDER BY created_at DESC, rowid DESC"
        ),
        rusqlite::named_params! { ":kind": kind.to_string() },
    )
}

/// List the `limit` most recently added records.
pub fn list_recent_content(conn: &Connection, limit: u32) -> Result<Vec<Content>> {
    query_content(
        conn,
        &format!(
            "SELECT {CONTENT_COLUMNS} FROM content
             ORDER BY created_at DESC, rowid DESC LIMIT :limit"
        ),
        rusqlite::named_params! { ":limit": limit },
    )
}

/// Search content by title or description (case-insensitive substring).
///
/// `%` and `_` in the query are matched literally.
pub fn search_content(conn: &Connection, query: &str) -> Result<Vec<Content>> {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let pattern = format!("%{}%", escaped);

    query_content(
        conn,
        &format!(
            "SELECT {CONTENT_COLUMNS} FROM content
             WHERE title LIKE :pattern ESCAPE '\\' OR description LIKE :pattern ESCAPE '\\'
             ORDER BY created_at DESC, rowid DESC"
        ),
        rusqlite::named_params! { ":pattern": pattern },
    )
}

/// Delete a content record (cascades to episodes and progress).
///
/// # Returns
///
/// * `Ok(true)` - If a record was deleted
/// * `Ok(false)` - If no record had this ID
pub fn delete_content(conn: &Connection, id: ContentId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM content WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    fn movie(title: &str) -> NewContent {
        NewContent::new(title, ContentKind::Movie)
    }

    #[test]
    fn test_create_and_get_content() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let mut new = movie("Big Buck Bunny");
        new.year = Some(2008);
        new.video_path = Some("/media/videos/bbb.mp4".to_string());
        let created = create_content(&conn, &new).unwrap();

        let fetched = get_content(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Big Buck Bunny");
        assert_eq!(fetched.kind, ContentKind::Movie);
        assert_eq!(fetched.year, Some(2008));
        assert_eq!(fetched.video_path.as_deref(), Some("/media/videos/bbb.mp4"));
    }

    #[test]
    fn test_create_requires_title() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let err = create_content(&conn, &movie("   ")).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_get_missing_content() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert!(get_content(&conn, ContentId::new()).unwrap().is_none());
    }

    #[test]
    fn test_list_newest_first() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_content(&conn, &movie("First")).unwrap();
        create_content(&conn, &movie("Second")).unwrap();
        create_content(&conn, &movie("Third")).unwrap();

        let titles: Vec<_> = list_content(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["Third", "Second", "First"]);

        let recent = list_recent_content(&conn, 2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "Third");
    }

    #[test]
    fn test_list_by_kind() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_content(&conn, &movie("A Movie")).unwrap();
        create_content(&conn, &NewContent::new("A Show", ContentKind::Series)).unwrap();

        let series = list_content_by_kind(&conn, ContentKind::Series).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].title, "A Show");
    }

    #[test]
    fn test_search_content() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        create_content(&conn, &movie("Elephants Dream")).unwrap();
        let mut tears = movie("Tears of Steel");
        tears.description = Some("Robots in Amsterdam".to_string());
        create_content(&conn, &tears).unwrap();
        create_content(&conn, &movie("100% Real")).unwrap();

        assert_eq!(search_content(&conn, "dream").unwrap().len(), 1);
        assert_eq!(search_content(&conn, "amsterdam").unwrap()[0].title, "Tears of Steel");
        assert_eq!(search_content(&conn, "%").unwrap().len(), 1);
        assert_eq!(search_content(&conn, "").unwrap().len(), 3);
        assert!(search_content(&conn, "nothing").unwrap().is_empty());
    }

    #[test]
    fn test_delete_content() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        let created = create_content(&conn, &movie("Doomed")).unwrap();
        assert!(delete_content(&conn, created.id).unwrap());
        assert!(get_content(&conn, created.id).unwrap().is_none());
        assert!(!delete_content(&conn, created.id).unwrap());
    }
}
