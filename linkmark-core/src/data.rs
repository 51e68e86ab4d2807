use crate::model::{Bookmark, NewBookmark};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("bookmark {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataError>;

pub struct Database {
    conn: Connection,
}

fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

const BOOKMARK_COLUMNS: &str =
    "id, url, title, description, favicon_url, created_at, updated_at";

fn bookmark_from_row(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    Ok(Bookmark {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        favicon_url: row.get(4)?,
        created_at: from_millis(row.get(5)?),
        updated_at: from_millis(row.get(6)?),
    })
}

impl Database {
    pub fn drop(path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let db = Database { conn };
        db.init_schema()?;
        debug!("Opened bookmark database at {}", path.display());
        Ok(db)
    }

    pub fn in_memory() -> Result<Self> {
        let db = Database {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS bookmarks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    favicon_url TEXT NOT NULL DEFAULT '',
    created_at INTEGER NOT NULL,   -- unix millis
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bookmarks_created_at ON bookmarks(created_at);
            ",
        )?;
        Ok(())
    }

    pub fn create_bookmark(&self, bookmark: &NewBookmark) -> Result<Bookmark> {
        let timestamp = current_timestamp_millis();

        self.conn.execute(
            "INSERT INTO bookmarks (url, title, description, favicon_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &bookmark.url,
                &bookmark.title,
                &bookmark.description,
                &bookmark.favicon_url,
                timestamp,
                timestamp,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Created bookmark {} for {}", id, bookmark.url);

        Ok(Bookmark {
            id,
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            description: bookmark.description.clone(),
            favicon_url: bookmark.favicon_url.clone(),
            created_at: from_millis(timestamp),
            updated_at: from_millis(timestamp),
        })
    }

    pub fn get_bookmark(&self, id: i64) -> Result<Bookmark> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bookmarks WHERE id = ?1",
            BOOKMARK_COLUMNS
        ))?;

        stmt.query_row(params![id], bookmark_from_row)
            .optional()?
            .ok_or(DataError::NotFound(id))
    }

    /// All bookmarks, newest first.
    pub fn list_bookmarks(&self) -> Result<Vec<Bookmark>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bookmarks ORDER BY created_at DESC, id DESC",
            BOOKMARK_COLUMNS
        ))?;

        let bookmarks = stmt
            .query_map([], bookmark_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(bookmarks)
    }

    pub fn delete_bookmark(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(DataError::NotFound(id));
        }
        debug!("Deleted bookmark {}", id);
        Ok(())
    }

    pub fn count_bookmarks(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?;
        Ok(count)
    }
}
