//! Media Store: durable song metadata keyed by external identifier
//!
//! One table, `songs(id, name, path)`, with a uniqueness constraint on `id`.
//! Every statement runs in autocommit mode against a synchronous-FULL
//! SQLite database, so a mutation is on disk once the call returns.

mod error;

use async_trait::async_trait;
use file_area::SongId;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use error::StoreError;

/// Default database filename
pub const DEFAULT_DB_NAME: &str = "data.db";

/// One row of the `songs` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    pub path: PathBuf,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Add a row; fails with [`StoreError::DuplicateKey`] if the id exists
    async fn insert(&self, song: &Song) -> Result<(), StoreError>;

    async fn get(&self, id: &SongId) -> Result<Option<Song>, StoreError>;

    /// All rows as id -> name, in no particular order
    async fn list(&self) -> Result<HashMap<SongId, String>, StoreError>;

    /// Returns whether a row existed and was updated
    async fn update_name(&self, id: &SongId, name: &str) -> Result<bool, StoreError>;

    /// Returns whether a row existed and was deleted
    async fn delete_by_id(&self, id: &SongId) -> Result<bool, StoreError>;
}

#[derive(Debug, Clone)]
pub struct SqliteMediaStore {
    pool: SqlitePool,
}

impl SqliteMediaStore {
    /// Open (creating if missing) the database file and bring the schema up to date
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(StoreError::Open)?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_id(raw: String) -> Result<SongId, StoreError> {
    SongId::new(raw.clone()).map_err(|_| StoreError::CorruptRow { id: raw })
}

#[async_trait]
impl MediaStore for SqliteMediaStore {
    async fn insert(&self, song: &Song) -> Result<(), StoreError> {
        let result = sqlx::query("INSERT INTO songs (id, name, path) VALUES (?, ?, ?)")
            .bind(song.id.as_str())
            .bind(&song.name)
            .bind(song.path.to_string_lossy().into_owned())
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!(id = %song.id, "inserted song row");
                Ok(())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateKey(song.id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &SongId) -> Result<Option<Song>, StoreError> {
        let row: Option<(String, String, String)> =
            sqlx::query_as("SELECT id, name, path FROM songs WHERE id = ?")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id, name, path)| {
            Ok(Song {
                id: parse_id(id)?,
                name,
                path: PathBuf::from(path),
            })
        })
        .transpose()
    }

    async fn list(&self) -> Result<HashMap<SongId, String>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, name FROM songs")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|(id, name)| Ok((parse_id(id)?, name)))
            .collect()
    }

    async fn update_name(&self, id: &SongId, name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE songs SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: &SongId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    async fn temp_store() -> (SqliteMediaStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteMediaStore::open(dir.path().join("test.db"))
            .await
            .unwrap();
        (store, dir)
    }

    fn song(id: &str, name: &str) -> Song {
        Song {
            id: SongId::new(id).unwrap(),
            name: name.to_string(),
            path: PathBuf::from(format!("static/music/{id}.mp3")),
        }
    }

    #[tokio::test]
    async fn insert_then_list() {
        let (store, _dir) = temp_store().await;
        store.insert(&song("abc", "Song")).await.unwrap();
        store.insert(&song("def", "Other")).await.unwrap();

        let songs = store.list().await.unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[&SongId::new("abc").unwrap()], "Song");
        assert_eq!(songs[&SongId::new("def").unwrap()], "Other");
    }

    #[tokio::test]
    async fn get_returns_full_row() {
        let (store, _dir) = temp_store().await;
        store.insert(&song("abc", "Song")).await.unwrap();

        let found = store.get(&SongId::new("abc").unwrap()).await.unwrap();
        assert_eq!(found, Some(song("abc", "Song")));
        assert_eq!(store.get(&SongId::new("zzz").unwrap()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let (store, _dir) = temp_store().await;
        store.insert(&song("abc", "Song")).await.unwrap();

        assert_matches!(
            store.insert(&song("abc", "Again")).await,
            Err(StoreError::DuplicateKey(id)) if id == "abc"
        );
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_keep_one_row() {
        let (store, _dir) = temp_store().await;

        let results = futures::future::join_all(
            (0..8).map(|i| {
                let store = store.clone();
                async move { store.insert(&song("abc", &format!("Song {i}"))).await }
            }),
        )
        .await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, StoreError::DuplicateKey(_))));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_name_reports_whether_row_existed() {
        let (store, _dir) = temp_store().await;
        store.insert(&song("abc", "Song")).await.unwrap();

        assert!(store.update_name(&SongId::new("abc").unwrap(), "Renamed").await.unwrap());
        assert!(!store.update_name(&SongId::new("missing").unwrap(), "X").await.unwrap());

        let songs = store.list().await.unwrap();
        assert_eq!(songs[&SongId::new("abc").unwrap()], "Renamed");
        assert_eq!(songs.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let (store, _dir) = temp_store().await;
        store.insert(&song("abc", "Song")).await.unwrap();

        let id = SongId::new("abc").unwrap();
        assert!(store.delete_by_id(&id).await.unwrap());
        assert!(!store.delete_by_id(&id).await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rows_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.db");

        let store = SqliteMediaStore::open(&path).await.unwrap();
        store.insert(&song("abc", "Song")).await.unwrap();
        store.close().await;

        let reopened = SqliteMediaStore::open(&path).await.unwrap();
        assert_eq!(reopened.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn open_fails_for_unreachable_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("test.db");
        assert_matches!(SqliteMediaStore::open(path).await, Err(StoreError::Open(_)));
    }
}
