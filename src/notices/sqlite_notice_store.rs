//! SQLite-backed notice store implementation.

use super::models::{NoticeBucket, Scope, NOTICES_META_KEY};
use super::schema::NOTICES_VERSIONED_SCHEMAS;
use super::store::NoticeStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Store for notice buckets, mirroring the host framework's storage split:
/// the global bucket lives in a key-value `options` table, object buckets
/// live in `object_meta` keyed by (object_type, object_id, meta_key).
#[derive(Clone)]
pub struct SqliteNoticeStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteNoticeStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref()).context("Failed to open notices database")?;
        Self::with_connection(Arc::new(Mutex::new(conn)))
    }

    /// Create a store over an existing connection, initializing the schema
    /// if the tables don't exist.
    pub fn with_connection(conn: Arc<Mutex<Connection>>) -> Result<Self> {
        {
            let conn = conn.lock().unwrap();
            let schema = NOTICES_VERSIONED_SCHEMAS.last().unwrap();
            conn.execute_batch(schema.up)
                .context("Failed to initialize notices schema")?;
        }

        Ok(Self { conn })
    }

    /// Decode a stored bucket blob. A value that is not a JSON map of
    /// notices is treated as "no notices" rather than an error.
    fn decode_bucket(scope: &Scope, raw: &str) -> NoticeBucket {
        match serde_json::from_str(raw) {
            Ok(bucket) => bucket,
            Err(err) => {
                warn!(
                    "Discarding malformed notice bucket for scope {:?}: {}",
                    scope, err
                );
                NoticeBucket::new()
            }
        }
    }
}

impl NoticeStore for SqliteNoticeStore {
    fn load_bucket(&self, scope: &Scope) -> Result<Option<NoticeBucket>> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = match scope {
            Scope::Global => conn
                .query_row(
                    "SELECT value FROM options WHERE name = ?1",
                    params![NOTICES_META_KEY],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?,
            Scope::Object {
                object_type,
                object_id,
            } => conn
                .query_row(
                    "SELECT meta_value FROM object_meta
                     WHERE object_type = ?1 AND object_id = ?2 AND meta_key = ?3",
                    params![object_type.as_str(), object_id, NOTICES_META_KEY],
                    |row| row.get(0),
                )
                .map(Some)
                .or_else(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => Ok(None),
                    other => Err(other),
                })?,
        };

        Ok(raw.map(|raw| Self::decode_bucket(scope, &raw)))
    }

    fn save_bucket(&self, scope: &Scope, bucket: &NoticeBucket) -> Result<()> {
        let value = serde_json::to_string(bucket).context("Failed to encode notice bucket")?;

        let conn = self.conn.lock().unwrap();
        match scope {
            Scope::Global => {
                conn.execute(
                    "INSERT OR REPLACE INTO options (name, value) VALUES (?1, ?2)",
                    params![NOTICES_META_KEY, value],
                )?;
            }
            Scope::Object {
                object_type,
                object_id,
            } => {
                conn.execute(
                    "INSERT OR REPLACE INTO object_meta
                     (object_type, object_id, meta_key, meta_value)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![object_type.as_str(), object_id, NOTICES_META_KEY, value],
                )?;
            }
        }
        Ok(())
    }

    fn delete_bucket(&self, scope: &Scope) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        match scope {
            Scope::Global => {
                conn.execute(
                    "DELETE FROM options WHERE name = ?1",
                    params![NOTICES_META_KEY],
                )?;
            }
            Scope::Object {
                object_type,
                object_id,
            } => {
                conn.execute(
                    "DELETE FROM object_meta
                     WHERE object_type = ?1 AND object_id = ?2 AND meta_key = ?3",
                    params![object_type.as_str(), object_id, NOTICES_META_KEY],
                )?;
            }
        }
        Ok(())
    }
}
