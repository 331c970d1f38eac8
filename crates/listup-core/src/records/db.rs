//! SQLite-backed record database.

use anyhow::Result;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::types::UpdateRecord;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

/// Handle to the record database, by default `~/.local/state/listup/records.db`.
#[derive(Clone)]
pub struct RecordDb {
    pub(crate) pool: Pool<Sqlite>,
}

impl RecordDb {
    /// Open (or create) the default record database and run migrations.
    pub async fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("listup")?;
        let db_path = xdg_dirs.get_state_home().join("listup").join("records.db");
        Self::open_at(db_path).await
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&uri)
            .await?;
        let db = RecordDb { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS filter_lists (
                id TEXT PRIMARY KEY NOT NULL,
                last_checksum TEXT NOT NULL,
                title TEXT,
                filters_count INTEGER NOT NULL DEFAULT 0,
                homepage TEXT,
                expires_secs INTEGER,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert or replace the record for `record.id`; `updated_at` is set to now.
    pub async fn upsert_record(&self, record: &UpdateRecord) -> Result<()> {
        let now = unix_timestamp();
        sqlx::query(
            r#"
            INSERT INTO filter_lists (
                id, last_checksum, title, filters_count,
                homepage, expires_secs, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT(id) DO UPDATE SET
                last_checksum = excluded.last_checksum,
                title = excluded.title,
                filters_count = excluded.filters_count,
                homepage = excluded.homepage,
                expires_secs = excluded.expires_secs,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.id)
        .bind(&record.last_checksum)
        .bind(&record.title)
        .bind(i64::try_from(record.filters_count).unwrap_or(i64::MAX))
        .bind(&record.homepage)
        .bind(record.expires.map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX)))
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_record(&self, id: &str) -> Result<Option<UpdateRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, last_checksum, title, filters_count, homepage, expires_secs, updated_at
            FROM filter_lists
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(record_from_row))
    }

    /// All records, ordered by id.
    pub async fn list_records(&self) -> Result<Vec<UpdateRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, last_checksum, title, filters_count, homepage, expires_secs, updated_at
            FROM filter_lists
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(record_from_row).collect())
    }

    /// Delete the record for `id`. Returns whether a record existed.
    pub async fn remove_record(&self, id: &str) -> Result<bool> {
        let res = sqlx::query("DELETE FROM filter_lists WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

fn record_from_row(row: &SqliteRow) -> UpdateRecord {
    let filters_count: i64 = row.get("filters_count");
    let expires_secs: Option<i64> = row.get("expires_secs");
    UpdateRecord {
        id: row.get("id"),
        last_checksum: row.get("last_checksum"),
        title: row.get("title"),
        filters_count: u64::try_from(filters_count).unwrap_or(0),
        homepage: row.get("homepage"),
        expires: expires_secs
            .and_then(|s| u64::try_from(s).ok())
            .map(Duration::from_secs),
        updated_at: row.get("updated_at"),
    }
}

/// Current time as Unix seconds (for DB timestamps).
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<RecordDb> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = RecordDb { pool };
    db.migrate().await?;
    Ok(db)
}
