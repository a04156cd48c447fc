use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::ContactRequestId,
    protocol::{ContactRequestRecord, NewContactRequest},
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            // An in-memory database lives and dies with its single connection.
            .max_connections(if is_memory_url(database_url) { 1 } else { 5 })
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to apply contact migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn insert_contact_request(
        &self,
        request: &NewContactRequest,
    ) -> Result<ContactRequestId> {
        let rec = sqlx::query(
            "INSERT INTO contact (full_name, email, phone_number, subject, message)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(request.phone_number.as_deref())
        .bind(&request.subject)
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert contact request")?;
        Ok(ContactRequestId(rec.get::<i64, _>(0)))
    }

    /// Most recent requests first.
    pub async fn list_contact_requests(&self, limit: u32) -> Result<Vec<ContactRequestRecord>> {
        let rows = sqlx::query(
            "SELECT id, full_name, email, phone_number, subject, message, created_at
             FROM contact
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("failed to list contact requests")?;

        Ok(rows
            .into_iter()
            .map(|r| ContactRequestRecord {
                id: ContactRequestId(r.get::<i64, _>(0)),
                full_name: r.get::<String, _>(1),
                email: r.get::<String, _>(2),
                phone_number: r.get::<Option<String>, _>(3),
                subject: r.get::<String, _>(4),
                message: r.get::<String, _>(5),
                created_at: r.get::<DateTime<Utc>, _>(6),
            })
            .collect())
    }

    pub async fn count_contact_requests(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact")
            .fetch_one(&self.pool)
            .await
            .context("failed to count contact requests")?;
        Ok(count)
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
