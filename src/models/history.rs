use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Sqlite, SqlitePool};

/// An immutable record of a completed pickup. The student fields are a
/// denormalized snapshot taken at pickup time, not a foreign key, so entries
/// survive later edits to the student record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub student_name: String,
    pub parent: String,
    pub parent_number: String,
    pub picked_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateHistoryData {
    pub student_name: String,
    pub parent: String,
    pub parent_number: String,
    pub picked_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Appends a pickup entry. Takes any executor so the caller can run it
    /// inside the same transaction as the status update.
    pub async fn append<'e, E>(executor: E, data: CreateHistoryData) -> Result<Self, sqlx::Error>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let entry = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO history (student_name, parent, parent_number, picked_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.student_name)
        .bind(&data.parent)
        .bind(&data.parent_number)
        .bind(data.picked_at)
        .fetch_one(executor)
        .await?;

        Ok(entry)
    }

    /// Lists all pickup entries, newest first.
    pub async fn list_recent(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let entries = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM history ORDER BY id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(entries)
    }
}
