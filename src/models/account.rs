use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Account role. Stored as free text in the accounts table; anything the
/// application does not recognize parses to `Other`, which is granted no
/// record visibility at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Teacher,
    Other,
}

impl Role {
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            "teacher" => Role::Teacher,
            _ => Role::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
    /// Comma-separated class assignments, e.g. "Form1-A, Form2". Only
    /// meaningful for teacher accounts.
    pub classes: String,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct CreateAccountData {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub classes: String,
    pub phone: String,
}

impl Account {
    /// Creates a new account. A duplicate username surfaces as a UNIQUE
    /// violation from the store.
    pub async fn create(pool: &SqlitePool, data: CreateAccountData) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO accounts (username, password, role, classes, phone)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(&data.password)
        .bind(data.role.as_str())
        .bind(&data.classes)
        .bind(&data.phone)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM accounts WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Looks up an account by login credentials.
    pub async fn find_by_credentials(
        pool: &SqlitePool,
        username: &str,
        password: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM accounts WHERE username = ? AND password = ?
            "#,
        )
        .bind(username)
        .bind(password)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Lists all teacher accounts for the admin management page.
    pub async fn list_teachers(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let teachers = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM accounts WHERE role = 'teacher' ORDER BY username
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(teachers)
    }

    /// Deletes an account. Active sessions for the account are not revoked.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            DELETE FROM accounts WHERE id = ?
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }
}
