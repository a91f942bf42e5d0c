use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::models::account::{Account, CreateAccountData, Role};

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(3));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))
}

/// Creates the default admin account on first start so a fresh instance is
/// reachable. Credentials come from configuration; an existing account with
/// the configured username is left untouched.
pub async fn bootstrap_admin(pool: &SqlitePool, config: &Config) -> Result<(), sqlx::Error> {
    if Account::find_by_username(pool, &config.admin_username)
        .await?
        .is_none()
    {
        Account::create(
            pool,
            CreateAccountData {
                username: config.admin_username.clone(),
                password: config.admin_password.expose_secret().clone(),
                role: Role::Admin,
                classes: String::new(),
                phone: String::new(),
            },
        )
        .await?;
        tracing::info!(username = %config.admin_username, "created default admin account");
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    // A single connection keeps every test statement on the same in-memory
    // database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}
