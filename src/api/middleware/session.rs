use axum::extract::FromRef;
use sqlx::SqlitePool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

/// Session keys used in the application
pub const SESSION_KEY_ACCOUNT_ID: &str = "account_id";
pub const SESSION_KEY_USERNAME: &str = "username";
pub const SESSION_KEY_ROLE: &str = "role";
pub const SESSION_KEY_CLASSES: &str = "classes";

/// Creates a session layer for Axum
pub async fn create_session_layer(
    pool: SqlitePool,
) -> Result<SessionManagerLayer<SqliteStore>, sqlx::Error> {
    // Create the session store backed by SQLite
    let session_store = SqliteStore::new(pool);
    session_store.migrate().await?;

    // Build the session layer
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // served over plain HTTP inside the school network
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(12)));

    Ok(session_layer)
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.pool.clone()
    }
}
