use askama::Template;
use axum::{extract::State, routing::get, Router};
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::api::middleware::auth::current_user;
use crate::api::middleware::session::AppState;
use crate::error::AppError;
use crate::models::history::HistoryEntry;

#[derive(Template)]
#[template(path = "history.html")]
struct HistoryTemplate {
    records: Vec<HistoryEntry>,
}

/// Chronological pickup log, newest first.
async fn history_page(
    State(pool): State<SqlitePool>,
    session: Session,
) -> Result<HistoryTemplate, AppError> {
    current_user(&session).await?;

    let records = HistoryEntry::list_recent(&pool).await?;

    Ok(HistoryTemplate { records })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/history", get(history_page))
}
