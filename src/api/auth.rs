use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::middleware::session::{
    AppState, SESSION_KEY_ACCOUNT_ID, SESSION_KEY_CLASSES, SESSION_KEY_ROLE, SESSION_KEY_USERNAME,
};
use crate::error::AppError;
use crate::models::account::Account;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: Option<String>,
}

async fn login_page() -> LoginTemplate {
    LoginTemplate { error: None }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let account = Account::find_by_credentials(&state.pool, &form.username, &form.password).await?;

    let Some(account) = account else {
        tracing::info!(username = %form.username, "rejected login");
        return Ok(LoginTemplate {
            error: Some("Invalid username or password.".to_string()),
        }
        .into_response());
    };

    session
        .insert(SESSION_KEY_ACCOUNT_ID, account.id)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert(SESSION_KEY_USERNAME, account.username.clone())
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert(SESSION_KEY_ROLE, account.role.clone())
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;
    session
        .insert(SESSION_KEY_CLASSES, account.classes.clone())
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    tracing::info!(account_id = account.id, role = %account.role, "login");

    Ok(Redirect::to("/").into_response())
}

async fn logout(session: Session) -> Result<Redirect, AppError> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Session(e.to_string()))?;

    Ok(Redirect::to("/login"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", get(logout))
}
