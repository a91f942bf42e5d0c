use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::services::scope::ScopeError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Assignment error: {0}")]
    Assignment(#[from] ScopeError),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Not signed in: send the browser to the login form
            AppError::Unauthorized => return Redirect::to("/login").into_response(),

            AppError::Forbidden => (StatusCode::FORBIDDEN, "Access denied.".to_string()),
            AppError::Assignment(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Class assignments for this account are misconfigured; an administrator needs to correct them.".to_string(),
            ),
            AppError::Database(_) | AppError::Session(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        (status, message).into_response()
    }
}

/// Whether a store error is a UNIQUE constraint violation, e.g. a duplicate
/// username or admission number. Callers render those as form errors instead
/// of failing the request.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
