use tower_sessions::Session;

use super::session::{
    SESSION_KEY_ACCOUNT_ID, SESSION_KEY_CLASSES, SESSION_KEY_ROLE, SESSION_KEY_USERNAME,
};
use crate::error::AppError;
use crate::models::account::Role;

/// The authenticated actor for the current request, rebuilt from the session
/// on every request and passed into the core services as a plain value.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub account_id: i64,
    pub username: String,
    pub role: Role,
    /// Raw assignment string as stored on the account; resolved into a
    /// `Scope` where it is needed.
    pub classes: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Extracts the authenticated actor from the session, or `Unauthorized` if
/// nobody is signed in.
pub async fn current_user(session: &Session) -> Result<CurrentUser, AppError> {
    let account_id: i64 = session
        .get(SESSION_KEY_ACCOUNT_ID)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?
        .ok_or(AppError::Unauthorized)?;

    let username: String = session
        .get(SESSION_KEY_USERNAME)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?
        .unwrap_or_default();

    let role: String = session
        .get(SESSION_KEY_ROLE)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?
        .unwrap_or_default();

    let classes: String = session
        .get(SESSION_KEY_CLASSES)
        .await
        .map_err(|e| AppError::Session(e.to_string()))?
        .unwrap_or_default();

    Ok(CurrentUser {
        account_id,
        username,
        role: Role::parse(&role),
        classes,
    })
}

/// Like `current_user`, but additionally requires the admin role.
pub async fn require_admin(session: &Session) -> Result<CurrentUser, AppError> {
    let user = current_user(session).await?;
    if !user.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(user)
}
