use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::middleware::auth::require_admin;
use crate::api::middleware::session::AppState;
use crate::error::{is_unique_violation, AppError};
use crate::models::account::{Account, CreateAccountData, Role};
use crate::services::scope::resolve_scope;

#[derive(Template)]
#[template(path = "create_user.html")]
struct CreateUserTemplate {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "manage_users.html")]
struct ManageUsersTemplate {
    teachers: Vec<Account>,
    teacher_count: usize,
}

async fn create_user_page(session: Session) -> Result<CreateUserTemplate, AppError> {
    require_admin(&session).await?;
    Ok(CreateUserTemplate { error: None })
}

#[derive(Debug, Deserialize)]
struct CreateUserForm {
    username: String,
    password: String,
    role: String,
    classes: String,
    phone: String,
}

async fn create_user_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, AppError> {
    require_admin(&session).await?;

    let role = Role::parse(&form.role);
    if role == Role::Other {
        return Ok(CreateUserTemplate {
            error: Some(format!("Unknown role {:?}.", form.role)),
        }
        .into_response());
    }

    // Reject a malformed assignment string at setup time, while an admin is
    // looking at the form, instead of failing the teacher's roster later.
    if role == Role::Teacher {
        if let Err(e) = resolve_scope(Role::Teacher, &form.classes) {
            return Ok(CreateUserTemplate {
                error: Some(e.to_string()),
            }
            .into_response());
        }
    }

    let data = CreateAccountData {
        username: form.username,
        password: form.password,
        role,
        classes: form.classes,
        phone: form.phone,
    };

    match Account::create(&state.pool, data).await {
        Ok(account) => {
            tracing::info!(account_id = account.id, role = %account.role, "account created");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if is_unique_violation(&e) => Ok(CreateUserTemplate {
            error: Some("Username already exists!".to_string()),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

async fn manage_users(
    State(state): State<AppState>,
    session: Session,
) -> Result<ManageUsersTemplate, AppError> {
    require_admin(&session).await?;

    let teachers = Account::list_teachers(&state.pool).await?;
    let teacher_count = teachers.len();

    Ok(ManageUsersTemplate {
        teachers,
        teacher_count,
    })
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    session: Session,
) -> Result<Redirect, AppError> {
    require_admin(&session).await?;

    Account::delete(&state.pool, id).await?;
    tracing::info!(account_id = id, "account deleted");

    Ok(Redirect::to("/users"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(manage_users))
        .route("/users/create", get(create_user_page).post(create_user_submit))
        .route("/users/:id/delete", post(delete_user))
}
