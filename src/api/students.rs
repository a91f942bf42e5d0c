use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::api::middleware::auth::current_user;
use crate::api::middleware::session::AppState;
use crate::error::{is_unique_violation, AppError};
use crate::models::student::{CreateStudentData, Student};
use crate::services::pickup;
use crate::services::roster::{self, RosterParams};
use crate::services::scope::resolve_scope;

#[derive(Template)]
#[template(path = "roster.html")]
struct RosterTemplate {
    students: Vec<Student>,
    username: String,
    is_admin: bool,
    search: String,
    filter_class: String,
    filter_stream: String,
    notice: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "add_student.html")]
struct AddStudentTemplate {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RosterQueryParams {
    search: Option<String>,
    filter_class: Option<String>,
    filter_stream: Option<String>,
    notice: Option<String>,
}

/// Treats blank form/query values the same as absent ones.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "completed" => Some("Pickup recorded."),
        "verification_failed" => Some("Admission number did not match; pickup was not recorded."),
        "record_not_found" => Some("That student record no longer exists."),
        _ => None,
    }
}

/// Home page: the roster of students visible to the signed-in account, with
/// a name search and, for admins, exact class/stream filters.
async fn roster_page(
    State(state): State<AppState>,
    Query(params): Query<RosterQueryParams>,
    session: Session,
) -> Result<RosterTemplate, AppError> {
    let user = current_user(&session).await?;
    let scope = resolve_scope(user.role, &user.classes)?;

    let roster_params = RosterParams {
        search: non_empty(params.search),
        filter_class: non_empty(params.filter_class),
        filter_stream: non_empty(params.filter_stream),
    };
    let students = roster::query_roster(&state.pool, &scope, &roster_params).await?;

    let is_admin = user.is_admin();
    Ok(RosterTemplate {
        students,
        username: user.username,
        is_admin,
        search: roster_params.search.unwrap_or_default(),
        filter_class: roster_params.filter_class.unwrap_or_default(),
        filter_stream: roster_params.filter_stream.unwrap_or_default(),
        notice: params.notice.as_deref().and_then(notice_message),
    })
}

async fn add_student_page(session: Session) -> Result<AddStudentTemplate, AppError> {
    current_user(&session).await?;
    Ok(AddStudentTemplate { error: None })
}

#[derive(Debug, Deserialize)]
struct AddStudentForm {
    name: String,
    class: String,
    stream: String,
    parent: String,
    parent_number: String,
    admission_number: String,
}

async fn add_student_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddStudentForm>,
) -> Result<Response, AppError> {
    current_user(&session).await?;

    let data = CreateStudentData {
        name: form.name,
        class: form.class,
        stream: form.stream,
        parent: form.parent,
        parent_number: form.parent_number,
        admission_number: form.admission_number,
    };

    match Student::create(&state.pool, data).await {
        Ok(student) => {
            tracing::info!(student_id = student.id, "student registered");
            Ok(Redirect::to("/").into_response())
        }
        Err(e) if is_unique_violation(&e) => Ok(AddStudentTemplate {
            error: Some("Admission number already exists!".to_string()),
        }
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize)]
struct PickupForm {
    admission_number: String,
}

/// Pickup attempt for one student. Verification failures are business
/// rejections: the request completes and the roster page shows the outcome.
async fn pickup_student(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    session: Session,
    Form(form): Form<PickupForm>,
) -> Result<Redirect, AppError> {
    current_user(&session).await?;

    let outcome = pickup::verify_and_pickup(&state.pool, id, &form.admission_number).await?;

    Ok(Redirect::to(&format!("/?notice={}", outcome.outcome_type())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(roster_page))
        .route("/students/add", get(add_student_page).post(add_student_submit))
        .route("/students/:id/pickup", post(pickup_student))
}
