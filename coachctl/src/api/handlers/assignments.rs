use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::{
        handlers::require_text,
        models::{
            assignments::{AssignmentCreate, AssignmentResponse, AssignmentUpdate},
            users::CurrentUser,
        },
    },
    db::scope::Scope,
    errors::Result,
    types::AssignmentId,
};

/// List assignments visible to the caller, soonest due first
#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    tag = "assignments",
    responses(
        (status = 200, description = "Assignments the caller set, or was given as a client", body = [AssignmentResponse]),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_assignments(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<AssignmentResponse>>> {
    let assignments = state.store.list_assignments(&Scope::from(&current_user)).await?;
    Ok(Json(assignments.into_iter().map(Into::into).collect()))
}

/// Give one of the caller's clients an assignment
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = AssignmentCreate,
    tag = "assignments",
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 400, description = "Missing title"),
        (status = 404, description = "Client not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_assignment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentResponse>)> {
    require_text(&request.title, "Title")?;
    let assignment = state.store.create_assignment(&Scope::from(&current_user), &request.into()).await?;
    Ok((StatusCode::CREATED, Json(assignment.into())))
}

/// Update one of the caller's assignments
#[utoipa::path(
    put,
    path = "/api/v1/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment ID")),
    request_body = AssignmentUpdate,
    tag = "assignments",
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentResponse),
        (status = 404, description = "Assignment not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_assignment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<AssignmentId>,
    Json(request): Json<AssignmentUpdate>,
) -> Result<Json<AssignmentResponse>> {
    if let Some(title) = &request.title {
        require_text(title, "Title")?;
    }
    let assignment = state
        .store
        .update_assignment(&Scope::from(&current_user), id, &request.into())
        .await?;
    Ok(Json(assignment.into()))
}

/// Delete one of the caller's assignments
#[utoipa::path(
    delete,
    path = "/api/v1/assignments/{id}",
    params(("id" = i64, Path, description = "Assignment ID")),
    tag = "assignments",
    responses(
        (status = 204, description = "Assignment deleted"),
        (status = 404, description = "Assignment not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_assignment(State(state): State<AppState>, current_user: CurrentUser, Path(id): Path<AssignmentId>) -> Result<StatusCode> {
    state.store.delete_assignment(&Scope::from(&current_user), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
