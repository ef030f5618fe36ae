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
            programs::{ProgramCreate, ProgramExerciseCreate, ProgramExerciseResponse, ProgramResponse, ProgramUpdate},
            users::CurrentUser,
        },
    },
    db::scope::Scope,
    errors::Result,
    types::{ProgramExerciseId, ProgramId},
};

/// List programs visible to the caller, newest first.
///
/// Trainers see the programs they wrote; clients see the programs written for them.
#[utoipa::path(
    get,
    path = "/api/v1/programs",
    tag = "programs",
    responses(
        (status = 200, description = "Programs visible to the caller", body = [ProgramResponse]),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_programs(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<ProgramResponse>>> {
    let programs = state.store.list_programs(&Scope::from(&current_user)).await?;
    Ok(Json(programs.into_iter().map(Into::into).collect()))
}

/// Create a program, either a template or written for one of the caller's clients
#[utoipa::path(
    post,
    path = "/api/v1/programs",
    request_body = ProgramCreate,
    tag = "programs",
    responses(
        (status = 201, description = "Program created", body = ProgramResponse),
        (status = 400, description = "Missing name"),
        (status = 404, description = "Client not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_program(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ProgramCreate>,
) -> Result<(StatusCode, Json<ProgramResponse>)> {
    require_text(&request.name, "Name")?;
    let program = state.store.create_program(&Scope::from(&current_user), &request.into()).await?;
    Ok((StatusCode::CREATED, Json(program.into())))
}

/// Get a program with its exercises
#[utoipa::path(
    get,
    path = "/api/v1/programs/{id}",
    params(("id" = i64, Path, description = "Program ID")),
    tag = "programs",
    responses(
        (status = 200, description = "Program details including exercises", body = ProgramResponse),
        (status = 404, description = "Program not found or not visible to the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_program(State(state): State<AppState>, current_user: CurrentUser, Path(id): Path<ProgramId>) -> Result<Json<ProgramResponse>> {
    let scope = Scope::from(&current_user);
    let program = state.store.get_program(&scope, id).await?;
    let exercises = state.store.list_program_exercises(&scope, id).await?;
    Ok(Json(ProgramResponse::from(program).with_exercises(exercises)))
}

/// Update one of the caller's programs
#[utoipa::path(
    put,
    path = "/api/v1/programs/{id}",
    params(("id" = i64, Path, description = "Program ID")),
    request_body = ProgramUpdate,
    tag = "programs",
    responses(
        (status = 200, description = "Program updated", body = ProgramResponse),
        (status = 404, description = "Program not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_program(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ProgramId>,
    Json(request): Json<ProgramUpdate>,
) -> Result<Json<ProgramResponse>> {
    if let Some(name) = &request.name {
        require_text(name, "Name")?;
    }
    let program = state.store.update_program(&Scope::from(&current_user), id, &request.into()).await?;
    Ok(Json(program.into()))
}

/// Delete one of the caller's programs
#[utoipa::path(
    delete,
    path = "/api/v1/programs/{id}",
    params(("id" = i64, Path, description = "Program ID")),
    tag = "programs",
    responses(
        (status = 204, description = "Program deleted"),
        (status = 404, description = "Program not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_program(State(state): State<AppState>, current_user: CurrentUser, Path(id): Path<ProgramId>) -> Result<StatusCode> {
    state.store.delete_program(&Scope::from(&current_user), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add an exercise to one of the caller's programs
#[utoipa::path(
    post,
    path = "/api/v1/programs/{id}/exercises",
    params(("id" = i64, Path, description = "Program ID")),
    request_body = ProgramExerciseCreate,
    tag = "programs",
    responses(
        (status = 201, description = "Exercise added", body = ProgramExerciseResponse),
        (status = 404, description = "Program not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn add_program_exercise(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ProgramId>,
    Json(request): Json<ProgramExerciseCreate>,
) -> Result<(StatusCode, Json<ProgramExerciseResponse>)> {
    let exercise = state
        .store
        .add_program_exercise(&Scope::from(&current_user), id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(exercise.into())))
}

/// Remove an exercise from one of the caller's programs
#[utoipa::path(
    delete,
    path = "/api/v1/programs/{id}/exercises/{exercise_id}",
    params(
        ("id" = i64, Path, description = "Program ID"),
        ("exercise_id" = i64, Path, description = "Program exercise ID"),
    ),
    tag = "programs",
    responses(
        (status = 204, description = "Exercise removed"),
        (status = 404, description = "Program or exercise not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn remove_program_exercise(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path((id, exercise_id)): Path<(ProgramId, ProgramExerciseId)>,
) -> Result<StatusCode> {
    state
        .store
        .remove_program_exercise(&Scope::from(&current_user), id, exercise_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
