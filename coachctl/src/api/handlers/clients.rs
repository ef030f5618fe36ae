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
            clients::{ClientCreate, ClientResponse, ClientUpdate, NoteCreate, NoteResponse},
            users::CurrentUser,
        },
    },
    db::{models::clients::NoteCreateDBRequest, scope::Scope},
    errors::Result,
    types::ClientId,
};

/// List the caller's clients. A client account sees the records linked to it.
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "clients",
    responses(
        (status = 200, description = "Clients owned by or linked to the caller, by name", body = [ClientResponse]),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_clients(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<ClientResponse>>> {
    let clients = state.store.list_clients(&Scope::from(&current_user)).await?;
    Ok(Json(clients.into_iter().map(Into::into).collect()))
}

/// Create a client owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    request_body = ClientCreate,
    tag = "clients",
    responses(
        (status = 201, description = "Client created", body = ClientResponse),
        (status = 400, description = "Missing name"),
        (status = 404, description = "`user_id` is not a client account"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_client(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ClientCreate>,
) -> Result<(StatusCode, Json<ClientResponse>)> {
    require_text(&request.name, "Name")?;
    let client = state.store.create_client(&Scope::from(&current_user), &request.into()).await?;
    Ok((StatusCode::CREATED, Json(client.into())))
}

/// Get one of the caller's clients, or the record linked to a client account
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    params(("id" = i64, Path, description = "Client ID")),
    tag = "clients",
    responses(
        (status = 200, description = "Client details", body = ClientResponse),
        (status = 404, description = "Client not found or not readable by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_client(State(state): State<AppState>, current_user: CurrentUser, Path(id): Path<ClientId>) -> Result<Json<ClientResponse>> {
    let client = state.store.get_client(&Scope::from(&current_user), id).await?;
    Ok(Json(client.into()))
}

/// Update one of the caller's clients. Absent fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}",
    params(("id" = i64, Path, description = "Client ID")),
    request_body = ClientUpdate,
    tag = "clients",
    responses(
        (status = 200, description = "Client updated", body = ClientResponse),
        (status = 404, description = "Client not found or not owned by the caller, or `user_id` is not a client account"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_client(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ClientId>,
    Json(request): Json<ClientUpdate>,
) -> Result<Json<ClientResponse>> {
    if let Some(name) = &request.name {
        require_text(name, "Name")?;
    }
    let client = state.store.update_client(&Scope::from(&current_user), id, &request.into()).await?;
    Ok(Json(client.into()))
}

/// Delete one of the caller's clients, with their notes, schedules and assignments
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    params(("id" = i64, Path, description = "Client ID")),
    tag = "clients",
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_client(State(state): State<AppState>, current_user: CurrentUser, Path(id): Path<ClientId>) -> Result<StatusCode> {
    state.store.delete_client(&Scope::from(&current_user), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List notes on one of the caller's clients, newest first
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/notes",
    params(("id" = i64, Path, description = "Client ID")),
    tag = "clients",
    responses(
        (status = 200, description = "Client notes", body = [NoteResponse]),
        (status = 404, description = "Client not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_client_notes(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Vec<NoteResponse>>> {
    let notes = state.store.list_client_notes(&Scope::from(&current_user), id).await?;
    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

/// Add a note to one of the caller's clients
#[utoipa::path(
    post,
    path = "/api/v1/clients/{id}/notes",
    params(("id" = i64, Path, description = "Client ID")),
    request_body = NoteCreate,
    tag = "clients",
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Missing content"),
        (status = 404, description = "Client not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_client_note(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ClientId>,
    Json(request): Json<NoteCreate>,
) -> Result<(StatusCode, Json<NoteResponse>)> {
    require_text(&request.content, "Content")?;
    let request = NoteCreateDBRequest::new(request, current_user.name.clone());
    let note = state.store.create_client_note(&Scope::from(&current_user), id, &request).await?;
    Ok((StatusCode::CREATED, Json(note.into())))
}
