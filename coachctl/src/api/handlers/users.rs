//! User administration.
//!
//! The static administrative token may manage every account. A session user sees and edits
//! only their own account; any other id is reported as not found.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        pagination::PaginatedResponse,
        users::{ListUsersQuery, UserResponse, UserUpdate},
    },
    auth::current_user::Principal,
    db::handlers::UserFilter,
    errors::{Error, Result},
    types::UserId,
};

fn ensure_user_access(principal: &Principal, id: UserId) -> Result<()> {
    match principal {
        Principal::Service => Ok(()),
        Principal::User(user) if user.id == id => Ok(()),
        Principal::User(_) => Err(Error::NotFoundOrUnauthorized {
            resource: "User".to_string(),
        }),
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::NotFound {
        resource: "User".to_string(),
        id: id.to_string(),
    }
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListUsersQuery),
    tag = "users",
    responses(
        (status = 200, description = "Paginated list of users", body = PaginatedResponse<UserResponse>),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<PaginatedResponse<UserResponse>>> {
    let (skip, limit) = query.pagination.params();

    match principal {
        Principal::Service => {
            let users = state.store.list_users(&UserFilter::new(skip, limit)).await?;
            let total_count = state.store.count_users().await?;
            Ok(Json(PaginatedResponse::new(
                users.into_iter().map(UserResponse::from).collect(),
                total_count,
                skip,
                limit,
            )))
        }
        Principal::User(user) => {
            let me = state.store.get_user_by_id(user.id).await?.ok_or_else(|| user_not_found(user.id))?;
            let data = if skip == 0 { vec![UserResponse::from(me)] } else { Vec::new() };
            Ok(Json(PaginatedResponse::new(data, 1, skip, limit)))
        }
    }
}

/// Get a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    tag = "users",
    responses(
        (status = 200, description = "User details", body = UserResponse),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(State(state): State<AppState>, principal: Principal, Path(id): Path<UserId>) -> Result<Json<UserResponse>> {
    ensure_user_access(&principal, id)?;
    let user = state.store.get_user_by_id(id).await?.ok_or_else(|| user_not_found(id))?;
    Ok(Json(user.into()))
}

/// Update a user's profile
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserUpdate,
    tag = "users",
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<UserId>,
    Json(request): Json<UserUpdate>,
) -> Result<Json<UserResponse>> {
    ensure_user_access(&principal, id)?;
    if let Some(name) = &request.name {
        super::require_text(name, "Name")?;
    }
    let user = state.store.update_user(id, &request.into()).await?;
    Ok(Json(user.into()))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User ID")),
    tag = "users",
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_user(State(state): State<AppState>, principal: Principal, Path(id): Path<UserId>) -> Result<StatusCode> {
    ensure_user_access(&principal, id)?;
    if !state.store.delete_user(id).await? {
        return Err(user_not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}
