use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};

use crate::{
    AppState,
    api::{
        handlers::require_text,
        models::{
            schedules::{ScheduleCreate, ScheduleResponse, ScheduleUpdate},
            users::CurrentUser,
        },
    },
    db::{errors::DbError, scope::Scope},
    errors::{Error, Result},
    types::ScheduleId,
};

const TIME_RANGE_MESSAGE: &str = "end_time must be after start_time";

pub(crate) fn ensure_ordered(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Result<()> {
    if end_time <= start_time {
        return Err(Error::BadRequest {
            message: TIME_RANGE_MESSAGE.to_string(),
        });
    }
    Ok(())
}

/// A partial update can only be checked against the stored row, so the store reports it.
fn time_range_error(err: DbError) -> Error {
    match err {
        DbError::CheckViolation { constraint: Some(ref c), .. } if c == "schedules_time_range_check" => Error::BadRequest {
            message: TIME_RANGE_MESSAGE.to_string(),
        },
        other => other.into(),
    }
}

/// List sessions visible to the caller, by start time
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    tag = "schedules",
    responses(
        (status = 200, description = "Sessions the caller runs, or attends as a client", body = [ScheduleResponse]),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_schedules(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<Vec<ScheduleResponse>>> {
    let schedules = state.store.list_schedules(&Scope::from(&current_user)).await?;
    Ok(Json(schedules.into_iter().map(Into::into).collect()))
}

/// Schedule a session with one of the caller's clients
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = ScheduleCreate,
    tag = "schedules",
    responses(
        (status = 201, description = "Session scheduled", body = ScheduleResponse),
        (status = 400, description = "Missing title or end before start"),
        (status = 404, description = "Client not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<ScheduleCreate>,
) -> Result<(StatusCode, Json<ScheduleResponse>)> {
    require_text(&request.title, "Title")?;
    ensure_ordered(request.start_time, request.end_time)?;
    let schedule = state
        .store
        .create_schedule(&Scope::from(&current_user), &request.into())
        .await
        .map_err(time_range_error)?;
    Ok((StatusCode::CREATED, Json(schedule.into())))
}

/// Update one of the caller's sessions
#[utoipa::path(
    put,
    path = "/api/v1/schedules/{id}",
    params(("id" = i64, Path, description = "Schedule ID")),
    request_body = ScheduleUpdate,
    tag = "schedules",
    responses(
        (status = 200, description = "Session updated", body = ScheduleResponse),
        (status = 400, description = "End before start"),
        (status = 404, description = "Session not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_schedule(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ScheduleId>,
    Json(request): Json<ScheduleUpdate>,
) -> Result<Json<ScheduleResponse>> {
    if let Some(title) = &request.title {
        require_text(title, "Title")?;
    }
    if let (Some(start_time), Some(end_time)) = (request.start_time, request.end_time) {
        ensure_ordered(start_time, end_time)?;
    }
    let schedule = state
        .store
        .update_schedule(&Scope::from(&current_user), id, &request.into())
        .await
        .map_err(time_range_error)?;
    Ok(Json(schedule.into()))
}

/// Cancel one of the caller's sessions
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{id}",
    params(("id" = i64, Path, description = "Schedule ID")),
    tag = "schedules",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_schedule(State(state): State<AppState>, current_user: CurrentUser, Path(id): Path<ScheduleId>) -> Result<StatusCode> {
    state.store.delete_schedule(&Scope::from(&current_user), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::users::Role,
        test_utils::{create_test_client, create_test_config, create_test_state, create_test_user, session_cookie_for},
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    #[test_log::test(tokio::test)]
    async fn test_schedule_lifecycle() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        let cookie = session_cookie_for(&state, &alice);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let created = server
            .post("/api/v1/schedules")
            .add_header("cookie", &cookie)
            .json(&json!({
                "client_id": carol.id,
                "title": "Mobility",
                "start_time": "2030-03-01T09:00:00Z",
                "end_time": "2030-03-01T10:00:00Z"
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let schedule: Value = created.json();
        assert_eq!(schedule["status"], "scheduled");
        let id = schedule["id"].as_i64().unwrap();

        let updated = server
            .put(&format!("/api/v1/schedules/{id}"))
            .add_header("cookie", &cookie)
            .json(&json!({"status": "completed"}))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Value>()["title"], "Mobility");

        server
            .delete(&format!("/api/v1/schedules/{id}"))
            .add_header("cookie", &cookie)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        let list = server.get("/api/v1/schedules").add_header("cookie", &cookie).await;
        assert!(list.json::<Value>().as_array().unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_schedule_validation() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        let cookie = session_cookie_for(&state, &alice);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let backwards = server
            .post("/api/v1/schedules")
            .add_header("cookie", &cookie)
            .json(&json!({
                "client_id": carol.id,
                "title": "Backwards",
                "start_time": "2030-03-01T10:00:00Z",
                "end_time": "2030-03-01T09:00:00Z"
            }))
            .await;
        backwards.assert_status(StatusCode::BAD_REQUEST);

        let untitled = server
            .post("/api/v1/schedules")
            .add_header("cookie", &cookie)
            .json(&json!({
                "client_id": carol.id,
                "title": "",
                "start_time": "2030-03-01T09:00:00Z",
                "end_time": "2030-03-01T10:00:00Z"
            }))
            .await;
        untitled.assert_status(StatusCode::BAD_REQUEST);
        untitled.assert_json(&json!({"error": "Title is required"}));
    }

    #[test_log::test(tokio::test)]
    async fn test_partial_update_cannot_invert_time_range() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        let cookie = session_cookie_for(&state, &alice);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let created = server
            .post("/api/v1/schedules")
            .add_header("cookie", &cookie)
            .json(&json!({
                "client_id": carol.id,
                "title": "Mobility",
                "start_time": "2030-03-01T09:00:00Z",
                "end_time": "2030-03-01T10:00:00Z"
            }))
            .await;
        let id = created.json::<Value>()["id"].as_i64().unwrap();

        let response = server
            .put(&format!("/api/v1/schedules/{id}"))
            .add_header("cookie", &cookie)
            .json(&json!({"end_time": "2030-03-01T08:00:00Z"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "end_time must be after start_time"}));

        let list = server.get("/api/v1/schedules").add_header("cookie", &cookie).await;
        assert_eq!(list.json::<Value>()[0]["end_time"], "2030-03-01T10:00:00Z");
    }

    #[test_log::test(tokio::test)]
    async fn test_schedule_for_foreign_client_is_rejected() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let mallory = create_test_user(&store, "mallory@example.com", "pw2", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        let cookie = session_cookie_for(&state, &mallory);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let response = server
            .post("/api/v1/schedules")
            .add_header("cookie", &cookie)
            .json(&json!({
                "client_id": carol.id,
                "title": "Hijack",
                "start_time": "2030-03-01T09:00:00Z",
                "end_time": "2030-03-01T10:00:00Z"
            }))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&json!({"error": "Client not found"}));
    }
}
