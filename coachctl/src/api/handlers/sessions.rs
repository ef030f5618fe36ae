//! Training sessions and the exercise logs recorded during them.
//!
//! A session is a schedule row. Creating one goes through the schedule store with the same
//! checks as `POST /schedules`; the routes here add the per-client view and the logs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        schedules::{ScheduleCreate, ScheduleResponse},
        sessions::{SessionLogCreate, SessionLogResponse, SessionLogSetCreate},
        users::CurrentUser,
    },
    db::scope::Scope,
    errors::{Error, Result},
    types::{ClientId, ScheduleId},
};

fn validate_set(set: &SessionLogSetCreate) -> Result<()> {
    let message = if set.set_number < 1 {
        "set_number must be at least 1"
    } else if set.reps < 0 || set.weight_kg < 0.0 {
        "reps and weight_kg must not be negative"
    } else if set.rpe.is_some_and(|rpe| !(1..=10).contains(&rpe)) {
        "rpe must be between 1 and 10"
    } else {
        return Ok(());
    };
    Err(Error::BadRequest {
        message: message.to_string(),
    })
}

/// Start a session with one of the caller's clients
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    request_body = ScheduleCreate,
    tag = "sessions",
    responses(
        (status = 201, description = "Session created", body = ScheduleResponse),
        (status = 400, description = "Missing title or end before start"),
        (status = 404, description = "Client not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_session(
    state: State<AppState>,
    current_user: CurrentUser,
    request: Json<ScheduleCreate>,
) -> Result<(StatusCode, Json<ScheduleResponse>)> {
    super::schedules::create_schedule(state, current_user, request).await
}

/// Sessions of one client, by start time
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/sessions",
    params(("id" = i64, Path, description = "Client ID")),
    tag = "sessions",
    responses(
        (status = 200, description = "Sessions of the client", body = [ScheduleResponse]),
        (status = 404, description = "Client not found or not readable by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_client_sessions(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ClientId>,
) -> Result<Json<Vec<ScheduleResponse>>> {
    let sessions = state.store.list_client_sessions(&Scope::from(&current_user), id).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// Logs recorded in a session, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/logs",
    params(("id" = i64, Path, description = "Session (schedule) ID")),
    tag = "sessions",
    responses(
        (status = 200, description = "Logs with their sets", body = [SessionLogResponse]),
        (status = 404, description = "Session not found or not readable by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_session_logs(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ScheduleId>,
) -> Result<Json<Vec<SessionLogResponse>>> {
    let logs = state.store.list_session_logs(&Scope::from(&current_user), id).await?;
    Ok(Json(logs.into_iter().map(Into::into).collect()))
}

/// Log an exercise and its sets against one of the caller's sessions
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/logs",
    params(("id" = i64, Path, description = "Session (schedule) ID")),
    request_body = SessionLogCreate,
    tag = "sessions",
    responses(
        (status = 201, description = "Log recorded", body = SessionLogResponse),
        (status = 400, description = "Invalid set values"),
        (status = 404, description = "Session not found or not owned by the caller"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_session_log(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<ScheduleId>,
    Json(request): Json<SessionLogCreate>,
) -> Result<(StatusCode, Json<SessionLogResponse>)> {
    request.sets.iter().try_for_each(validate_set)?;
    let log = state
        .store
        .create_session_log(&Scope::from(&current_user), id, &request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(log.into())))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::users::Role,
        test_utils::{
            create_linked_test_client, create_test_client, create_test_config, create_test_state, create_test_user, session_cookie_for,
        },
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    fn session_body(client_id: i64) -> Value {
        json!({
            "client_id": client_id,
            "title": "Lower body",
            "start_time": "2030-03-01T09:00:00Z",
            "end_time": "2030-03-01T10:00:00Z"
        })
    }

    #[test_log::test(tokio::test)]
    async fn test_session_log_lifecycle() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        let cookie = session_cookie_for(&state, &alice);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let created = server
            .post("/api/v1/sessions")
            .add_header("cookie", &cookie)
            .json(&session_body(carol.id))
            .await;
        created.assert_status(StatusCode::CREATED);
        let session_id = created.json::<Value>()["id"].as_i64().unwrap();

        let sessions = server
            .get(&format!("/api/v1/clients/{}/sessions", carol.id))
            .add_header("cookie", &cookie)
            .await;
        sessions.assert_status_ok();
        assert_eq!(sessions.json::<Value>().as_array().unwrap().len(), 1);

        let log = server
            .post(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &cookie)
            .json(&json!({
                "exercise_id": 7,
                "notes": "Depth improving",
                "sets": [
                    {"set_number": 1, "weight_kg": 60.0, "reps": 8},
                    {"set_number": 2, "weight_kg": 65.0, "reps": 6, "rpe": 8}
                ]
            }))
            .await;
        log.assert_status(StatusCode::CREATED);
        let log: Value = log.json();
        assert_eq!(log["schedule_id"], session_id);
        assert_eq!(log["sets"].as_array().unwrap().len(), 2);
        assert_eq!(log["sets"][1]["rpe"], 8);

        let logs = server
            .get(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &cookie)
            .await;
        logs.assert_status_ok();
        assert_eq!(logs.json::<Value>()[0]["notes"], "Depth improving");
    }

    #[test_log::test(tokio::test)]
    async fn test_foreign_trainer_cannot_see_or_log_sessions() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let mallory = create_test_user(&store, "mallory@example.com", "pw2", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        let alice_cookie = session_cookie_for(&state, &alice);
        let mallory_cookie = session_cookie_for(&state, &mallory);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let created = server
            .post("/api/v1/sessions")
            .add_header("cookie", &alice_cookie)
            .json(&session_body(carol.id))
            .await;
        let session_id = created.json::<Value>()["id"].as_i64().unwrap();

        let sessions = server
            .get(&format!("/api/v1/clients/{}/sessions", carol.id))
            .add_header("cookie", &mallory_cookie)
            .await;
        sessions.assert_status(StatusCode::NOT_FOUND);
        sessions.assert_json(&json!({"error": "Client not found"}));

        let log = server
            .post(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &mallory_cookie)
            .json(&json!({"notes": "Hijack"}))
            .await;
        log.assert_status(StatusCode::NOT_FOUND);
        log.assert_json(&json!({"error": "Schedule not found"}));

        server
            .get(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &mallory_cookie)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/api/v1/sessions")
            .add_header("cookie", &mallory_cookie)
            .json(&session_body(carol.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn test_linked_client_account_reads_its_sessions() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let carol_account = create_test_user(&store, "carol@example.com", "pw2", Role::Client).await;
        let dave_account = create_test_user(&store, "dave@example.com", "pw3", Role::Client).await;
        let carol = create_linked_test_client(&store, &alice, "Carol", &carol_account).await;
        let alice_cookie = session_cookie_for(&state, &alice);
        let carol_cookie = session_cookie_for(&state, &carol_account);
        let dave_cookie = session_cookie_for(&state, &dave_account);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let created = server
            .post("/api/v1/sessions")
            .add_header("cookie", &alice_cookie)
            .json(&session_body(carol.id))
            .await;
        let session_id = created.json::<Value>()["id"].as_i64().unwrap();
        server
            .post(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &alice_cookie)
            .json(&json!({"sets": [{"set_number": 1, "reps": 12}]}))
            .await
            .assert_status(StatusCode::CREATED);

        let sessions = server
            .get(&format!("/api/v1/clients/{}/sessions", carol.id))
            .add_header("cookie", &carol_cookie)
            .await;
        sessions.assert_status_ok();
        assert_eq!(sessions.json::<Value>()[0]["id"], session_id);

        let logs = server
            .get(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &carol_cookie)
            .await;
        logs.assert_status_ok();
        assert_eq!(logs.json::<Value>()[0]["sets"][0]["reps"], 12);

        // The client account reads but never logs.
        server
            .post(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &carol_cookie)
            .json(&json!({"notes": "Self-logged"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .get(&format!("/api/v1/clients/{}/sessions", carol.id))
            .add_header("cookie", &dave_cookie)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn test_session_log_set_validation() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        let cookie = session_cookie_for(&state, &alice);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        let created = server
            .post("/api/v1/sessions")
            .add_header("cookie", &cookie)
            .json(&session_body(carol.id))
            .await;
        let session_id = created.json::<Value>()["id"].as_i64().unwrap();

        let response = server
            .post(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &cookie)
            .json(&json!({"sets": [{"set_number": 1, "reps": 5, "rpe": 12}]}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "rpe must be between 1 and 10"}));

        let response = server
            .post(&format!("/api/v1/sessions/{session_id}/logs"))
            .add_header("cookie", &cookie)
            .json(&json!({"sets": [{"set_number": 0, "reps": 5}]}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
