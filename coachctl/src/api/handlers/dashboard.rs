use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{dashboard::DashboardStats, users::CurrentUser},
    db::scope::Scope,
    errors::Result,
};

/// Counts of the caller's clients, active programs and upcoming sessions
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/stats",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard statistics for the caller", body = DashboardStats),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_dashboard_stats(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<DashboardStats>> {
    let stats = state.store.dashboard_stats(&Scope::from(&current_user)).await?;
    Ok(Json(stats.into()))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{dashboard::DashboardStats, users::Role},
        test_utils::{
            create_linked_test_client, create_test_client, create_test_config, create_test_state, create_test_user, session_cookie_for,
        },
    };
    use axum_test::TestServer;
    use serde_json::json;

    #[test_log::test(tokio::test)]
    async fn test_dashboard_counts_only_callers_rows() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let bob = create_test_user(&store, "bob@example.com", "pw2", Role::Trainer).await;
        let carol = create_test_client(&store, &alice, "Carol").await;
        create_test_client(&store, &alice, "Dave").await;
        create_test_client(&store, &bob, "Erin").await;
        let alice_cookie = session_cookie_for(&state, &alice);
        let bob_cookie = session_cookie_for(&state, &bob);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        server
            .post("/api/v1/programs")
            .add_header("cookie", &alice_cookie)
            .json(&json!({"name": "Carol's block", "client_id": carol.id}))
            .await;
        server
            .post("/api/v1/schedules")
            .add_header("cookie", &alice_cookie)
            .json(&json!({
                "client_id": carol.id,
                "title": "Check-in",
                "start_time": "2099-01-01T09:00:00Z",
                "end_time": "2099-01-01T10:00:00Z"
            }))
            .await;

        let alice_stats: DashboardStats = server
            .get("/api/v1/dashboard/stats")
            .add_header("cookie", &alice_cookie)
            .await
            .json();
        assert_eq!(
            alice_stats,
            DashboardStats {
                total_clients: 2,
                active_programs: 1,
                upcoming_sessions: 1,
            }
        );

        let bob_stats: DashboardStats = server.get("/api/v1/dashboard/stats").add_header("cookie", &bob_cookie).await.json();
        assert_eq!(
            bob_stats,
            DashboardStats {
                total_clients: 1,
                active_programs: 0,
                upcoming_sessions: 0,
            }
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_client_account_counts_rows_of_its_linked_record() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let carol_account = create_test_user(&store, "carol@example.com", "pw2", Role::Client).await;
        let carol = create_linked_test_client(&store, &alice, "Carol", &carol_account).await;
        let dave = create_test_client(&store, &alice, "Dave").await;
        let alice_cookie = session_cookie_for(&state, &alice);
        let carol_cookie = session_cookie_for(&state, &carol_account);
        let server = TestServer::new(crate::build_router(state).unwrap()).unwrap();

        for client_id in [carol.id, dave.id] {
            server
                .post("/api/v1/schedules")
                .add_header("cookie", &alice_cookie)
                .json(&json!({
                    "client_id": client_id,
                    "title": "Check-in",
                    "start_time": "2099-01-01T09:00:00Z",
                    "end_time": "2099-01-01T10:00:00Z"
                }))
                .await;
        }
        server
            .post("/api/v1/programs")
            .add_header("cookie", &alice_cookie)
            .json(&json!({"name": "Carol's block", "client_id": carol.id}))
            .await;

        let carol_stats: DashboardStats = server
            .get("/api/v1/dashboard/stats")
            .add_header("cookie", &carol_cookie)
            .await
            .json();
        assert_eq!(
            carol_stats,
            DashboardStats {
                total_clients: 0,
                active_programs: 1,
                upcoming_sessions: 1,
            }
        );
    }
}
