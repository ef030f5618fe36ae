//! OpenAPI document for the HTTP surface, served at `/api-docs/openapi.json`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api::{self, handlers::health::HealthResponse};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "SessionCookie".to_string(),
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "access_token",
                    "Session token set by `/auth/login` or the Google callback. Valid for 15 minutes.",
                ))),
            );
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "The session token in an `Authorization` header, or the shared administrative \
                             token when the server runs with `auth.mode: static_token`.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    security(("SessionCookie" = []), ("BearerAuth" = [])),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::google_login,
        api::handlers::auth::google_callback,
        api::handlers::auth::me,
        api::handlers::users::list_users,
        api::handlers::users::get_user,
        api::handlers::users::update_user,
        api::handlers::users::delete_user,
        api::handlers::clients::list_clients,
        api::handlers::clients::create_client,
        api::handlers::clients::get_client,
        api::handlers::clients::update_client,
        api::handlers::clients::delete_client,
        api::handlers::clients::list_client_notes,
        api::handlers::clients::create_client_note,
        api::handlers::programs::list_programs,
        api::handlers::programs::create_program,
        api::handlers::programs::get_program,
        api::handlers::programs::update_program,
        api::handlers::programs::delete_program,
        api::handlers::programs::add_program_exercise,
        api::handlers::programs::remove_program_exercise,
        api::handlers::schedules::list_schedules,
        api::handlers::schedules::create_schedule,
        api::handlers::schedules::update_schedule,
        api::handlers::schedules::delete_schedule,
        api::handlers::sessions::create_session,
        api::handlers::sessions::list_client_sessions,
        api::handlers::sessions::list_session_logs,
        api::handlers::sessions::create_session_log,
        api::handlers::assignments::list_assignments,
        api::handlers::assignments::create_assignment,
        api::handlers::assignments::update_assignment,
        api::handlers::assignments::delete_assignment,
        api::handlers::dashboard::get_dashboard_stats,
        api::handlers::health::health,
    ),
    components(
        schemas(
            api::models::auth::RegisterRequest,
            api::models::auth::LoginRequest,
            api::models::auth::AuthSuccessResponse,
            api::models::users::Role,
            api::models::users::UserResponse,
            api::models::users::UserUpdate,
            api::models::users::MeResponse,
            api::models::clients::ClientCreate,
            api::models::clients::ClientUpdate,
            api::models::clients::ClientResponse,
            api::models::clients::NoteCreate,
            api::models::clients::NoteResponse,
            api::models::programs::ProgramCreate,
            api::models::programs::ProgramUpdate,
            api::models::programs::ProgramResponse,
            api::models::programs::ProgramExerciseCreate,
            api::models::programs::ProgramExerciseResponse,
            api::models::schedules::ScheduleCreate,
            api::models::schedules::ScheduleUpdate,
            api::models::schedules::ScheduleResponse,
            api::models::sessions::SessionLogCreate,
            api::models::sessions::SessionLogSetCreate,
            api::models::sessions::SessionLogResponse,
            api::models::sessions::SessionLogSetResponse,
            api::models::assignments::AssignmentCreate,
            api::models::assignments::AssignmentUpdate,
            api::models::assignments::AssignmentResponse,
            api::models::dashboard::DashboardStats,
            HealthResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Email/password and Google sign-in. Sessions are 15-minute tokens in the `access_token` cookie."),
        (name = "users", description = "User administration. The administrative token sees every account; a session sees only its own."),
        (name = "clients", description = "A trainer's clients and the notes kept on them."),
        (name = "programs", description = "Training programs and their exercises. Clients can read programs written for them."),
        (name = "schedules", description = "Scheduled sessions between a trainer and a client."),
        (name = "sessions", description = "Sessions per client and the exercise logs recorded in them."),
        (name = "assignments", description = "Work a trainer assigns to a client."),
        (name = "dashboard", description = "Counts for the caller's dashboard."),
        (name = "health", description = "Liveness and database connectivity."),
    ),
    info(
        title = "coachctl",
        description = "Authentication and ownership-scoped access for a coaching platform.",
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_gated_and_public_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/auth/login", "/auth/google/callback", "/api/v1/clients/{id}/notes", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("SessionCookie"));
        assert!(schemes.contains_key("BearerAuth"));
    }
}
