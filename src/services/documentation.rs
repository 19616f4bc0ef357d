use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Lotería backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sessions::list_waiting,
        crate::routes::sessions::create_session,
        crate::routes::sessions::list_mine,
        crate::routes::sessions::session_status,
        crate::routes::sessions::join_session,
        crate::routes::sessions::leave_session,
        crate::routes::sessions::host_view,
        crate::routes::sessions::player_view,
        crate::routes::play::call_card,
        crate::routes::play::get_board,
        crate::routes::play::sync_session,
        crate::routes::play::latest,
        crate::routes::play::mark_position,
        crate::routes::play::claim_win,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::session::CreateSessionRequest,
            crate::dto::session::MarkRequest,
            crate::dto::session::SessionSummary,
            crate::dto::session::CreateSessionResponse,
            crate::dto::session::SessionListResponse,
            crate::dto::session::JoinSessionResponse,
            crate::dto::session::CallCardResponse,
            crate::dto::session::MarkResponse,
            crate::dto::session::ClaimResponse,
            crate::dto::session::MessageResponse,
            crate::dto::views::StatusView,
            crate::dto::views::MemberView,
            crate::dto::views::HostView,
            crate::dto::views::PlayerView,
            crate::dto::views::BoardView,
            crate::dto::views::SyncView,
            crate::dto::views::LatestView,
            crate::state::session::SessionPhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "lobby", description = "Session creation and membership"),
        (name = "play", description = "In-game operations and polling views"),
    )
)]
pub struct ApiDoc;
