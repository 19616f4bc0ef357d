use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    auth::Identity,
    dto::{
        session::{
            CreateSessionRequest, CreateSessionResponse, JoinSessionResponse, MessageResponse,
            SessionListResponse,
        },
        views::{HostView, PlayerView, StatusView},
    },
    error::AppError,
    services::{session_service, view_service},
    state::SharedState,
};

/// Lobby routes: session creation, membership, and listings.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", get(list_waiting).post(create_session))
        .route("/sessions/mine", get(list_mine))
        .route("/sessions/{id}/status", get(session_status))
        .route("/sessions/{id}/join", post(join_session))
        .route("/sessions/{id}/leave", post(leave_session))
        .route("/sessions/{id}/host", get(host_view))
        .route("/sessions/{id}/player", get(player_view))
}

/// List sessions still waiting for players.
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "lobby",
    params(("Authorization" = String, Header, description = "Bearer token issued by the auth service")),
    responses((status = 200, description = "Waiting sessions", body = SessionListResponse))
)]
pub async fn list_waiting(
    State(state): State<SharedState>,
    Identity(_caller): Identity,
) -> Result<Json<SessionListResponse>, AppError> {
    Ok(Json(session_service::list_waiting(&state).await?))
}

/// Open a new session hosted by the caller.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "lobby",
    params(("Authorization" = String, Header, description = "Bearer token issued by the auth service")),
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = CreateSessionResponse),
        (status = 400, description = "Invalid name or capacity")
    )
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Valid(Json(payload)): Valid<Json<CreateSessionRequest>>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    Ok(Json(
        session_service::create_session(&state, caller, payload).await?,
    ))
}

/// List sessions where the caller is host or member.
#[utoipa::path(
    get,
    path = "/sessions/mine",
    tag = "lobby",
    params(("Authorization" = String, Header, description = "Bearer token issued by the auth service")),
    responses((status = 200, description = "Sessions involving the caller", body = SessionListResponse))
)]
pub async fn list_mine(
    State(state): State<SharedState>,
    Identity(caller): Identity,
) -> Result<Json<SessionListResponse>, AppError> {
    Ok(Json(session_service::list_mine(&state, caller).await?))
}

/// Return the phase and occupancy of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}/status",
    tag = "lobby",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Session status", body = StatusView),
        (status = 403, description = "Caller is not part of the session"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn session_status(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusView>, AppError> {
    Ok(Json(view_service::status(&state, id, caller).await?))
}

/// Join a waiting session, receiving a fresh 16-card board.
#[utoipa::path(
    post,
    path = "/sessions/{id}/join",
    tag = "lobby",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Joined", body = JoinSessionResponse),
        (status = 409, description = "Session full, already joined, or no longer waiting"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn join_session(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<JoinSessionResponse>, AppError> {
    Ok(Json(session_service::join_session(&state, id, caller).await?))
}

/// Leave a session that has not started yet.
#[utoipa::path(
    post,
    path = "/sessions/{id}/leave",
    tag = "lobby",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Left the session", body = MessageResponse),
        (status = 409, description = "Session already started"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn leave_session(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(
        session_service::leave_session(&state, id, caller).await?,
    ))
}

/// Full session view for the host, every member's board included.
#[utoipa::path(
    get,
    path = "/sessions/{id}/host",
    tag = "lobby",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Host view", body = HostView),
        (status = 403, description = "Caller is not the host"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn host_view(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<HostView>, AppError> {
    Ok(Json(view_service::host_view(&state, id, caller).await?))
}

/// Session view for a member, restricted to their own board.
#[utoipa::path(
    get,
    path = "/sessions/{id}/player",
    tag = "lobby",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Player view", body = PlayerView),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn player_view(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerView>, AppError> {
    Ok(Json(view_service::player_view(&state, id, caller).await?))
}
