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
        session::{CallCardResponse, ClaimResponse, MarkRequest, MarkResponse},
        views::{BoardView, LatestView, SyncView},
    },
    error::AppError,
    services::{play_service, view_service},
    state::SharedState,
};

/// In-game routes: card calls, marks, claims, and polling views.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions/{id}/call", post(call_card))
        .route("/sessions/{id}/board", get(get_board))
        .route("/sessions/{id}/sync", get(sync_session))
        .route("/sessions/{id}/latest", get(latest))
        .route("/sessions/{id}/mark", post(mark_position))
        .route("/sessions/{id}/claim", post(claim_win))
}

/// Draw the next card; host only.
#[utoipa::path(
    post,
    path = "/sessions/{id}/call",
    tag = "play",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Card drawn", body = CallCardResponse),
        (status = 403, description = "Caller is not the host"),
        (status = 409, description = "Session not in progress or deck exhausted"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn call_card(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<CallCardResponse>, AppError> {
    Ok(Json(play_service::call_card(&state, id, caller).await?))
}

/// Return the caller's board and marks.
#[utoipa::path(
    get,
    path = "/sessions/{id}/board",
    tag = "play",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Caller's board", body = BoardView),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn get_board(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<BoardView>, AppError> {
    Ok(Json(view_service::board(&state, id, caller).await?))
}

/// Poll the session state together with the caller's board.
#[utoipa::path(
    get,
    path = "/sessions/{id}/sync",
    tag = "play",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Synchronization payload", body = SyncView),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn sync_session(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<SyncView>, AppError> {
    Ok(Json(view_service::sync(&state, id, caller).await?))
}

/// Poll for the winner and the last called card.
#[utoipa::path(
    get,
    path = "/sessions/{id}/latest",
    tag = "play",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Winner poll payload", body = LatestView),
        (status = 403, description = "Caller is not part of the session"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn latest(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<LatestView>, AppError> {
    Ok(Json(view_service::latest(&state, id, caller).await?))
}

/// Mark a position on the caller's board.
#[utoipa::path(
    post,
    path = "/sessions/{id}/mark",
    tag = "play",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    request_body = MarkRequest,
    responses(
        (status = 200, description = "Position marked", body = MarkResponse),
        (status = 400, description = "Position outside the board"),
        (status = 409, description = "Card not called yet or session not in progress"),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn mark_position(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<MarkRequest>>,
) -> Result<Json<MarkResponse>, AppError> {
    Ok(Json(
        play_service::mark_position(&state, id, caller, payload).await?,
    ))
}

/// Claim the win; succeeds only with a fully marked board.
#[utoipa::path(
    post,
    path = "/sessions/{id}/claim",
    tag = "play",
    params(
        ("Authorization" = String, Header, description = "Bearer token issued by the auth service"),
        ("id" = Uuid, Path, description = "Session identifier")
    ),
    responses(
        (status = 200, description = "Claim resolved", body = ClaimResponse),
        (status = 403, description = "Caller is not a member"),
        (status = 409, description = "Session has not started"),
        (status = 404, description = "Unknown session")
    )
)]
pub async fn claim_win(
    State(state): State<SharedState>,
    Identity(caller): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, AppError> {
    Ok(Json(play_service::claim_win(&state, id, caller).await?))
}
