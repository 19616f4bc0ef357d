//! Lobby workflows: session creation, membership, and listings.

use tracing::info;
use uuid::Uuid;

use crate::{
    dto::session::{
        CreateSessionRequest, CreateSessionResponse, JoinSessionResponse, MessageResponse,
        SessionListResponse, SessionSummary,
    },
    error::ServiceError,
    state::SharedState,
};

/// Open a new session hosted by `host_id`.
pub async fn create_session(
    state: &SharedState,
    host_id: Uuid,
    request: CreateSessionRequest,
) -> Result<CreateSessionResponse, ServiceError> {
    let session = state
        .registry()
        .create(
            &request.name,
            host_id,
            request.max_players,
            state.config().session_name_max_len(),
        )
        .await?;

    info!(session_id = %session.id, %host_id, max_players = session.max_players, "session created");
    Ok(CreateSessionResponse {
        message: "session created".into(),
        session: SessionSummary::from(&session),
    })
}

/// List sessions still waiting for players.
pub async fn list_waiting(state: &SharedState) -> Result<SessionListResponse, ServiceError> {
    let sessions = state
        .registry()
        .list_waiting()
        .await?
        .into_iter()
        .map(SessionSummary::from)
        .collect();

    Ok(SessionListResponse {
        message: "waiting sessions listed".into(),
        sessions,
    })
}

/// List sessions where the caller is host or member.
pub async fn list_mine(
    state: &SharedState,
    player_id: Uuid,
) -> Result<SessionListResponse, ServiceError> {
    let sessions = state
        .registry()
        .list_for(player_id)
        .await?
        .into_iter()
        .map(SessionSummary::from)
        .collect();

    Ok(SessionListResponse {
        message: "your sessions listed".into(),
        sessions,
    })
}

/// Join a waiting session, receiving a fresh board.
pub async fn join_session(
    state: &SharedState,
    session_id: Uuid,
    player_id: Uuid,
) -> Result<JoinSessionResponse, ServiceError> {
    let outcome = state
        .registry()
        .update(session_id, |session| session.join(player_id))
        .await?;

    if outcome.started {
        info!(%session_id, "session filled to capacity; game started");
    }

    Ok(JoinSessionResponse {
        message: if outcome.started {
            "joined; the game has started".into()
        } else {
            "joined the session".into()
        },
        started: outcome.started,
        board: outcome.board,
    })
}

/// Leave a session that has not started yet.
pub async fn leave_session(
    state: &SharedState,
    session_id: Uuid,
    player_id: Uuid,
) -> Result<MessageResponse, ServiceError> {
    state
        .registry()
        .update(session_id, |session| session.leave(player_id))
        .await?;

    Ok(MessageResponse {
        message: "left the session".into(),
    })
}
