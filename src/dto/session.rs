use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::SessionListItemEntity,
    dto::format_system_time,
    state::session::{Session, SessionPhase},
};

/// Payload used to open a new session.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSessionRequest {
    /// Display name for the lobby listing.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Player capacity; the game starts once this many players joined.
    #[validate(range(min = 2, max = 16))]
    pub max_players: usize,
}

/// Payload for marking a board position.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MarkRequest {
    /// Board position in `0..16`.
    #[validate(range(max = 15))]
    pub position: u8,
}

/// Public projection of a session used in lobby listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionSummary {
    /// Session identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Hosting player.
    pub host_id: Uuid,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Player capacity.
    pub max_players: usize,
    /// Number of players currently joined.
    pub player_count: usize,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Response returned once a session has been created.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSessionResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The freshly created session.
    pub session: SessionSummary,
}

/// Lobby listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionListResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Matching sessions, newest first.
    pub sessions: Vec<SessionSummary>,
}

/// Response returned after joining a session.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinSessionResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// True when this join filled the session and started the game.
    pub started: bool,
    /// The caller's freshly generated 16-card board.
    pub board: Vec<u8>,
}

/// Response returned after the host called a card.
#[derive(Debug, Serialize, ToSchema)]
pub struct CallCardResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The card that was drawn.
    pub card: u8,
    /// Number of cards called so far, including this one.
    pub called_count: usize,
}

/// Response returned after marking a position.
#[derive(Debug, Serialize, ToSchema)]
pub struct MarkResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The caller's marks after the operation.
    pub marks: Vec<u8>,
}

/// Response returned by a win claim.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Whether the caller won the session with this claim.
    pub winner: bool,
}

/// Generic confirmation payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            name: session.name.clone(),
            host_id: session.host_id,
            phase: session.phase,
            max_players: session.max_players,
            player_count: session.player_count(),
            created_at: format_system_time(session.created_at),
        }
    }
}

impl From<SessionListItemEntity> for SessionSummary {
    fn from(item: SessionListItemEntity) -> Self {
        Self {
            id: item.id,
            name: item.name,
            host_id: item.host_id,
            phase: item.phase,
            max_players: item.max_players,
            player_count: item.player_ids.len(),
            created_at: format_system_time(item.created_at),
        }
    }
}
