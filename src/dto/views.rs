//! Role-scoped projections of a session.
//!
//! Each view exposes exactly what its audience may see: the host view carries
//! every member's board and marks, the player and sync views only the
//! caller's own.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::format_system_time,
    state::session::{Membership, Session, SessionPhase},
};

/// Lightweight phase/occupancy summary for lobby polling.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusView {
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Number of players currently joined.
    pub player_count: usize,
    /// Player capacity.
    pub max_players: usize,
}

/// One member as seen by the host.
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberView {
    /// The member's identity.
    pub player_id: Uuid,
    /// The member's board.
    pub board: Vec<u8>,
    /// The member's marked positions.
    pub marks: Vec<u8>,
    /// When the member joined (RFC 3339).
    pub joined_at: String,
}

/// Full session projection for the host, boards and marks included.
#[derive(Debug, Serialize, ToSchema)]
pub struct HostView {
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
    /// Most recently called card.
    pub current_card: Option<u8>,
    /// Ordered call history.
    pub called_cards: Vec<u8>,
    /// Winning player, if any.
    pub winner_id: Option<Uuid>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
    /// Every member with board and marks, in join order.
    pub members: Vec<MemberView>,
}

/// Session projection for a member: public fields plus their own board.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerView {
    /// Session identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Player capacity.
    pub max_players: usize,
    /// Number of players currently joined.
    pub player_count: usize,
    /// Most recently called card.
    pub current_card: Option<u8>,
    /// Ordered call history.
    pub called_cards: Vec<u8>,
    /// Winning player, if any.
    pub winner_id: Option<Uuid>,
    /// The caller's own board.
    pub board: Vec<u8>,
    /// The caller's own marks.
    pub marks: Vec<u8>,
}

/// The caller's board and marks, nothing else.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardView {
    /// The caller's board.
    pub board: Vec<u8>,
    /// The caller's marked positions.
    pub marks: Vec<u8>,
}

/// Minimal polling payload, cheap to re-fetch frequently.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncView {
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Most recently called card.
    pub current_card: Option<u8>,
    /// Ordered call history.
    pub called_cards: Vec<u8>,
    /// Winning player, if any.
    pub winner_id: Option<Uuid>,
    /// The caller's own board.
    pub board: Vec<u8>,
    /// The caller's own marks.
    pub marks: Vec<u8>,
}

/// Winner-focused poll payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct LatestView {
    /// True once the session finished with a winner.
    pub has_winner: bool,
    /// The winning player, if any.
    pub winner_id: Option<Uuid>,
    /// Whether the caller is the winner.
    pub you_won: bool,
    /// Most recently called card.
    pub last_card: Option<u8>,
}

impl From<&Session> for StatusView {
    fn from(session: &Session) -> Self {
        Self {
            phase: session.phase,
            player_count: session.player_count(),
            max_players: session.max_players,
        }
    }
}

impl From<&Session> for HostView {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            name: session.name.clone(),
            host_id: session.host_id,
            phase: session.phase,
            max_players: session.max_players,
            current_card: session.current_card,
            called_cards: session.called_cards.clone(),
            winner_id: session.winner_id,
            created_at: format_system_time(session.created_at),
            updated_at: format_system_time(session.updated_at),
            members: session
                .members
                .iter()
                .map(|(player_id, membership)| MemberView {
                    player_id: *player_id,
                    board: membership.board.clone(),
                    marks: membership.marks.iter().copied().collect(),
                    joined_at: format_system_time(membership.joined_at),
                })
                .collect(),
        }
    }
}

impl From<(&Session, &Membership)> for PlayerView {
    fn from((session, membership): (&Session, &Membership)) -> Self {
        Self {
            id: session.id,
            name: session.name.clone(),
            phase: session.phase,
            max_players: session.max_players,
            player_count: session.player_count(),
            current_card: session.current_card,
            called_cards: session.called_cards.clone(),
            winner_id: session.winner_id,
            board: membership.board.clone(),
            marks: membership.marks.iter().copied().collect(),
        }
    }
}

impl From<&Membership> for BoardView {
    fn from(membership: &Membership) -> Self {
        Self {
            board: membership.board.clone(),
            marks: membership.marks.iter().copied().collect(),
        }
    }
}

impl From<(&Session, &Membership)> for SyncView {
    fn from((session, membership): (&Session, &Membership)) -> Self {
        Self {
            phase: session.phase,
            current_card: session.current_card,
            called_cards: session.called_cards.clone(),
            winner_id: session.winner_id,
            board: membership.board.clone(),
            marks: membership.marks.iter().copied().collect(),
        }
    }
}

impl LatestView {
    /// Build the winner poll payload for `caller`.
    pub fn for_caller(session: &Session, caller: Uuid) -> Self {
        let has_winner =
            session.phase == SessionPhase::Finished && session.winner_id.is_some();
        Self {
            has_winner,
            winner_id: session.winner_id,
            you_won: has_winner && session.winner_id == Some(caller),
            last_card: session.current_card,
        }
    }
}
