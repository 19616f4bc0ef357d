use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::session::SessionPhase;

/// Session row persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Display name chosen by the host.
    pub name: String,
    /// Identity of the hosting player.
    pub host_id: Uuid,
    /// Lifecycle phase at the time of the last save.
    pub phase: SessionPhase,
    /// Player capacity.
    pub max_players: usize,
    /// Winning player, if the session finished.
    pub winner_id: Option<Uuid>,
    /// Most recently called card.
    pub current_card: Option<u8>,
    /// Ordered call history.
    pub called_cards: Vec<u8>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the session aggregate was updated.
    pub updated_at: SystemTime,
}

/// Membership row persisted alongside its session.
///
/// `(session_id, player_id)` is unique: a player joins a session at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MembershipEntity {
    /// Session this membership belongs to.
    pub session_id: Uuid,
    /// Identity of the member.
    pub player_id: Uuid,
    /// The member's 16-card board, fixed at join time.
    pub board: Vec<u8>,
    /// Marked board positions.
    pub marks: Vec<u8>,
    /// When the player joined.
    pub joined_at: SystemTime,
}

/// Full session aggregate: the unit of atomic read-modify-write in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    /// The session row.
    pub session: SessionEntity,
    /// Memberships in join order.
    pub memberships: Vec<MembershipEntity>,
}

/// Listing projection used for lobby enumeration (subset of [`SessionRecord`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionListItemEntity {
    /// Primary key of the session.
    pub id: Uuid,
    /// Display name chosen by the host.
    pub name: String,
    /// Identity of the hosting player.
    pub host_id: Uuid,
    /// Lifecycle phase at the time of the last save.
    pub phase: SessionPhase,
    /// Player capacity.
    pub max_players: usize,
    /// Identities of the joined players, in join order.
    pub player_ids: Vec<Uuid>,
    /// Creation timestamp, used to sort listings newest-first.
    pub created_at: SystemTime,
}

impl From<&SessionRecord> for SessionListItemEntity {
    fn from(record: &SessionRecord) -> Self {
        Self {
            id: record.session.id,
            name: record.session.name.clone(),
            host_id: record.session.host_id,
            phase: record.session.phase,
            max_players: record.session.max_players,
            player_ids: record
                .memberships
                .iter()
                .map(|membership| membership.player_id)
                .collect(),
            created_at: record.session.created_at,
        }
    }
}
