//! Session aggregate and the lifecycle rules governing it.
//!
//! A session moves strictly `Waiting -> InProgress -> Finished`; every
//! operation below validates the transition before mutating anything, so a
//! caller observing an `Err` can rely on the aggregate being untouched.

use std::collections::BTreeSet;
use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{MembershipEntity, SessionEntity, SessionRecord};
use crate::state::deck::{self, BOARD_SIZE, Card};

/// Minimum number of players a session can be created for.
pub const MIN_PLAYERS: usize = 2;
/// Maximum number of players a session can be created for.
pub const MAX_PLAYERS: usize = 16;

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Session accepts joins and leaves; no cards have been called.
    Waiting,
    /// The game is live: the host calls cards, players mark and claim.
    InProgress,
    /// Terminal phase; a winner has been recorded.
    Finished,
}

/// Per-player state inside a session, created at join time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    /// The player's 16-card board, fixed for the lifetime of the session.
    pub board: Vec<Card>,
    /// Board positions (`0..16`) the player has marked; grows monotonically.
    pub marks: BTreeSet<u8>,
    /// When the player joined the session.
    pub joined_at: SystemTime,
}

impl Membership {
    fn new(board: Vec<Card>) -> Self {
        Self {
            board,
            marks: BTreeSet::new(),
            joined_at: SystemTime::now(),
        }
    }

    /// Whether every board position carries a mark.
    pub fn is_complete(&self) -> bool {
        self.marks.len() == BOARD_SIZE
    }
}

/// Rejection raised by a session operation; the aggregate is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session name is empty or exceeds the allowed length after trimming.
    #[error("session name must be between 1 and {max} characters")]
    InvalidName {
        /// Maximum accepted name length.
        max: usize,
    },
    /// Capacity outside the supported player range.
    #[error("session capacity must be between 2 and 16 players (got {got})")]
    InvalidCapacity {
        /// The rejected capacity.
        got: usize,
    },
    /// The session already started or finished and no longer accepts the operation.
    #[error("session is not waiting for players")]
    NotWaiting,
    /// The session has not started yet, or is already over.
    #[error("session is not in progress")]
    NotInProgress,
    /// The player already holds a membership in this session.
    #[error("player already joined this session")]
    AlreadyJoined,
    /// The session reached its player capacity.
    #[error("session is full")]
    Full,
    /// Only the host may call cards.
    #[error("only the host may call cards")]
    NotHost,
    /// The caller holds no membership in this session.
    #[error("player is not a member of this session")]
    NotAMember,
    /// Board position outside `0..16`.
    #[error("position {got} is outside the board (expected 0..16)")]
    InvalidPosition {
        /// The rejected position.
        got: usize,
    },
    /// The card at the targeted board position has not been called yet.
    #[error("the card at this position has not been called")]
    CardNotCalled,
    /// Every card of the deck has already been called.
    #[error("all 52 cards have been called")]
    DeckExhausted,
}

/// Result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// The freshly generated board for the joining player.
    pub board: Vec<Card>,
    /// True when this join filled the session and started the game.
    pub started: bool,
}

/// Aggregated state for one Lotería game: lifecycle, call history, members.
#[derive(Debug, Clone)]
pub struct Session {
    /// Primary key of the session.
    pub id: Uuid,
    /// Display name chosen by the host.
    pub name: String,
    /// Identity of the host allowed to call cards.
    pub host_id: Uuid,
    /// Player capacity; reaching it starts the game.
    pub max_players: usize,
    /// Current lifecycle phase.
    pub phase: SessionPhase,
    /// Cards called so far, in call order, without duplicates.
    pub called_cards: Vec<Card>,
    /// Most recently called card, always the last of `called_cards`.
    pub current_card: Option<Card>,
    /// Winning player, recorded exactly once when the session finishes.
    pub winner_id: Option<Uuid>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time a transition succeeded on this session.
    pub updated_at: SystemTime,
    /// Memberships keyed by player id, in join order.
    pub members: IndexMap<Uuid, Membership>,
}

impl Session {
    /// Create a new session in the waiting phase.
    pub fn create(
        name: &str,
        host_id: Uuid,
        max_players: usize,
        name_max_len: usize,
    ) -> Result<Self, SessionError> {
        let name = name.trim();
        if name.is_empty() || name.len() > name_max_len {
            return Err(SessionError::InvalidName { max: name_max_len });
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&max_players) {
            return Err(SessionError::InvalidCapacity { got: max_players });
        }

        let now = SystemTime::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            host_id,
            max_players,
            phase: SessionPhase::Waiting,
            called_cards: Vec::new(),
            current_card: None,
            winner_id: None,
            created_at: now,
            updated_at: now,
            members: IndexMap::new(),
        })
    }

    /// Whether `player_id` is the host or holds a membership.
    pub fn is_participant(&self, player_id: Uuid) -> bool {
        self.host_id == player_id || self.members.contains_key(&player_id)
    }

    /// Number of players currently in the session.
    pub fn player_count(&self) -> usize {
        self.members.len()
    }

    /// Add a player while the session is waiting, generating their board.
    ///
    /// When the join fills the session to capacity the phase advances to
    /// `InProgress` as part of the same operation.
    pub fn join(&mut self, player_id: Uuid) -> Result<JoinOutcome, SessionError> {
        if self.phase != SessionPhase::Waiting {
            return Err(SessionError::NotWaiting);
        }
        if self.members.contains_key(&player_id) {
            return Err(SessionError::AlreadyJoined);
        }
        if self.members.len() >= self.max_players {
            return Err(SessionError::Full);
        }

        let board = deck::generate_board();
        self.members
            .insert(player_id, Membership::new(board.clone()));

        let started = self.members.len() == self.max_players;
        if started {
            self.phase = SessionPhase::InProgress;
        }
        self.touch();

        Ok(JoinOutcome { board, started })
    }

    /// Remove a player from a session that has not started yet.
    pub fn leave(&mut self, player_id: Uuid) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Waiting {
            return Err(SessionError::NotWaiting);
        }
        if self.members.shift_remove(&player_id).is_none() {
            return Err(SessionError::NotAMember);
        }
        self.touch();
        Ok(())
    }

    /// Draw the next card for the host, appending it to the call history.
    pub fn call_card(&mut self, caller_id: Uuid) -> Result<Card, SessionError> {
        if caller_id != self.host_id {
            return Err(SessionError::NotHost);
        }
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }

        let card = deck::draw_uncalled(&self.called_cards).ok_or(SessionError::DeckExhausted)?;
        self.called_cards.push(card);
        self.current_card = Some(card);
        self.touch();

        Ok(card)
    }

    /// Mark a board position whose card has been called.
    ///
    /// Re-marking an already marked position succeeds without changing
    /// anything. Returns the player's marks after the operation.
    pub fn mark(&mut self, player_id: Uuid, position: usize) -> Result<Vec<u8>, SessionError> {
        let called_cards = &self.called_cards;
        let membership = self
            .members
            .get_mut(&player_id)
            .ok_or(SessionError::NotAMember)?;
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::NotInProgress);
        }
        if position >= BOARD_SIZE {
            return Err(SessionError::InvalidPosition { got: position });
        }
        if !called_cards.contains(&membership.board[position]) {
            return Err(SessionError::CardNotCalled);
        }

        let inserted = membership.marks.insert(position as u8);
        let marks = membership.marks.iter().copied().collect();
        if inserted {
            self.updated_at = SystemTime::now();
        }

        Ok(marks)
    }

    /// Attempt to win: succeeds only when the caller's board is fully marked.
    ///
    /// The first complete claim moves the session to `Finished` and records
    /// the winner; any later claim resolves to `false`, so a player racing a
    /// rival gets a clean "someone else won" answer instead of an error.
    pub fn claim(&mut self, player_id: Uuid) -> Result<bool, SessionError> {
        let membership = self
            .members
            .get(&player_id)
            .ok_or(SessionError::NotAMember)?;

        match self.phase {
            SessionPhase::Waiting => return Err(SessionError::NotInProgress),
            SessionPhase::Finished => return Ok(false),
            SessionPhase::InProgress => {}
        }

        if !membership.is_complete() {
            return Ok(false);
        }

        self.phase = SessionPhase::Finished;
        self.winner_id = Some(player_id);
        self.touch();
        Ok(true)
    }

    fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }
}

impl From<&Session> for SessionRecord {
    fn from(session: &Session) -> Self {
        Self {
            session: SessionEntity {
                id: session.id,
                name: session.name.clone(),
                host_id: session.host_id,
                phase: session.phase,
                max_players: session.max_players,
                winner_id: session.winner_id,
                current_card: session.current_card,
                called_cards: session.called_cards.clone(),
                created_at: session.created_at,
                updated_at: session.updated_at,
            },
            memberships: session
                .members
                .iter()
                .map(|(player_id, membership)| MembershipEntity {
                    session_id: session.id,
                    player_id: *player_id,
                    board: membership.board.clone(),
                    marks: membership.marks.iter().copied().collect(),
                    joined_at: membership.joined_at,
                })
                .collect(),
        }
    }
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        let SessionRecord {
            session,
            memberships,
        } = record;

        Self {
            id: session.id,
            name: session.name,
            host_id: session.host_id,
            max_players: session.max_players,
            phase: session.phase,
            called_cards: session.called_cards,
            current_card: session.current_card,
            winner_id: session.winner_id,
            created_at: session.created_at,
            updated_at: session.updated_at,
            members: memberships
                .into_iter()
                .map(|membership| {
                    (
                        membership.player_id,
                        Membership {
                            board: membership.board,
                            marks: membership.marks.into_iter().collect(),
                            joined_at: membership.joined_at,
                        },
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::deck::DECK_SIZE;

    fn waiting_session(capacity: usize) -> Session {
        Session::create("Viernes de lotería", Uuid::new_v4(), capacity, 64).unwrap()
    }

    fn started_session(capacity: usize) -> (Session, Vec<Uuid>) {
        let mut session = waiting_session(capacity);
        let players: Vec<Uuid> = (0..capacity).map(|_| Uuid::new_v4()).collect();
        for player in &players {
            session.join(*player).unwrap();
        }
        assert_eq!(session.phase, SessionPhase::InProgress);
        (session, players)
    }

    /// Call cards until `player`'s whole board has been called, then mark it.
    fn mark_full_board(session: &mut Session, player: Uuid) {
        let board = session.members[&player].board.clone();
        while board
            .iter()
            .any(|card| !session.called_cards.contains(card))
        {
            session.call_card(session.host_id).unwrap();
        }
        for position in 0..BOARD_SIZE {
            session.mark(player, position).unwrap();
        }
    }

    #[test]
    fn create_validates_name_and_capacity() {
        let host = Uuid::new_v4();
        assert_eq!(
            Session::create("", host, 4, 64).unwrap_err(),
            SessionError::InvalidName { max: 64 }
        );
        assert_eq!(
            Session::create("   ", host, 4, 64).unwrap_err(),
            SessionError::InvalidName { max: 64 }
        );
        assert_eq!(
            Session::create(&"x".repeat(65), host, 4, 64).unwrap_err(),
            SessionError::InvalidName { max: 64 }
        );
        assert_eq!(
            Session::create("ok", host, 1, 64).unwrap_err(),
            SessionError::InvalidCapacity { got: 1 }
        );
        assert_eq!(
            Session::create("ok", host, 17, 64).unwrap_err(),
            SessionError::InvalidCapacity { got: 17 }
        );

        let session = Session::create("  La lotería  ", host, 2, 64).unwrap();
        assert_eq!(session.name, "La lotería");
        assert_eq!(session.phase, SessionPhase::Waiting);
        assert!(session.called_cards.is_empty());
        assert_eq!(session.current_card, None);
        assert_eq!(session.winner_id, None);
    }

    #[test]
    fn join_generates_board_and_rejects_duplicates() {
        let mut session = waiting_session(3);
        let player = Uuid::new_v4();

        let outcome = session.join(player).unwrap();
        assert_eq!(outcome.board.len(), BOARD_SIZE);
        assert!(!outcome.started);
        assert_eq!(session.members[&player].board, outcome.board);

        assert_eq!(session.join(player).unwrap_err(), SessionError::AlreadyJoined);
    }

    #[test]
    fn filling_the_session_starts_it_exactly_once() {
        let mut session = waiting_session(2);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        assert!(!session.join(a).unwrap().started);
        assert_eq!(session.phase, SessionPhase::Waiting);

        assert!(session.join(b).unwrap().started);
        assert_eq!(session.phase, SessionPhase::InProgress);

        // No further joins once the game started.
        assert_eq!(session.join(c).unwrap_err(), SessionError::NotWaiting);
    }

    #[test]
    fn join_when_full_but_still_waiting_is_rejected() {
        let mut session = waiting_session(2);
        session.members.insert(
            Uuid::new_v4(),
            Membership::new(crate::state::deck::generate_board()),
        );
        session.members.insert(
            Uuid::new_v4(),
            Membership::new(crate::state::deck::generate_board()),
        );

        assert_eq!(
            session.join(Uuid::new_v4()).unwrap_err(),
            SessionError::Full
        );
    }

    #[test]
    fn leave_only_works_while_waiting() {
        let mut session = waiting_session(3);
        let player = Uuid::new_v4();
        session.join(player).unwrap();

        assert_eq!(
            session.leave(Uuid::new_v4()).unwrap_err(),
            SessionError::NotAMember
        );
        session.leave(player).unwrap();
        assert_eq!(session.player_count(), 0);

        let (mut started, players) = started_session(2);
        assert_eq!(
            started.leave(players[0]).unwrap_err(),
            SessionError::NotWaiting
        );
    }

    #[test]
    fn call_requires_host_and_in_progress() {
        let mut session = waiting_session(2);
        let host = session.host_id;

        assert_eq!(
            session.call_card(Uuid::new_v4()).unwrap_err(),
            SessionError::NotHost
        );
        assert_eq!(session.call_card(host).unwrap_err(), SessionError::NotInProgress);

        let (mut session, _) = started_session(2);
        let card = session.call_card(session.host_id).unwrap();
        assert_eq!(session.called_cards, vec![card]);
        assert_eq!(session.current_card, Some(card));
    }

    #[test]
    fn calls_never_repeat_and_exhaust_after_fifty_two() {
        let (mut session, _) = started_session(2);
        let host = session.host_id;

        for _ in 0..DECK_SIZE {
            session.call_card(host).unwrap();
        }
        assert_eq!(session.called_cards.len(), DECK_SIZE as usize);

        let mut sorted = session.called_cards.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), DECK_SIZE as usize);

        assert_eq!(session.call_card(host).unwrap_err(), SessionError::DeckExhausted);
        assert_eq!(
            session.current_card,
            session.called_cards.last().copied()
        );
    }

    #[test]
    fn mark_validates_membership_position_and_call_history() {
        let (mut session, players) = started_session(2);
        let player = players[0];

        assert_eq!(
            session.mark(Uuid::new_v4(), 0).unwrap_err(),
            SessionError::NotAMember
        );
        assert_eq!(
            session.mark(player, BOARD_SIZE).unwrap_err(),
            SessionError::InvalidPosition { got: BOARD_SIZE }
        );
        assert_eq!(session.mark(player, 0).unwrap_err(), SessionError::CardNotCalled);
    }

    #[test]
    fn mark_is_idempotent_once_the_card_was_called() {
        let (mut session, players) = started_session(2);
        let player = players[0];
        let target = session.members[&player].board[5];

        // Force the target card into the call history.
        session.called_cards.push(target);

        let marks = session.mark(player, 5).unwrap();
        assert_eq!(marks, vec![5]);
        let marks = session.mark(player, 5).unwrap();
        assert_eq!(marks, vec![5]);
    }

    #[test]
    fn claim_before_start_errors_and_incomplete_claim_is_false() {
        let mut session = waiting_session(2);
        let player = Uuid::new_v4();
        session.join(player).unwrap();
        assert_eq!(session.claim(player).unwrap_err(), SessionError::NotInProgress);

        let (mut session, players) = started_session(2);
        assert!(!session.claim(players[0]).unwrap());
        assert_eq!(session.phase, SessionPhase::InProgress);
        assert_eq!(session.winner_id, None);
    }

    #[test]
    fn first_complete_claim_wins_and_later_claims_lose() {
        let (mut session, players) = started_session(2);
        mark_full_board(&mut session, players[0]);

        // The rival may well have a complete board too once enough cards are
        // out; completing it must not steal the win.
        let rival_board = session.members[&players[1]].board.clone();
        while rival_board
            .iter()
            .any(|card| !session.called_cards.contains(card))
        {
            session.call_card(session.host_id).unwrap();
        }
        for position in 0..BOARD_SIZE {
            session.mark(players[1], position).unwrap();
        }

        assert!(session.claim(players[0]).unwrap());
        assert_eq!(session.phase, SessionPhase::Finished);
        assert_eq!(session.winner_id, Some(players[0]));

        assert!(!session.claim(players[1]).unwrap());
        assert_eq!(session.winner_id, Some(players[0]));
    }

    #[test]
    fn finished_session_rejects_calls_and_marks() {
        let (mut session, players) = started_session(2);
        mark_full_board(&mut session, players[0]);
        assert!(session.claim(players[0]).unwrap());

        assert_eq!(
            session.call_card(session.host_id).unwrap_err(),
            SessionError::NotInProgress
        );
        assert_eq!(
            session.mark(players[1], 0).unwrap_err(),
            SessionError::NotInProgress
        );
    }
}
