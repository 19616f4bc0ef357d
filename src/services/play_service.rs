//! In-game workflows: calling cards, marking boards, claiming the win.

use tracing::info;
use uuid::Uuid;

use crate::{
    dto::session::{CallCardResponse, ClaimResponse, MarkRequest, MarkResponse},
    error::ServiceError,
    state::SharedState,
};

/// Draw the next card for the host.
pub async fn call_card(
    state: &SharedState,
    session_id: Uuid,
    caller_id: Uuid,
) -> Result<CallCardResponse, ServiceError> {
    let (card, called_count) = state
        .registry()
        .update(session_id, |session| {
            let card = session.call_card(caller_id)?;
            Ok((card, session.called_cards.len()))
        })
        .await?;

    Ok(CallCardResponse {
        message: "card called".into(),
        card,
        called_count,
    })
}

/// Mark a position on the caller's board.
pub async fn mark_position(
    state: &SharedState,
    session_id: Uuid,
    player_id: Uuid,
    request: MarkRequest,
) -> Result<MarkResponse, ServiceError> {
    let marks = state
        .registry()
        .update(session_id, |session| {
            session.mark(player_id, request.position as usize)
        })
        .await?;

    Ok(MarkResponse {
        message: "position marked".into(),
        marks,
    })
}

/// Resolve a win claim for the caller.
pub async fn claim_win(
    state: &SharedState,
    session_id: Uuid,
    player_id: Uuid,
) -> Result<ClaimResponse, ServiceError> {
    let winner = state
        .registry()
        .update(session_id, |session| session.claim(player_id))
        .await?;

    if winner {
        info!(%session_id, winner_id = %player_id, "session finished");
    }

    Ok(ClaimResponse {
        message: if winner {
            "¡Lotería! You won the session".into()
        } else {
            "your board is not the winning one".into()
        },
        winner,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::session_store::memory::MemorySessionStore;
    use crate::services::session_service;
    use crate::state::AppState;
    use crate::state::session::SessionPhase;

    fn app_state() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(MemorySessionStore::new()))
    }

    async fn create(state: &SharedState, host: Uuid, capacity: usize) -> Uuid {
        session_service::create_session(
            state,
            host,
            crate::dto::session::CreateSessionRequest {
                name: "mesa grande".into(),
                max_players: capacity,
            },
        )
        .await
        .unwrap()
        .session
        .id
    }

    #[tokio::test]
    async fn full_happy_path_through_a_two_player_game() {
        let state = app_state();
        let host = Uuid::new_v4();
        let id = create(&state, host, 2).await;

        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let joined = session_service::join_session(&state, id, a).await.unwrap();
        assert!(!joined.started);
        assert_eq!(joined.board.len(), 16);

        let joined = session_service::join_session(&state, id, b).await.unwrap();
        assert!(joined.started);

        // Host calls until one of A's cards turns up, then A marks it.
        let board_a = state
            .registry()
            .read(id, |s| Ok(s.members[&a].board.clone()))
            .await
            .unwrap();
        let called = loop {
            let response = call_card(&state, id, host).await.unwrap();
            if let Some(position) = board_a.iter().position(|card| *card == response.card) {
                break position;
            }
        };

        let marked = mark_position(
            &state,
            id,
            a,
            MarkRequest {
                position: called as u8,
            },
        )
        .await
        .unwrap();
        assert_eq!(marked.marks, vec![called as u8]);

        // One mark is nowhere near a full board.
        let claim = claim_win(&state, id, a).await.unwrap();
        assert!(!claim.winner);

        let phase = state.registry().read(id, |s| Ok(s.phase)).await.unwrap();
        assert_eq!(phase, SessionPhase::InProgress);
    }

    #[tokio::test]
    async fn calling_while_waiting_or_as_non_host_is_rejected() {
        let state = app_state();
        let host = Uuid::new_v4();
        let id = create(&state, host, 2).await;

        let err = call_card(&state, id, host).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        session_service::join_session(&state, id, Uuid::new_v4())
            .await
            .unwrap();
        session_service::join_session(&state, id, Uuid::new_v4())
            .await
            .unwrap();

        let err = call_card(&state, id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn deck_exhausts_after_fifty_two_calls() {
        let state = app_state();
        let host = Uuid::new_v4();
        let id = create(&state, host, 2).await;
        session_service::join_session(&state, id, Uuid::new_v4())
            .await
            .unwrap();
        session_service::join_session(&state, id, Uuid::new_v4())
            .await
            .unwrap();

        for expected in 1..=52 {
            let response = call_card(&state, id, host).await.unwrap();
            assert_eq!(response.called_count, expected);
        }

        let err = call_card(&state, id, host).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_session_surfaces_not_found() {
        let state = app_state();
        let err = claim_win(&state, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
