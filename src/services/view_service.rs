//! Query/projection layer building role-scoped session views.
//!
//! Every builder authorizes first: a caller who is neither host nor member
//! gets `Forbidden` and learns nothing about the session's contents.

use uuid::Uuid;

use crate::{
    dto::views::{BoardView, HostView, LatestView, PlayerView, StatusView, SyncView},
    error::ServiceError,
    state::SharedState,
    state::session::{Membership, Session},
};

/// Phase and occupancy summary; visible to the host and members.
pub async fn status(
    state: &SharedState,
    session_id: Uuid,
    caller: Uuid,
) -> Result<StatusView, ServiceError> {
    let session = load(state, session_id).await?;
    require_participant(&session, caller)?;
    Ok(StatusView::from(&session))
}

/// Full aggregate with every member's board and marks; host only.
pub async fn host_view(
    state: &SharedState,
    session_id: Uuid,
    caller: Uuid,
) -> Result<HostView, ServiceError> {
    let session = load(state, session_id).await?;
    if session.host_id != caller {
        return Err(ServiceError::Forbidden(
            "only the host may view this session".into(),
        ));
    }
    Ok(HostView::from(&session))
}

/// Public session fields plus the caller's own board; members only.
pub async fn player_view(
    state: &SharedState,
    session_id: Uuid,
    caller: Uuid,
) -> Result<PlayerView, ServiceError> {
    let session = load(state, session_id).await?;
    let membership = require_membership(&session, caller)?;
    Ok(PlayerView::from((&session, membership)))
}

/// The caller's own board and marks; members only.
pub async fn board(
    state: &SharedState,
    session_id: Uuid,
    caller: Uuid,
) -> Result<BoardView, ServiceError> {
    let session = load(state, session_id).await?;
    let membership = require_membership(&session, caller)?;
    Ok(BoardView::from(membership))
}

/// Minimal polling payload; members only.
pub async fn sync(
    state: &SharedState,
    session_id: Uuid,
    caller: Uuid,
) -> Result<SyncView, ServiceError> {
    let session = load(state, session_id).await?;
    let membership = require_membership(&session, caller)?;
    Ok(SyncView::from((&session, membership)))
}

/// Winner-focused poll; visible to the host and members.
pub async fn latest(
    state: &SharedState,
    session_id: Uuid,
    caller: Uuid,
) -> Result<LatestView, ServiceError> {
    let session = load(state, session_id).await?;
    require_participant(&session, caller)?;
    Ok(LatestView::for_caller(&session, caller))
}

/// Snapshot the aggregate under its lock; projections run on the copy.
async fn load(state: &SharedState, session_id: Uuid) -> Result<Session, ServiceError> {
    Ok(state
        .registry()
        .read(session_id, |session| Ok(session.clone()))
        .await?)
}

fn require_participant(session: &Session, caller: Uuid) -> Result<(), ServiceError> {
    if session.is_participant(caller) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "you are not part of this session".into(),
        ))
    }
}

fn require_membership(session: &Session, caller: Uuid) -> Result<&Membership, ServiceError> {
    session
        .members
        .get(&caller)
        .ok_or_else(|| ServiceError::Forbidden("you are not part of this session".into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::AppConfig;
    use crate::dao::session_store::memory::MemorySessionStore;
    use crate::state::AppState;

    async fn state_with_session() -> (SharedState, Uuid, Uuid, Uuid) {
        let state = AppState::new(AppConfig::default(), Arc::new(MemorySessionStore::new()));
        let host = Uuid::new_v4();
        let session = state.registry().create("sala", host, 3, 64).await.unwrap();
        let member = Uuid::new_v4();
        state
            .registry()
            .update(session.id, |s| s.join(member))
            .await
            .unwrap();
        (state, session.id, host, member)
    }

    #[tokio::test]
    async fn outsiders_are_forbidden_everywhere() {
        let (state, id, _host, _member) = state_with_session().await;
        let outsider = Uuid::new_v4();

        for result in [
            status(&state, id, outsider).await.map(|_| ()),
            latest(&state, id, outsider).await.map(|_| ()),
            player_view(&state, id, outsider).await.map(|_| ()),
            sync(&state, id, outsider).await.map(|_| ()),
            board(&state, id, outsider).await.map(|_| ()),
            host_view(&state, id, outsider).await.map(|_| ()),
        ] {
            assert!(matches!(result, Err(ServiceError::Forbidden(_))));
        }
    }

    #[tokio::test]
    async fn host_view_is_host_only_and_carries_all_boards() {
        let (state, id, host, member) = state_with_session().await;

        assert!(matches!(
            host_view(&state, id, member).await,
            Err(ServiceError::Forbidden(_))
        ));

        let view = host_view(&state, id, host).await.unwrap();
        assert_eq!(view.members.len(), 1);
        assert_eq!(view.members[0].player_id, member);
        assert_eq!(view.members[0].board.len(), 16);
    }

    #[tokio::test]
    async fn player_and_sync_views_carry_only_the_callers_board() {
        let (state, id, _host, member) = state_with_session().await;
        let other = Uuid::new_v4();
        state
            .registry()
            .update(id, |s| s.join(other))
            .await
            .unwrap();

        let view = player_view(&state, id, member).await.unwrap();
        assert_eq!(view.player_count, 2);
        assert_eq!(view.board.len(), 16);

        let own_board = board(&state, id, member).await.unwrap().board;
        assert_eq!(view.board, own_board);

        let sync_view = sync(&state, id, member).await.unwrap();
        assert_eq!(sync_view.board, own_board);
        assert_eq!(sync_view.winner_id, None);
    }

    #[tokio::test]
    async fn status_is_visible_to_the_host_without_membership() {
        let (state, id, host, _member) = state_with_session().await;
        let view = status(&state, id, host).await.unwrap();
        assert_eq!(view.player_count, 1);
        assert_eq!(view.max_players, 3);
    }

    #[tokio::test]
    async fn latest_reports_the_winner_to_both_sides() {
        let (state, id, host, member) = state_with_session().await;

        let before = latest(&state, id, member).await.unwrap();
        assert!(!before.has_winner);
        assert!(!before.you_won);

        // Finish the session by hand to keep the test focused on projection.
        state
            .registry()
            .update(id, |session| {
                session.phase = crate::state::session::SessionPhase::Finished;
                session.winner_id = Some(member);
                Ok(())
            })
            .await
            .unwrap();

        let as_winner = latest(&state, id, member).await.unwrap();
        assert!(as_winner.has_winner);
        assert!(as_winner.you_won);

        let as_host = latest(&state, id, host).await.unwrap();
        assert!(as_host.has_winner);
        assert!(!as_host.you_won);
        assert_eq!(as_host.winner_id, Some(member));
    }
}
