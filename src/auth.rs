//! Authenticated-identity extraction.
//!
//! Identity management lives in an external auth service; this backend only
//! consumes the opaque bearer token it mints, which carries the player's id.

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// The authenticated player behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity(pub Uuid);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("expected a bearer token".into()))?;

        let player_id = Uuid::parse_str(token.trim())
            .map_err(|_| AppError::Unauthorized("malformed bearer token".into()))?;

        Ok(Identity(player_id))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn extract(value: Option<&str>) -> Result<Identity, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        Identity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn valid_bearer_token_yields_the_player_id() {
        let id = Uuid::new_v4();
        let identity = extract(Some(&format!("Bearer {id}"))).await.unwrap();
        assert_eq!(identity, Identity(id));
    }

    #[tokio::test]
    async fn missing_or_malformed_tokens_are_unauthorized() {
        assert!(matches!(extract(None).await, Err(AppError::Unauthorized(_))));
        assert!(matches!(
            extract(Some("Basic abc")).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            extract(Some("Bearer not-a-uuid")).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
