/// OpenAPI document aggregation.
pub mod documentation;
/// Health reporting helpers.
pub mod health_service;
/// In-game workflows: call, mark, claim.
pub mod play_service;
/// Lobby workflows: create, join, leave, listings.
pub mod session_service;
/// Role-scoped read-only projections.
pub mod view_service;
