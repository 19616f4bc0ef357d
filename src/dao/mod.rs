/// Database model definitions.
pub mod models;
/// Session aggregate storage and retrieval operations.
pub mod session_store;
/// Storage abstraction layer for record store operations.
pub mod storage;
