//! Library crate for loteria-back, exposing modules for binaries and integration tests.

pub mod auth;
mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use config::AppConfig;
