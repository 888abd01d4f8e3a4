//! HTTP API handlers for tattfq-ws

pub mod admin;
pub mod auth;
pub mod error;
pub mod export;
pub mod health;
pub mod survey;

pub use auth::require_admin;
pub use error::ApiError;
pub use health::health_routes;
