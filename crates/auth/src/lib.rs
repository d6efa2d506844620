//! Token authentication for quicknotes.
//!
//! This crate provides:
//! - Registration, login, logout and current-user routes
//! - HS256 access tokens with per-token revocation
//! - bcrypt password hashing
//! - An Axum extractor for the authenticated user

mod config;
mod error;
mod extractors;
mod handlers;
mod jwt;
mod password;
mod state;

#[cfg(test)]
mod test_support;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::CurrentUser;
pub use handlers::auth_routes;
pub use jwt::TokenIssuer;
pub use password::{hash_password, verify_password};
pub use state::AuthState;
