//! Core library for relaybot.
//!
//! Provides the platform API client, session persistence and the
//! session-reuse-with-fallback login routine used by the `relaybot` binary.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, PlatformClient, ProbeOutcome};
pub use auth::{authenticate, AuthError, AuthResult, Credentials, SessionAuthenticator, Settings};
pub use config::Config;
