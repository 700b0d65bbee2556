//! Authentication module for restoring and persisting platform sessions.
//!
//! This module provides:
//! - `SessionAuthenticator`: session-first login with credential fallback
//! - `Settings`: the opaque session blob, including the device identity
//! - `SessionFile`: wholesale load/save of `Settings` as JSON
//! - `Credentials`: username/password pair from the environment
//!
//! A stored session is only rewritten after a successful credential login.

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod settings;
pub mod store;

pub use authenticator::{authenticate, AuthResult, SessionAuthenticator};
pub use credentials::Credentials;
pub use error::{AuthError, LoginError, SessionError};
pub use settings::{generate_device_identity, DeviceIdentity, Settings};
pub use store::SessionFile;
