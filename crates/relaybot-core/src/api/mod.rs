//! Platform API module.
//!
//! `PlatformClient` is the seam the authenticator drives: settings in and
//! out, credential login and a cheap authenticated probe. `ApiClient` is the
//! HTTP implementation used by the binary.

pub mod client;
pub mod error;
pub mod platform;

pub use client::ApiClient;
pub use error::ApiError;
pub use platform::{PlatformClient, ProbeOutcome};
