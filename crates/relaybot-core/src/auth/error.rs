use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;

/// Failure reading or writing the persisted session file.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read session file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write session file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A login attempt that did not produce an authenticated client.
#[derive(Error, Debug)]
pub enum LoginError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Platform requires a challenge before login: {0}")]
    ChallengeRequired(String),

    #[error("Login was not accepted by the platform")]
    NotAccepted,

    #[error("Stored session has no device identity")]
    MissingDeviceIdentity,

    #[error("Session probe failed: {0}")]
    Probe(#[source] ApiError),
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Both the stored session and the credential login failed
    #[error("Couldn't login user with either password or session")]
    Exhausted,
}
