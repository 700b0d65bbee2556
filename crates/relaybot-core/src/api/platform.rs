use std::path::Path;

use async_trait::async_trait;

use super::ApiError;
use crate::auth::{Credentials, DeviceIdentity, LoginError, SessionError, SessionFile, Settings};

/// Result of the cheap authenticated request used to test a restored session.
#[derive(Debug)]
pub enum ProbeOutcome {
    Ok,
    /// The platform says the session has expired
    AuthRequired,
    Failed(ApiError),
}

/// A probe answered with 401 or 403 means the session is no longer accepted.
impl From<Result<(), ApiError>> for ProbeOutcome {
    fn from(result: Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => ProbeOutcome::Ok,
            Err(ApiError::LoginRequired | ApiError::AccessDenied(_)) => ProbeOutcome::AuthRequired,
            Err(e) => ProbeOutcome::Failed(e),
        }
    }
}

/// Client-side handle on the remote platform.
///
/// Holds the session state (`Settings`) and performs the calls the
/// authenticator needs. Transport, signing and timeouts are the
/// implementation's business.
#[async_trait]
pub trait PlatformClient: Send {
    /// Snapshot of the current session state
    fn settings(&self) -> Settings;

    /// Replace the whole session state
    fn set_settings(&mut self, settings: Settings);

    fn set_device_identity(&mut self, identity: DeviceIdentity);

    /// Log in with credentials. `Ok(false)` means the platform declined
    /// without raising an error.
    async fn login(&mut self, credentials: &Credentials) -> Result<bool, LoginError>;

    async fn probe(&self) -> ProbeOutcome;

    fn load_settings(&self, path: &Path) -> Result<Option<Settings>, SessionError> {
        SessionFile::new(path).load()
    }

    fn dump_settings(&self, path: &Path) -> Result<(), SessionError> {
        SessionFile::new(path).save(&self.settings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_probe_outcome_from_result() {
        assert!(matches!(ProbeOutcome::from(Ok(())), ProbeOutcome::Ok));
        assert!(matches!(
            ProbeOutcome::from(Err(ApiError::LoginRequired)),
            ProbeOutcome::AuthRequired
        ));
        assert!(matches!(
            ProbeOutcome::from(Err(ApiError::RateLimited)),
            ProbeOutcome::Failed(ApiError::RateLimited)
        ));
    }

    #[test]
    fn test_rejected_status_means_auth_required() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let outcome = ProbeOutcome::from(Err(ApiError::from_status(status, "")));
            assert!(
                matches!(outcome, ProbeOutcome::AuthRequired),
                "{} should require login, got {:?}",
                status,
                outcome
            );
        }

        let outcome = ProbeOutcome::from(Err(ApiError::from_status(StatusCode::NOT_FOUND, "")));
        assert!(matches!(outcome, ProbeOutcome::Failed(ApiError::NotFound(_))));
    }
}
