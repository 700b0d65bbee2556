use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::credentials::Credentials;
use super::error::{AuthError, LoginError};
use super::settings::Settings;
use crate::api::{PlatformClient, ProbeOutcome};

/// How the client ended up authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    AuthenticatedViaSession,
    AuthenticatedViaCredentials,
}

/// Logs a client in, preferring the stored session over a fresh credential
/// login, and persists the session after any successful credential login.
#[derive(Debug, Clone)]
pub struct SessionAuthenticator {
    session_path: PathBuf,
    credentials: Credentials,
}

impl SessionAuthenticator {
    pub fn new(session_path: impl Into<PathBuf>, credentials: Credentials) -> Self {
        Self {
            session_path: session_path.into(),
            credentials,
        }
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }

    /// Authenticate `client`, trying the stored session first.
    ///
    /// Errors on the session path are logged and fall through to a plain
    /// credential login. The session file is written only after that
    /// credential login succeeds. Returns `AuthError::Exhausted` when both
    /// paths fail.
    pub async fn authenticate<C>(&self, client: &mut C) -> Result<AuthResult, AuthError>
    where
        C: PlatformClient + ?Sized,
    {
        info!(path = %self.session_path.display(), "Session filepath");

        if let Some(settings) = self.load_session(client) {
            match self.login_via_session(client, settings).await {
                Ok(()) => {
                    info!("Logged in using stored session");
                    return Ok(AuthResult::AuthenticatedViaSession);
                }
                Err(e) => warn!(error = %e, "Couldn't login user using session information"),
            }
        }

        info!(
            username = %self.credentials.username,
            "Attempting to login via username and password"
        );
        match client.login(&self.credentials).await {
            Ok(true) => {
                if let Err(e) = client.dump_settings(&self.session_path) {
                    warn!(error = %e, "Failed to save session");
                }
                info!("Logged in using username and password");
                Ok(AuthResult::AuthenticatedViaCredentials)
            }
            Ok(false) => {
                warn!("Couldn't login user using username and password: login not accepted");
                Err(AuthError::Exhausted)
            }
            Err(e) => {
                warn!(error = %e, "Couldn't login user using username and password");
                Err(AuthError::Exhausted)
            }
        }
    }

    /// Stored session, if one exists and can be read
    fn load_session<C>(&self, client: &C) -> Option<Settings>
    where
        C: PlatformClient + ?Sized,
    {
        match client.load_settings(&self.session_path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Ignoring unusable session file");
                None
            }
        }
    }

    async fn login_via_session<C>(&self, client: &mut C, settings: Settings) -> Result<(), LoginError>
    where
        C: PlatformClient + ?Sized,
    {
        client.set_settings(settings);
        self.login(client).await?;

        match client.probe().await {
            ProbeOutcome::Ok => Ok(()),
            ProbeOutcome::AuthRequired => {
                info!("Session is invalid, need to login via username and password");

                // Same device identity across logins
                let identity = client
                    .settings()
                    .device_identity()
                    .cloned()
                    .ok_or(LoginError::MissingDeviceIdentity)?;
                client.set_settings(Settings::default());
                client.set_device_identity(identity);

                self.login(client).await
            }
            ProbeOutcome::Failed(e) => Err(LoginError::Probe(e)),
        }
    }

    async fn login<C>(&self, client: &mut C) -> Result<(), LoginError>
    where
        C: PlatformClient + ?Sized,
    {
        if client.login(&self.credentials).await? {
            Ok(())
        } else {
            Err(LoginError::NotAccepted)
        }
    }
}

/// Convenience wrapper over [`SessionAuthenticator::authenticate`].
pub async fn authenticate<C>(
    client: &mut C,
    session_path: impl Into<PathBuf>,
    credentials: Credentials,
) -> Result<AuthResult, AuthError>
where
    C: PlatformClient + ?Sized,
{
    SessionAuthenticator::new(session_path, credentials)
        .authenticate(client)
        .await
}
