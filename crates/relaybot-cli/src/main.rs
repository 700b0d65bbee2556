//! relaybot - logs the relay agent into the platform and lists its inbox.
//!
//! A cached session is reused when possible; after a fresh credential login
//! the session is written back to `SESSION_FILEPATH`.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use relaybot_core::api::ApiClient;
use relaybot_core::auth::SessionAuthenticator;
use relaybot_core::models::DirectThread;
use relaybot_core::Config;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ============================================================================
// Constants
// ============================================================================

/// Inbox threads listed after login
const INBOX_THREAD_LIMIT: usize = 1;

/// Load `.env` if present, then build the log filter.
///
/// The filter reads `RUST_LOG`, so it has to be built after `.env` is loaded.
fn load_environment<F>(load_dotenv: F) -> (dotenvy::Result<PathBuf>, EnvFilter)
where
    F: FnOnce() -> dotenvy::Result<PathBuf>,
{
    let dotenv = load_dotenv();
    // RUST_LOG overrides the default level (e.g. RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    (dotenv, filter)
}

/// Initialize the tracing subscriber for logging
fn init_tracing(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

async fn get_inbox_threads(client: &ApiClient) -> Result<Vec<DirectThread>> {
    client
        .direct_threads(INBOX_THREAD_LIMIT)
        .await
        .context("Failed to retrieve inbox threads")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (dotenv, filter) = load_environment(dotenvy::dotenv);
    init_tracing(filter);

    info!("Reading environment variables...");
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
        Err(e) => debug!(error = %e, "No .env file loaded"),
    }
    let config = Config::from_env();
    if !config.credentials.is_complete() {
        warn!("ACCOUNT_USERNAME or ACCOUNT_PASSWORD is empty; credential login will likely fail");
    }

    let mut client = ApiClient::new(&config.api_url).context("Failed to create API client")?;

    info!("Attempting login...");
    let authenticator = SessionAuthenticator::new(config.session_path(), config.credentials.clone());
    debug!(path = %authenticator.session_path().display(), "Using session file");
    let result = authenticator.authenticate(&mut client).await?;
    info!(?result, "Login complete");

    info!("Retrieving inbox threads...");
    for thread in get_inbox_threads(&client).await? {
        println!("{}", thread);
    }

    Ok(())
}
