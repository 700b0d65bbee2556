//! HTTP client for the platform's private API.
//!
//! `ApiClient` keeps the session state in memory as `Settings` and attaches
//! the stored authorization to every request. It implements
//! `PlatformClient` so the authenticator can drive it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info, warn};

use super::{ApiError, PlatformClient, ProbeOutcome};
use crate::auth::{Credentials, DeviceIdentity, LoginError, Settings};
use crate::models::{DirectThread, InboxResponse};

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when none is configured
pub const DEFAULT_API_URL: &str = "https://i.instagram.com/api/v1";

/// HTTP request timeout in seconds.
/// A hang here is not bounded anywhere else.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response header carrying a freshly issued authorization token
const SET_AUTHORIZATION_HEADER: &str = "ig-set-authorization";

/// Messages fetched per thread when listing the inbox
const THREAD_MESSAGE_LIMIT: usize = 10;

const USER_AGENT: &str = concat!("relaybot/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    logged_in_user: Option<LoggedInUser>,
    #[serde(default)]
    two_factor_required: bool,
    #[serde(default)]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoggedInUser {
    pk: serde_json::Value,
    #[serde(default)]
    username: Option<String>,
}

impl LoggedInUser {
    fn id(&self) -> String {
        match self.pk.as_str() {
            Some(s) => s.to_string(),
            None => self.pk.to_string(),
        }
    }
}

/// What a login response amounts to
#[derive(Debug)]
enum LoginVerdict {
    Accepted(LoggedInUser),
    Declined(Option<String>),
    Challenge(String),
}

impl LoginResponse {
    fn verdict(self) -> LoginVerdict {
        if self.two_factor_required {
            return LoginVerdict::Challenge("two-factor authentication required".to_string());
        }
        if let Some(kind) = self.error_type.as_deref() {
            if kind.contains("challenge") || kind.contains("checkpoint") {
                return LoginVerdict::Challenge(self.message.unwrap_or_else(|| kind.to_string()));
            }
        }
        match (self.status.as_str(), self.logged_in_user) {
            ("ok", Some(user)) => LoginVerdict::Accepted(user),
            _ => LoginVerdict::Declined(self.message),
        }
    }
}

/// API client for the platform.
pub struct ApiClient {
    client: Client,
    base_url: String,
    settings: Settings,
}

impl ApiClient {
    /// Create a new API client against `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            settings: Settings::default(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.settings.authorization {
            headers.insert(header::AUTHORIZATION, header::HeaderValue::from_str(token)?);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .headers(self.auth_headers()?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse JSON from {}: {}", url, e)))
    }

    /// Fetch the most recent direct message threads
    pub async fn direct_threads(&self, limit: usize) -> Result<Vec<DirectThread>, ApiError> {
        let url = format!(
            "{}?limit={}&thread_message_limit={}",
            self.url("direct_v2/inbox/"),
            limit,
            THREAD_MESSAGE_LIMIT
        );
        let inbox: InboxResponse = self.get(&url).await?;

        let mut threads = inbox.inbox.threads;
        threads.truncate(limit);
        debug!(count = threads.len(), "Inbox threads fetched");
        Ok(threads)
    }
}

#[async_trait]
impl PlatformClient for ApiClient {
    fn settings(&self) -> Settings {
        self.settings.clone()
    }

    fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    fn set_device_identity(&mut self, identity: DeviceIdentity) {
        self.settings.uuids = Some(identity);
    }

    async fn login(&mut self, credentials: &Credentials) -> Result<bool, LoginError> {
        let url = self.url("accounts/login/");

        let identity = self.settings.ensure_device_identity().clone();
        let mut form: Vec<(&str, &str)> = vec![
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        form.extend(identity.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        debug!(
            username = %credentials.username,
            has_token = self.settings.is_authenticated(),
            "Sending login request"
        );

        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers().map_err(LoginError::Api)?)
            .form(&form)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let token = response
            .headers()
            .get(SET_AUTHORIZATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_owned);
        let body = response.text().await.map_err(ApiError::from)?;

        // Rejected credentials come back as 400 with a JSON verdict
        if !status.is_success() && status != StatusCode::BAD_REQUEST {
            return Err(ApiError::from_status(status, &body).into());
        }
        let parsed: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse login response: {}", e))
        })?;

        match parsed.verdict() {
            LoginVerdict::Accepted(user) => {
                if token.is_some() {
                    self.settings.authorization = token;
                }
                self.settings.user_id = Some(user.id());
                self.settings.last_login = Some(Utc::now());
                info!(
                    user_id = %user.id(),
                    username = user.username.as_deref().unwrap_or(&credentials.username),
                    "Login accepted"
                );
                Ok(true)
            }
            LoginVerdict::Declined(message) => {
                warn!(status = %status, message = message.as_deref().unwrap_or(""), "Login declined");
                Ok(false)
            }
            LoginVerdict::Challenge(message) => Err(LoginError::ChallengeRequired(message)),
        }
    }

    async fn probe(&self) -> ProbeOutcome {
        let url = self.url("feed/timeline/");
        self.get::<serde_json::Value>(&url).await.map(|_| ()).into()
    }
}
