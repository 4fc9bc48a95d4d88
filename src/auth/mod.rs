//! Reddit authentication
//!
//! Exchanges application credentials for an OAuth2 bearer token
//! (client-credentials grant), then probes the API once to confirm the
//! token is usable. Failures are fatal and never retried.

mod session;

pub use session::{AccessToken, Session};

use crate::config::{ApiConfig, Credentials};
use crate::AuthError;
use reqwest::{redirect::Policy, Client};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Path of the OAuth2 token endpoint, relative to the auth URL
pub const TOKEN_PATH: &str = "/api/v1/access_token";

/// Path probed with the fresh token, relative to the API URL
pub const VERIFY_PATH: &str = "/api/v1/scopes";

/// Token lifetime assumed when the endpoint omits `expires_in`
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Builds an HTTP client for talking to Reddit
///
/// Redirects are not followed: Reddit answers unknown subreddits with a
/// redirect to its search page, which the fetch client reports as not found.
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,

    #[serde(default)]
    expires_in: Option<u64>,

    #[serde(default)]
    scope: Option<String>,

    #[serde(default)]
    error: Option<serde_json::Value>,

    #[serde(default)]
    message: Option<String>,
}

/// Exchanges credentials for a verified [`Session`]
#[derive(Debug, Clone)]
pub struct Authenticator {
    api: ApiConfig,
}

impl Authenticator {
    pub fn new(api: ApiConfig) -> Self {
        Self { api }
    }

    /// Authenticates with the Reddit API
    ///
    /// Performs the token exchange followed by exactly one verification
    /// call. Never returns an unverified session.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        tracing::info!("Authenticating with Reddit API");

        match self.establish(credentials).await {
            Ok(session) => {
                tracing::info!("Authentication successful");
                Ok(session)
            }
            Err(e) => {
                tracing::error!("Authentication failed: {}", e);
                Err(e)
            }
        }
    }

    async fn establish(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let http = build_http_client(
            &credentials.user_agent,
            Duration::from_secs(self.api.timeout_secs),
        )
        .map_err(AuthError::Client)?;

        let auth_url = Url::parse(&self.api.auth_url)?;
        let api_url = Url::parse(&self.api.api_url)?;

        let token = exchange_token(&http, &auth_url, credentials).await?;
        let session = Session::new(http, api_url, token);

        verify(&session).await?;
        Ok(session)
    }
}

async fn exchange_token(
    http: &Client,
    auth_url: &Url,
    credentials: &Credentials,
) -> Result<AccessToken, AuthError> {
    let token_url = auth_url.join(TOKEN_PATH)?;
    tracing::debug!("Requesting access token from {}", token_url);

    let response = http
        .post(token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    let parsed: TokenResponse =
        serde_json::from_str(&body).map_err(|e| AuthError::MalformedToken(e.to_string()))?;

    if let Some(error) = parsed.error {
        let message = parsed.message.unwrap_or_else(|| match error {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
        return Err(AuthError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let value = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::MalformedToken("missing access_token".to_string()))?;

    let lifetime = parsed
        .expires_in
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TOKEN_LIFETIME);

    tracing::debug!(
        expires_in_secs = lifetime.as_secs(),
        scope = parsed.scope.as_deref().unwrap_or(""),
        "Access token granted"
    );

    Ok(AccessToken::new(value, parsed.scope, lifetime))
}

async fn verify(session: &Session) -> Result<(), AuthError> {
    tracing::debug!("Verifying session");

    let response = session.get(VERIFY_PATH)?.send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(AuthError::Verification {
            status: status.as_u16(),
        });
    }

    Ok(())
}
