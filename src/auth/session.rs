use reqwest::{Client, RequestBuilder};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// Longest lifetime a token is trusted for, whatever the endpoint reports
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// A bearer token obtained from the OAuth2 token endpoint
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    scope: Option<String>,
    expires_at: Instant,
}

impl AccessToken {
    pub(crate) fn new(value: String, scope: Option<String>, expires_in: Duration) -> Self {
        Self {
            value,
            scope,
            expires_at: Instant::now() + expires_in.min(MAX_TOKEN_LIFETIME),
        }
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// An authenticated, verified Reddit session
///
/// Only [`Authenticator::authenticate`](crate::auth::Authenticator::authenticate)
/// creates sessions, after the verification probe has succeeded.
#[derive(Debug, Clone)]
pub struct Session {
    http: Client,
    api_url: Url,
    token: AccessToken,
}

impl Session {
    pub(crate) fn new(http: Client, api_url: Url, token: AccessToken) -> Self {
        Self {
            http,
            api_url,
            token,
        }
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Builds an authenticated GET request for a path below the API base URL
    pub fn get(&self, path: &str) -> Result<RequestBuilder, url::ParseError> {
        let url = self.api_url.join(path)?;
        Ok(self.http.get(url).bearer_auth(&self.token.value))
    }
}
