use futures::TryFutureExt;
use oauth2::basic::BasicClient;
use oauth2::{AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl};
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::{Error, Result};

const CLIENT_ID_VAR: &str = "CAMUNDA_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "CAMUNDA_CLIENT_SECRET";
const TOKEN_AUDIENCE_VAR: &str = "CAMUNDA_TOKEN_AUDIENCE";
const AUTHORIZATION_SERVER_URL_VAR: &str = "CAMUNDA_AUTHORIZATION_SERVER_URL";
const AUTH_REQUEST_TIMEOUT_VAR: &str = "CAMUNDA_AUTH_REQUEST_TIMEOUT";

/// The default timeout for OAuth requests
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Offset from access token expiration time at which clients will start requesting new tokens.
const CLOCK_SKEW_BUFFER: Duration = Duration::from_secs(15);

/// OAuth client credentials used to obtain bearer tokens for the REST API.
#[derive(Clone)]
pub struct OAuthConfig {
    client_id: String,
    client_secret: String,
    token_audience: Option<String>,
    authorization_server_url: String,
    timeout: Duration,
}

impl OAuthConfig {
    /// Client credentials against the given token endpoint.
    pub fn new<A, B, C>(client_id: A, client_secret: B, authorization_server_url: C) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        OAuthConfig {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_audience: None,
            authorization_server_url: authorization_server_url.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the audience requested for the token.
    pub fn with_audience<T: Into<String>>(self, audience: T) -> Self {
        OAuthConfig {
            token_audience: Some(audience.into()),
            ..self
        }
    }

    /// Set the timeout for token requests.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        OAuthConfig { timeout, ..self }
    }

    /// Check if auth env vars set
    pub fn should_use_env_config() -> bool {
        env::var(CLIENT_ID_VAR).is_ok() || env::var(CLIENT_SECRET_VAR).is_ok()
    }

    /// Read the client credentials from the environment.
    pub fn from_env() -> Result<Self> {
        let client_id = env::var(CLIENT_ID_VAR)
            .map_err(|_error| Error::InvalidParameters("CAMUNDA_CLIENT_ID not set"))?;
        let client_secret = env::var(CLIENT_SECRET_VAR)
            .map_err(|_error| Error::InvalidParameters("CAMUNDA_CLIENT_SECRET not set"))?;
        let authorization_server_url = env::var(AUTHORIZATION_SERVER_URL_VAR).map_err(|_error| {
            Error::InvalidParameters("CAMUNDA_AUTHORIZATION_SERVER_URL not set")
        })?;
        let token_audience = env::var(TOKEN_AUDIENCE_VAR).ok();
        let timeout = env::var(AUTH_REQUEST_TIMEOUT_VAR)
            .ok()
            .and_then(|timeout| Some(Duration::from_millis(timeout.parse().ok()?)))
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(OAuthConfig {
            client_id,
            client_secret,
            token_audience,
            authorization_server_url,
            timeout,
        })
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"****")
            .field("token_audience", &self.token_audience)
            .field("authorization_server_url", &self.authorization_server_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        self.expires_at <= SystemTime::now() + CLOCK_SKEW_BUFFER
    }
}

struct TokenProviderInner {
    oauth2_client: BasicClient,
    audience: Option<String>,
    request_timeout: Duration,
    cached_token: Mutex<Option<CachedToken>>,
}

/// Hands out bearer tokens, requesting a new one when the cached token is
/// about to expire.
#[derive(Clone)]
pub(crate) struct TokenProvider(Arc<TokenProviderInner>);

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("audience", &self.0.audience)
            .field("request_timeout", &self.0.request_timeout)
            .finish()
    }
}

impl TokenProvider {
    pub(crate) fn new(config: OAuthConfig) -> Result<Self> {
        let auth_url = AuthUrl::new(config.authorization_server_url.clone())
            .map_err(|err| Error::Auth(err.to_string()))?;
        let token_url = TokenUrl::new(config.authorization_server_url)
            .map_err(|err| Error::Auth(err.to_string()))?;

        let oauth2_client = BasicClient::new(
            ClientId::new(config.client_id),
            Some(ClientSecret::new(config.client_secret)),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(oauth2::AuthType::RequestBody);

        Ok(TokenProvider(Arc::new(TokenProviderInner {
            oauth2_client,
            audience: config.token_audience,
            request_timeout: config.timeout,
            cached_token: Mutex::new(None),
        })))
    }

    /// A valid access token, refreshed first if needed.
    pub(crate) async fn access_token(&self) -> Result<String> {
        let mut cached = self.0.cached_token.lock().await;

        match cached.as_ref() {
            Some(token) if !token.is_expired() => {
                tracing::trace!("access token still valid");
                return Ok(token.access_token.clone());
            }
            _ => {}
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        cached.replace(token);

        tracing::debug!("updated cached access token");
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        tracing::debug!("requesting new oauth token");

        let token_request = self.0.oauth2_client.exchange_client_credentials();
        let token_request = if let Some(audience) = &self.0.audience {
            token_request.add_extra_param("audience", audience)
        } else {
            token_request
        };

        tracing::trace!(req = ?token_request, "sending request");

        let response = timeout(
            self.0.request_timeout,
            token_request
                .request_async(oauth2::reqwest::async_http_client)
                .map_err(|err| Error::Auth(err.to_string())),
        )
        .await
        .map_err(|_| {
            Error::Auth(format!(
                "timed out waiting for oauth token after {} milliseconds",
                self.0.request_timeout.as_millis()
            ))
        })
        .and_then(|res| res)
        .map_err(|err| {
            tracing::error!(%err, "error getting oauth token");
            err
        })?;

        tracing::trace!(?response, "got oauth token");

        Ok(CachedToken {
            access_token: response.access_token().secret().clone(),
            expires_at: SystemTime::now() + response.expires_in().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secret() {
        let config = OAuthConfig::new("id", "top-secret", "https://auth.example.com/token")
            .with_audience("camunda-rest");
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("****"));
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn invalid_token_url_is_rejected() {
        let config = OAuthConfig::new("id", "secret", "not a url");
        assert!(matches!(TokenProvider::new(config), Err(Error::Auth(_))));
    }

    #[test]
    fn token_expiry_respects_skew() {
        let fresh = CachedToken {
            access_token: "a".into(),
            expires_at: SystemTime::now() + Duration::from_secs(3600),
        };
        let stale = CachedToken {
            access_token: "b".into(),
            expires_at: SystemTime::now() + Duration::from_secs(5),
        };
        assert!(!fresh.is_expired());
        assert!(stale.is_expired());
    }
}
