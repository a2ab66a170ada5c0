//! Application-only OAuth2 for Reddit.
//!
//! Search only needs read access, so the client-credentials grant is enough:
//! no user redirect, no refresh token. The token request goes through the
//! same `reqwest` client as the API calls so Reddit sees the configured
//! User-Agent on every request.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError, Scope,
    TokenResponse, TokenUrl,
};
use pulse_core::{CoreError, RedditApiError, RedditCredentials};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info};

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Tokens this close to expiry are treated as expired.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Reddit's documented lifetime for app-only tokens, used when the token
/// response omits `expires_in`.
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditToken {
    pub access_token: String,
    pub expires_at: SystemTime,
    pub scope: Vec<String>,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() + EXPIRY_MARGIN >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub enum AuthState {
    NotAuthenticated,
    Authenticated { token: RedditToken },
    TokenExpired { token: RedditToken },
}

#[derive(Debug)]
pub struct AppOnlyAuthenticator {
    oauth_client: BasicClient,
    http_client: reqwest::Client,
    state: AuthState,
}

impl AppOnlyAuthenticator {
    pub fn new(
        credentials: &RedditCredentials,
        http_client: reqwest::Client,
    ) -> Result<Self, CoreError> {
        let auth_url = AuthUrl::new(REDDIT_AUTH_URL.to_string()).map_err(|e| {
            CoreError::InvalidInput {
                message: format!("Invalid auth URL: {e}"),
            }
        })?;
        let token_url = TokenUrl::new(REDDIT_TOKEN_URL.to_string()).map_err(|e| {
            CoreError::InvalidInput {
                message: format!("Invalid token URL: {e}"),
            }
        })?;

        let oauth_client = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            auth_url,
            Some(token_url),
        );

        Ok(Self {
            oauth_client,
            http_client,
            state: AuthState::NotAuthenticated,
        })
    }

    pub fn auth_state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn set_token(&mut self, token: RedditToken) {
        self.state = if token.is_expired() {
            AuthState::TokenExpired { token }
        } else {
            AuthState::Authenticated { token }
        };
    }

    /// Returns a usable access token, requesting a new one when there is
    /// none yet or the cached one has expired.
    pub async fn access_token(&mut self) -> Result<String, CoreError> {
        let cached = match &self.state {
            AuthState::Authenticated { token } => Some(token.clone()),
            _ => None,
        };

        if let Some(token) = cached {
            if !token.is_expired() {
                return Ok(token.access_token);
            }
            debug!("Cached Reddit token expired");
            self.state = AuthState::TokenExpired { token };
        }

        let token = self.authenticate().await?;
        Ok(token.access_token)
    }

    pub async fn authenticate(&mut self) -> Result<RedditToken, CoreError> {
        info!("Requesting application-only Reddit token");

        let http_client = &self.http_client;
        let response = self
            .oauth_client
            .exchange_client_credentials()
            .add_scope(Scope::new("read".to_string()))
            .request_async(|request| send_token_request(http_client, request))
            .await
            .map_err(|e| {
                error!("Reddit token request failed: {}", e);
                match e {
                    RequestTokenError::ServerResponse(response) => {
                        CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                            reason: response.to_string(),
                        })
                    }
                    RequestTokenError::Request(e) => CoreError::Network(e),
                    RequestTokenError::Parse(e, _) => {
                        CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                            reason: format!("unexpected token response: {e}"),
                        })
                    }
                    RequestTokenError::Other(reason) => {
                        CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason })
                    }
                }
            })?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let token = RedditToken {
            access_token: response.access_token().secret().clone(),
            expires_at: SystemTime::now() + lifetime,
            scope: response
                .scopes()
                .map(|scopes| scopes.iter().map(|s| s.as_str().to_string()).collect())
                .unwrap_or_default(),
        };

        info!("Reddit API initialized successfully");
        self.state = AuthState::Authenticated {
            token: token.clone(),
        };
        Ok(token)
    }
}

async fn send_token_request(
    client: &reqwest::Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = client
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}
