//! ============================================================================
//! Patreon OAuth 2.0 Authentication
//! ============================================================================
//! Implements the OAuth 2.0 authorization code flow for Patreon (confidential
//! client: a client secret is required). Produces the access token the
//! `PatreonClient` is constructed from; nothing downstream ever sees codes or
//! refresh tokens.
//! ============================================================================

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const PATREON_AUTH_URL: &str = "https://www.patreon.com/oauth2/authorize";
const PATREON_TOKEN_URL: &str = "https://www.patreon.com/api/oauth2/token";

/// Scopes needed to read the user profile and campaign pledges
const SCOPES: &str = "users pledges-to-me my-campaign";

/// OAuth 2.0 tokens for the Patreon API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatreonTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: i64,
    pub scope: String,
    pub token_type: String,
}

impl PatreonTokens {
    /// Check if tokens are expired (with 5 min buffer)
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.expires_at <= now + 300
    }
}

/// Patreon OAuth 2.0 client
pub struct PatreonOAuth {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    client: Client,
}

impl PatreonOAuth {
    /// Create a new Patreon OAuth client
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            client: Client::new(),
        }
    }

    /// Get the authorization URL to send the user to. The caller supplies the
    /// state parameter and verifies it on the callback.
    pub fn authorize_url(&self, state: &str) -> String {
        let url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&state={}",
            PATREON_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SCOPES),
            urlencoding::encode(state),
        );

        debug!("Generated Patreon auth URL with state: {}", state);
        url
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<PatreonTokens> {
        info!("Exchanging Patreon authorization code for tokens");
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    /// Refresh an expired access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<PatreonTokens> {
        info!("Refreshing Patreon access token");
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<PatreonTokens> {
        let response = self
            .client
            .post(PATREON_TOKEN_URL)
            .form(form)
            .send()
            .await
            .map_err(|e| anyhow!("Patreon token request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Patreon token endpoint error {}: {}", status, body));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Patreon token response: {}", e))?;

        Ok(PatreonTokens {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_at: chrono::Utc::now().timestamp() + token_response.expires_in,
            scope: token_response.scope.unwrap_or_default(),
            token_type: token_response.token_type,
        })
    }
}

/// Wire shape of the token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    token_type: String,
}
