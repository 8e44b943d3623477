//! Service-account credentials and OAuth2 token exchange

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Scope covering both Cloud Storage and Cloud Vision
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens are refreshed this long before Google says they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Assertion lifetime accepted by Google (max one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to read key file {path}: {source}")]
    KeyFileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid key file: {0}")]
    InvalidKeyFile(#[from] serde_json::Error),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Failed to sign assertion: {0}")]
    Signing(String),

    #[error("Token request failed: {0}")]
    TokenRequest(String),
}

/// The subset of a Google service-account JSON key this server needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn from_file(path: &Path) -> Result<Self, AuthError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AuthError::KeyFileRead {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&json)
    }
}

/// JWT claims for the OAuth2 JWT-bearer grant
#[derive(Debug, Serialize, PartialEq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl AssertionClaims {
    pub fn new(key: &ServiceAccountKey, scope: &str, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: scope.to_string(),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Process-scoped Google credential.
///
/// The key file is read once at startup; the access token is cached and
/// only re-requested when it is about to expire.
pub struct GoogleAuth {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleAuth {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self, AuthError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AuthError::InvalidPrivateKey(e.to_string()))?;

        Ok(Self {
            key,
            encoding_key,
            scope: CLOUD_PLATFORM_SCOPE.to_string(),
            http,
            token: Mutex::new(None),
        })
    }

    pub async fn from_key_file(path: &Path, http: reqwest::Client) -> Result<Self, AuthError> {
        let key = ServiceAccountKey::from_file(path).await?;
        tracing::info!(client_email = %key.client_email, "Loaded service account key");
        Self::new(key, http)
    }

    /// Get a bearer token, refreshing it if needed
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let claims = AssertionClaims::new(&self.key, &self.scope, now);
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    async fn fetch_token(&self) -> Result<CachedToken, AuthError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .timeout(Duration::from_secs(30))
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| AuthError::TokenRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenRequest(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::TokenRequest(format!("Failed to parse response: {}", e)))?;

        tracing::debug!(expires_in = token.expires_in, "Obtained access token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: now + chrono::Duration::seconds(token.expires_in),
        })
    }
}
