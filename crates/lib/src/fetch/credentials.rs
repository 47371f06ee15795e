//! # Service Account Credentials
//!
//! Loads a Google service-account key file and trades it for a short-lived
//! OAuth access token using the JWT bearer grant.

use crate::constants::DEFAULT_TOKEN_URI;
use crate::errors::FetchError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a service-account key file that the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Claims of the signed assertion sent to the token endpoint.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    /// Reads a key file. A missing file is reported as `CredentialsMissing`.
    pub fn from_file(path: &Path) -> Result<Self, FetchError> {
        if !path.exists() {
            return Err(FetchError::CredentialsMissing(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)
            .map_err(|e| FetchError::CredentialsInvalid(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, FetchError> {
        serde_json::from_str(content).map_err(|e| FetchError::CredentialsInvalid(e.to_string()))
    }

    /// Signs an RS256 assertion for `scope`, valid for one hour from `issued_at`.
    pub fn signed_assertion(&self, scope: &str, issued_at: i64) -> Result<String, FetchError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| FetchError::CredentialsInvalid(format!("Bad private key: {e}")))?;
        encode(&header, &claims, &key)
            .map_err(|e| FetchError::CredentialsInvalid(format!("Failed to sign assertion: {e}")))
    }

    /// Exchanges a fresh assertion for an access token.
    pub async fn fetch_access_token(
        &self,
        client: &Client,
        scope: &str,
    ) -> Result<String, FetchError> {
        let assertion = self.signed_assertion(scope, chrono::Utc::now().timestamp())?;
        debug!("Requesting access token from {}", self.token_uri);

        let response = client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| FetchError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(FetchError::Auth(format!(
                "Token endpoint responded with {status}: {error_text}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Auth(format!("Malformed token response: {e}")))?;
        Ok(token.access_token)
    }
}
