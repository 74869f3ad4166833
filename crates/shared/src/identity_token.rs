//! Identity-token verification for the external identity provider.
//!
//! The provider signs session tokens (RS256 in production). This module only
//! verifies them and exposes the stable subject; HS256 with a shared secret is
//! supported for local development and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error type for identity-token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

/// Claims the backend reads from an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Stable external identity key.
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl IdentityClaims {
    /// Claims for `subject` valid for `ttl_secs` from now.
    pub fn for_subject(subject: impl Into<String>, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.into(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            iss: None,
        }
    }
}

/// Signing algorithm accepted by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAlgorithm {
    Rs256,
    Hs256,
}

impl FromStr for TokenAlgorithm {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RS256" => Ok(TokenAlgorithm::Rs256),
            "HS256" => Ok(TokenAlgorithm::Hs256),
            other => Err(TokenError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl From<TokenAlgorithm> for Algorithm {
    fn from(alg: TokenAlgorithm) -> Self {
        match alg {
            TokenAlgorithm::Rs256 => Algorithm::RS256,
            TokenAlgorithm::Hs256 => Algorithm::HS256,
        }
    }
}

/// Verifies identity tokens issued by the identity provider.
#[derive(Clone)]
pub struct IdentityTokenVerifier {
    decoding_key: DecodingKey,
    algorithm: TokenAlgorithm,
    issuer: Option<String>,
    leeway_secs: u64,
}

impl std::fmt::Debug for IdentityTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityTokenVerifier")
            .field("algorithm", &self.algorithm)
            .field("issuer", &self.issuer)
            .field("leeway_secs", &self.leeway_secs)
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl IdentityTokenVerifier {
    /// Verifier for RS256 tokens signed by the provider's private key.
    pub fn from_rsa_public_key(
        public_key_pem: &str,
        issuer: Option<String>,
        leeway_secs: u64,
    ) -> Result<Self, TokenError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| TokenError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            decoding_key,
            algorithm: TokenAlgorithm::Rs256,
            issuer,
            leeway_secs,
        })
    }

    /// Verifier for HS256 tokens signed with a shared secret.
    pub fn from_secret(
        secret: &str,
        issuer: Option<String>,
        leeway_secs: u64,
    ) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::InvalidKey("Secret must not be empty".to_string()));
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: TokenAlgorithm::Hs256,
            issuer,
            leeway_secs,
        })
    }

    pub fn algorithm(&self) -> TokenAlgorithm {
        self.algorithm
    }

    /// Validates a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm.into());
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = self.leeway_secs;
        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data =
            decode::<IdentityClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidToken
                    | jsonwebtoken::errors::ErrorKind::InvalidSignature
                    | jsonwebtoken::errors::ErrorKind::InvalidIssuer => TokenError::InvalidToken,
                    _ => TokenError::DecodingError(e.to_string()),
                }
            })?;

        if token_data.claims.sub.trim().is_empty() {
            return Err(TokenError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

/// Signs HS256 identity tokens with a shared secret.
///
/// Development and test tooling only; production tokens come from the
/// identity provider.
pub fn sign_with_secret(secret: &str, claims: &IdentityClaims) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::EncodingError(e.to_string()))
}
