//! Credential validation.
//!
//! # Responsibilities
//! - Define the contract the access gate uses to authenticate a request
//! - Provide the HS256 bearer-token validator and a deny-all fallback
//! - Mint development tokens for the CLI
//!
//! # Design Decisions
//! - Validators only see request headers; no session or cookie lookup
//! - Validators are shared behind `Arc` and must be `Send + Sync`
//! - Async contract so remote introspection backends can plug in

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::Value;

use crate::config::{AuthConfig, JwtConfig, MAX_LEEWAY_SECS};

/// Identity established for a protected request.
///
/// Inserted into request extensions for downstream handlers.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub subject: Option<String>,
    pub claims: Value,
}

/// Why a credential was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Token is missing!")]
    MissingToken,
    #[error("Token has expired!")]
    Expired,
    #[error("Invalid token!")]
    Invalid(String),
}

impl AuthError {
    /// Short label for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing",
            AuthError::Expired => "expired",
            AuthError::Invalid(_) => "invalid",
        }
    }

    /// Validation detail for logs; never sent to the client.
    pub fn detail(&self) -> Option<&str> {
        match self {
            AuthError::Invalid(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Authenticates a request from its headers alone.
#[async_trait]
pub trait CredentialValidator: Send + Sync + fmt::Debug {
    async fn validate(&self, headers: &HeaderMap) -> Result<Principal, AuthError>;
}

/// Rejects every request. Used when no authentication backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

#[async_trait]
impl CredentialValidator for DenyAll {
    async fn validate(&self, _headers: &HeaderMap) -> Result<Principal, AuthError> {
        Err(AuthError::MissingToken)
    }
}

/// Validates `Authorization: Bearer <jwt>` signed with a shared HS256 secret.
pub struct JwtBearerValidator {
    key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for JwtBearerValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtBearerValidator")
            .field("leeway", &self.validation.leeway)
            .field("issuer", &self.validation.iss)
            .field("audience", &self.validation.aud)
            .finish_non_exhaustive()
    }
}

impl JwtBearerValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // jsonwebtoken subtracts the leeway from the clock without checking.
        validation.leeway = config.leeway_secs.min(MAX_LEEWAY_SECS);
        // Tokens carrying only `iat` are accepted; `exp` is still checked when present.
        validation.set_required_spec_claims::<&str>(&[]);
        match &config.issuer {
            Some(iss) => validation.set_issuer(&[iss]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl CredentialValidator for JwtBearerValidator {
    async fn validate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let token = bearer_token(headers).ok_or(AuthError::MissingToken)?;

        let data = decode::<Value>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid(e.to_string()),
        })?;

        let subject = data
            .claims
            .get("sub")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Principal {
            subject,
            claims: data.claims,
        })
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Exactly two whitespace-separated parts with a case-sensitive `Bearer` scheme.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Pick the validator described by configuration.
pub fn validator_from_config(config: &AuthConfig) -> Arc<dyn CredentialValidator> {
    match &config.jwt {
        Some(jwt) => Arc::new(JwtBearerValidator::new(jwt)),
        None => Arc::new(DenyAll),
    }
}

/// Sign an HS256 token for `subject`, optionally expiring after `ttl`.
pub fn issue_token(
    config: &JwtConfig,
    subject: &str,
    ttl: Option<Duration>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = jsonwebtoken::get_current_timestamp();
    let mut claims = serde_json::json!({ "sub": subject, "iat": now });
    if let Some(ttl) = ttl {
        claims["exp"] = Value::from(now.saturating_add(ttl.as_secs()));
    }
    if let Some(iss) = &config.issuer {
        claims["iss"] = Value::from(iss.as_str());
    }
    if let Some(aud) = &config.audience {
        claims["aud"] = Value::from(aud.as_str());
    }

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
