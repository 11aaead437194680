//! Access gate middleware.
//!
//! Decides, per request, whether it may proceed without credentials
//! (allow-listed path) or must be authenticated by the configured
//! [`CredentialValidator`]. The decision uses nothing but the request itself.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::GatekeeperConfig;
use crate::http::RequestIdExt;
use crate::observability::metrics;
use crate::security::allow_list::AllowList;
use crate::security::credentials::{validator_from_config, AuthError, CredentialValidator, Principal};
use crate::security::pattern::PatternError;

/// Outcome of a successful gate check.
#[derive(Debug, Clone)]
pub enum Access {
    /// Path is allow-listed; no credential was consulted.
    Exempt,
    /// Credential validated.
    Authenticated(Principal),
}

impl Access {
    pub fn label(&self) -> &'static str {
        match self {
            Access::Exempt => "exempt",
            Access::Authenticated(_) => "authenticated",
        }
    }
}

/// Allow-list plus credential validator, immutable after startup.
#[derive(Debug, Clone)]
pub struct AccessGate {
    allow_list: AllowList,
    validator: Arc<dyn CredentialValidator>,
}

impl AccessGate {
    pub fn new(allow_list: AllowList, validator: Arc<dyn CredentialValidator>) -> Self {
        Self {
            allow_list,
            validator,
        }
    }

    /// Compile the allow-list and pick the validator from configuration.
    pub fn from_config(config: &GatekeeperConfig) -> Result<Self, PatternError> {
        let allow_list = AllowList::from_patterns(&config.access.allow_list)?;
        Ok(Self::new(allow_list, validator_from_config(&config.auth)))
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Decide whether a request may proceed.
    pub async fn evaluate(&self, path: &str, headers: &HeaderMap) -> Result<Access, AuthError> {
        if self.allow_list.is_exempt(path) {
            return Ok(Access::Exempt);
        }
        self.validator
            .validate(headers)
            .await
            .map(Access::Authenticated)
    }
}

pub async fn access_gate_middleware(
    State(gate): State<Arc<AccessGate>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let method: Method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = req.request_id().to_string();

    match gate.evaluate(&path, req.headers()).await {
        Ok(access) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                decision = access.label(),
                "Request admitted"
            );
            metrics::record_decision(access.label());
            if let Access::Authenticated(principal) = access {
                req.extensions_mut().insert(principal);
            }
            next.run(req).await
        }
        Err(err) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                reason = err.reason(),
                detail = err.detail().unwrap_or_default(),
                "Request rejected"
            );
            metrics::record_decision("rejected");
            metrics::record_rejection(err.reason());
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::credentials::DenyAll;
    use async_trait::async_trait;
    use axum::http::header;

    /// Accepts any request carrying `Authorization: Bearer letmein`.
    #[derive(Debug)]
    struct StaticToken;

    #[async_trait]
    impl CredentialValidator for StaticToken {
        async fn validate(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
            match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
                Some("Bearer letmein") => Ok(Principal {
                    subject: Some("tester".into()),
                    claims: serde_json::json!({}),
                }),
                Some(_) => Err(AuthError::Invalid("wrong token".into())),
                None => Err(AuthError::MissingToken),
            }
        }
    }

    fn gate(validator: Arc<dyn CredentialValidator>) -> AccessGate {
        AccessGate::new(
            AllowList::from_patterns(&["/api/health", "/docs/**"]).unwrap(),
            validator,
        )
    }

    fn auth_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_exempt_path_skips_validator() {
        let gate = gate(Arc::new(DenyAll));
        let access = gate.evaluate("/docs/a/b", &HeaderMap::new()).await.unwrap();
        assert!(matches!(access, Access::Exempt));
    }

    #[tokio::test]
    async fn test_exempt_even_with_bad_credentials() {
        let gate = gate(Arc::new(StaticToken));
        let access = gate
            .evaluate("/api/health", &auth_headers("Bearer wrong"))
            .await
            .unwrap();
        assert_eq!(access.label(), "exempt");
    }

    #[tokio::test]
    async fn test_protected_path_requires_credentials() {
        let gate = gate(Arc::new(StaticToken));
        assert_eq!(
            gate.evaluate("/api/orders", &HeaderMap::new()).await.unwrap_err(),
            AuthError::MissingToken
        );
        assert!(matches!(
            gate.evaluate("/api/orders", &auth_headers("Bearer nope")).await,
            Err(AuthError::Invalid(_))
        ));

        let access = gate
            .evaluate("/api/orders", &auth_headers("Bearer letmein"))
            .await
            .unwrap();
        match access {
            Access::Authenticated(p) => assert_eq!(p.subject.as_deref(), Some("tester")),
            other => panic!("expected authenticated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_from_config_defaults_deny_protected_paths() {
        let gate = AccessGate::from_config(&GatekeeperConfig::default()).unwrap();
        assert_eq!(gate.allow_list().len(), 7);
        assert!(gate.evaluate("/api/orders", &HeaderMap::new()).await.is_err());
        assert!(gate.evaluate("/swagger-ui/x", &HeaderMap::new()).await.is_ok());
    }
}
