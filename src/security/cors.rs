//! Cross-origin resource sharing policy.
//!
//! The policy is applied to every path. Preflight (`OPTIONS`) requests are
//! answered directly by the layer with the allowed methods and headers, so
//! they never reach the access gate. Actual requests get the allow-origin
//! header from the same layer and the method and header lists from
//! [`CorsPolicy::allow_methods_layer`] / [`CorsPolicy::allow_headers_layer`],
//! so rejections carry the full policy too.

use std::time::Duration;

use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CorsConfig, ValidationError};

/// Which origins may read responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origins {
    Any,
    List(Vec<HeaderValue>),
}

/// Validated CORS policy, immutable after startup.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origins: Origins,
    methods: Vec<Method>,
    headers: Vec<HeaderName>,
    max_age: Option<Duration>,
    methods_value: Option<HeaderValue>,
    headers_value: Option<HeaderValue>,
}

/// Comma-joined header value; `None` for an empty list.
fn joined<T: AsRef<str>>(items: &[T]) -> Option<HeaderValue> {
    if items.is_empty() {
        return None;
    }
    let value = items
        .iter()
        .map(|item| item.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&value).ok()
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Result<Self, ValidationError> {
        let origins = if config.allowed_origins.iter().any(|o| o == "*") {
            Origins::Any
        } else {
            let values = config
                .allowed_origins
                .iter()
                .map(|o| {
                    HeaderValue::from_str(o).map_err(|_| ValidationError::CorsOrigin(o.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Origins::List(values)
        };

        let methods = config
            .allowed_methods
            .iter()
            .map(|m| {
                Method::from_bytes(m.as_bytes()).map_err(|_| ValidationError::CorsMethod(m.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let headers = config
            .allowed_headers
            .iter()
            .map(|h| {
                HeaderName::from_bytes(h.as_bytes())
                    .map_err(|_| ValidationError::CorsHeader(h.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            methods_value: joined(&methods),
            headers_value: joined(&headers),
            origins,
            methods,
            headers,
            max_age: config.max_age_secs.map(Duration::from_secs),
        })
    }

    pub fn origins(&self) -> &Origins {
        &self.origins
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn headers(&self) -> &[HeaderName] {
        &self.headers
    }

    /// Build the tower-http layer enforcing this policy.
    pub fn layer(&self) -> CorsLayer {
        let allow_origin = match &self.origins {
            Origins::Any => AllowOrigin::any(),
            Origins::List(values) => AllowOrigin::list(values.clone()),
        };

        let layer = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(AllowMethods::list(self.methods.clone()))
            .allow_headers(AllowHeaders::list(self.headers.clone()));

        match self.max_age {
            Some(max_age) => layer.max_age(max_age),
            None => layer,
        }
    }

    /// Adds `Access-Control-Allow-Methods` to actual responses.
    ///
    /// Goes inside [`Self::layer`]; preflights already carry the header.
    pub fn allow_methods_layer(&self) -> SetResponseHeaderLayer<Option<HeaderValue>> {
        SetResponseHeaderLayer::if_not_present(ACCESS_CONTROL_ALLOW_METHODS, self.methods_value.clone())
    }

    /// Adds `Access-Control-Allow-Headers` to actual responses.
    pub fn allow_headers_layer(&self) -> SetResponseHeaderLayer<Option<HeaderValue>> {
        SetResponseHeaderLayer::if_not_present(ACCESS_CONTROL_ALLOW_HEADERS, self.headers_value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app(policy: &CorsPolicy) -> Router {
        Router::new()
            .route("/x", get(|| async { "ok" }))
            .route(
                "/denied",
                get(|| async { axum::http::StatusCode::UNAUTHORIZED }),
            )
            .layer(policy.allow_headers_layer())
            .layer(policy.allow_methods_layer())
            .layer(policy.layer())
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/x")
            .header("origin", origin)
            .header("access-control-request-method", "PUT")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_default_policy_is_wildcard() {
        let policy = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        assert_eq!(policy.origins(), &Origins::Any);
        assert_eq!(policy.methods().len(), 5);
        assert!(policy.headers().contains(&axum::http::header::AUTHORIZATION));
    }

    #[test]
    fn test_invalid_method_rejected() {
        let mut config = CorsConfig::default();
        config.allowed_methods.push("BAD METHOD".into());
        assert_eq!(
            CorsPolicy::from_config(&config).unwrap_err(),
            ValidationError::CorsMethod("BAD METHOD".into())
        );
    }

    #[tokio::test]
    async fn test_preflight_lists_methods_and_headers() {
        let policy = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        let response = app(&policy)
            .oneshot(preflight("https://example.com"))
            .await
            .unwrap();

        assert!(response.status().is_success());
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        for m in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(methods.contains(m), "{m} missing from {methods}");
        }
        let allowed = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("authorization"));
        assert!(allowed.contains("cache-control"));
        assert!(allowed.contains("content-type"));
        assert!(headers.get("access-control-max-age").is_none());
    }

    #[tokio::test]
    async fn test_actual_responses_carry_full_policy() {
        let policy = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        let response = app(&policy)
            .oneshot(
                Request::builder()
                    .uri("/denied")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-methods"],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
        assert_eq!(
            headers["access-control-allow-headers"],
            "authorization, cache-control, content-type"
        );
    }

    #[tokio::test]
    async fn test_preflight_carries_max_age_when_configured() {
        let config = CorsConfig {
            max_age_secs: Some(600),
            ..CorsConfig::default()
        };
        let policy = CorsPolicy::from_config(&config).unwrap();
        let response = app(&policy)
            .oneshot(preflight("https://example.com"))
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-max-age"], "600");
        // Preflight keeps a single copy of each list.
        assert_eq!(
            response
                .headers()
                .get_all("access-control-allow-methods")
                .iter()
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_origin_list_only_echoes_known_origins() {
        let config = CorsConfig {
            allowed_origins: vec!["http://localhost:4200".into()],
            max_age_secs: Some(600),
            ..CorsConfig::default()
        };
        let policy = CorsPolicy::from_config(&config).unwrap();

        let known = app(&policy)
            .oneshot(
                Request::builder()
                    .uri("/x")
                    .header("origin", "http://localhost:4200")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            known.headers()["access-control-allow-origin"],
            "http://localhost:4200"
        );

        let unknown = app(&policy)
            .oneshot(
                Request::builder()
                    .uri("/x")
                    .header("origin", "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(unknown.headers().get("access-control-allow-origin").is_none());
    }
}
