//! Downstream handlers.

use axum::{http::StatusCode, response::Response, Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::response::error_response;
use crate::security::Principal;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Liveness check. Allow-listed, so it answers without credentials.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "UP" })
}

/// Identity attached by the access gate.
pub async fn whoami(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}

/// OpenAPI 3 description of the public surface.
pub async fn api_docs() -> Json<Value> {
    Json(json!({
        "openapi": "3.0.3",
        "info": {
            "title": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "components": {
            "securitySchemes": {
                "bearerAuth": { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
            }
        },
        "security": [{ "bearerAuth": [] }],
        "paths": {
            "/api/health": {
                "get": {
                    "summary": "Service liveness",
                    "security": [],
                    "responses": {
                        "200": {
                            "description": "Service is up",
                            "content": {
                                "application/json": {
                                    "example": { "status": "UP" }
                                }
                            }
                        }
                    }
                }
            },
            "/api/whoami": {
                "get": {
                    "summary": "Claims of the authenticated caller",
                    "responses": {
                        "200": { "description": "Authenticated principal" },
                        "401": { "description": "Missing, expired or invalid token" }
                    }
                }
            }
        }
    }))
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_body() {
        let Json(status) = health().await;
        assert_eq!(serde_json::to_value(status).unwrap(), json!({ "status": "UP" }));
    }

    #[tokio::test]
    async fn test_api_docs_lists_health() {
        let Json(doc) = api_docs().await;
        assert!(doc["paths"].get("/api/health").is_some());
        assert_eq!(doc["paths"]["/api/health"]["get"]["security"], json!([]));
    }
}
