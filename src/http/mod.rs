//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, stage composition)
//!     → request.rs (request ID)
//!     → [security stages: CORS, cookie stripping, access gate]
//!     → handlers.rs (health, API docs, whoami, 404 fallback)
//!     → response.rs (uniform JSON errors)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::RequestIdExt;
pub use server::HttpServer;
