//! Stateless access gatekeeper.
//!
//! Applies a CORS policy to every response, lets allow-listed paths through
//! unauthenticated and requires a valid bearer credential everywhere else.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::GatekeeperConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
