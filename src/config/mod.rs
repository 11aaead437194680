//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatekeeperConfig (validated, immutable)
//!     → compiled into the access gate and CORS layer at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AccessConfig, AuthConfig, CorsConfig, GatekeeperConfig, JwtConfig, ListenerConfig,
    ObservabilityConfig, SecurityConfig, TimeoutConfig, DEFAULT_ALLOW_LIST,
    MAX_LEEWAY_SECS,
};
pub use validation::{validate_config, ValidationError};
