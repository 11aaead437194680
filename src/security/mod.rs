//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (answer preflight, tag responses with allow-origin)
//!     → headers.rs (strip Set-Cookie on the way out)
//!     → access_control.rs (allow-list check, else credential check)
//!         → allow_list.rs / pattern.rs (compiled at startup)
//!         → credentials.rs (pluggable validator)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Fail closed: anything not allow-listed needs a valid credential
//! - Stateless: decisions read only the current request
//! - Policies are compiled once and shared read-only

pub mod access_control;
pub mod allow_list;
pub mod cors;
pub mod credentials;
pub mod headers;
pub mod pattern;

pub use access_control::{access_gate_middleware, Access, AccessGate};
pub use allow_list::AllowList;
pub use cors::{CorsPolicy, Origins};
pub use credentials::{
    issue_token, validator_from_config, AuthError, CredentialValidator, DenyAll,
    JwtBearerValidator, Principal,
};
pub use pattern::{PathPattern, PatternError};
