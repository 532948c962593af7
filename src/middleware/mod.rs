//! HTTP middleware for Blood Bank Core
//!
//! - `AuthUser` bearer token extractor
//! - JSON normalization of framework error responses
//! - request ID propagation and HTTP metrics
//! - log-safe request spans

pub mod auth;
pub mod error_response;
pub mod metrics;
pub mod trace;

pub use auth::{AuthError, AuthUser};
pub use error_response::normalize_error_response;
pub use metrics::ObservabilityLayer;
pub use trace::SanitizedMakeSpan;
