//! HTTP middleware: CORS, security headers and request deadlines.

pub mod cors;
pub mod security;
pub mod timeout;

pub use cors::{cors_layer_from_env, create_cors_layer};
pub use security::security_headers;
pub use timeout::request_timeout_layer;
