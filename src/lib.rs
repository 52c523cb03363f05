//! Minimal CORS forwarding proxy library.
//!
//! Accepts inbound HTTP requests, forwards them to a single fixed upstream
//! origin with path and query preserved verbatim, relays the upstream's
//! response (success or error status alike), and attaches a permissive
//! CORS header set to every response. OPTIONS preflights are answered
//! locally with 204 and never reach the upstream.

pub mod config;
pub mod http;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
