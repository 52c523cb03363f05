//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, per-method dispatch)
//!     → forward.rs (build outbound request: URI join, header filter, body)
//!     → upstream client (hyper-util legacy client)
//!     → server.rs (relay status/body, default Content-Type)
//!     → cors.rs (attach CORS header set on every response)
//!     → Send to client
//! ```

pub mod cors;
pub mod forward;
pub mod server;

pub use forward::ForwardError;
pub use server::HttpServer;
