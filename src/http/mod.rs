//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route)
//!     → [balancer picks a backend]
//!     → request.rs (rewrite URI, strip hop-by-hop, X-Forwarded-For)
//!     → client.rs (HTTP/HTTPS to upstream)
//!     → response.rs (strip hop-by-hop, stream body)
//!       or upgrade.rs (101: relay, then tunnel both connections)
//!     → Send to client
//! ```

pub mod client;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;
pub mod upgrade;

pub use server::HttpServer;
