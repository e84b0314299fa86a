//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → pool.rs (Balancer::dispatch)
//!     → round_robin.rs (pick the next live backend, advance cursor)
//!     → backend.rs (relay request to the chosen origin)
//!     → Upstream response streamed back to the caller
//! ```
//!
//! # Design Decisions
//! - Backend set is fixed at construction; no runtime membership changes
//! - Selection policy sits behind the `LoadBalancer` trait
//! - Liveness is a capability of each backend, consulted on every pick
//! - Select-and-advance is one atomic step, so concurrent dispatch stays fair

pub mod backend;
pub mod pool;
pub mod round_robin;

use std::sync::Arc;
use thiserror::Error;

pub use backend::{Backend, HttpBackend};
pub use pool::Balancer;
pub use round_robin::RoundRobin;

/// A backend selection policy.
pub trait LoadBalancer: Send + Sync + std::fmt::Debug {
    /// Pick the next backend to receive traffic, or `None` if none is alive.
    fn next_server(&self, backends: &[Arc<dyn Backend>]) -> Option<Arc<dyn Backend>>;

    /// Policy name (for logging).
    fn strategy_name(&self) -> &'static str;
}

/// Errors raised while building or using a balancer.
#[derive(Debug, Error)]
pub enum BalancerError {
    /// Backend origin is not an absolute http(s) URL.
    #[error("Invalid backend origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// Balancer was constructed without backends.
    #[error("Balancer requires at least one backend")]
    EmptyPool,

    /// Every backend currently reports not alive.
    #[error("No backend available")]
    NoBackendAvailable,
}
