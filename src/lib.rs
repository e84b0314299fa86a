//! Round-robin HTTP load balancer.
//!
//! Accepts requests on one port and relays each, unchanged, to the next live
//! backend from a fixed list.

pub mod config;
pub mod http;
pub mod load_balancer;
pub mod observability;

pub use config::BalancerConfig;
pub use http::HttpServer;
pub use load_balancer::{Backend, Balancer, BalancerError, HttpBackend};
