//! Backend pool and request dispatch.
//!
//! # Responsibilities
//! - Own the fixed, ordered backend list
//! - Apply the selection policy to pick a backend
//! - Dispatch each inbound request to the chosen backend

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::config::BalancerConfig;
use crate::http::client::build_client;
use crate::load_balancer::{
    BalancerError,
    LoadBalancer,
    backend::{Backend, HttpBackend},
    round_robin::RoundRobin,
};

/// Fixed set of backends plus the policy that rotates through them.
#[derive(Debug)]
pub struct Balancer {
    listen_port: u16,
    /// Insertion order is selection order.
    backends: Vec<Arc<dyn Backend>>,
    strategy: Box<dyn LoadBalancer>,
}

impl Balancer {
    /// Create a round-robin balancer over `backends`.
    pub fn new(listen_port: u16, backends: Vec<Arc<dyn Backend>>) -> Result<Self, BalancerError> {
        Self::with_strategy(listen_port, backends, Box::new(RoundRobin::new()))
    }

    /// Create a balancer with an explicit selection policy.
    pub fn with_strategy(
        listen_port: u16,
        backends: Vec<Arc<dyn Backend>>,
        strategy: Box<dyn LoadBalancer>,
    ) -> Result<Self, BalancerError> {
        if backends.is_empty() {
            return Err(BalancerError::EmptyPool);
        }
        Ok(Self {
            listen_port,
            backends,
            strategy,
        })
    }

    /// Build every configured backend over one shared upstream client.
    ///
    /// Fails on the first origin that does not parse.
    pub fn from_config(config: &BalancerConfig) -> Result<Self, BalancerError> {
        let client = build_client();
        let backends = config
            .backends
            .iter()
            .map(|b| {
                HttpBackend::with_client(&b.origin, client.clone())
                    .map(|backend| Arc::new(backend) as Arc<dyn Backend>)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(config.listener.port, backends)
    }

    pub fn listen_port(&self) -> u16 {
        self.listen_port
    }

    pub fn backends(&self) -> &[Arc<dyn Backend>] {
        &self.backends
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.strategy_name()
    }

    /// Pick the backend for the next request.
    pub fn select_next(&self) -> Result<Arc<dyn Backend>, BalancerError> {
        self.strategy
            .next_server(&self.backends)
            .ok_or(BalancerError::NoBackendAvailable)
    }

    /// Select a backend and relay `request` through it.
    pub async fn dispatch(&self, request: Request<Body>) -> Response<Body> {
        let backend = match self.select_next() {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(backend_count = self.backends.len(), error = %e, "Dispatch failed");
                return (StatusCode::SERVICE_UNAVAILABLE, "No backend available").into_response();
            }
        };

        tracing::info!(
            backend = %backend.address(),
            method = %request.method(),
            path = %request.uri().path(),
            "Forwarding request to target server"
        );

        backend.relay(request).await
    }
}
