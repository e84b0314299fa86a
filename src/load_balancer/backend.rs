//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream origin
//! - Report liveness (consulted by the selection policy)
//! - Relay one request/response pair to the origin and back

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

use crate::http::client::{build_client, UpstreamClient};
use crate::http::headers::upgrade_type;
use crate::http::request::forward_request;
use crate::http::response::{bad_gateway, relay_response};
use crate::http::upgrade::switch_protocols;
use crate::load_balancer::BalancerError;

/// Something that can receive forwarded traffic.
#[async_trait]
pub trait Backend: Send + Sync + std::fmt::Debug {
    /// The configured origin identifier, for logging.
    fn address(&self) -> &str;

    /// Whether this backend may be selected.
    fn is_alive(&self) -> bool;

    /// Forward `request` to the origin and return its response.
    ///
    /// Never fails: transport errors become a `502 Bad Gateway` response.
    /// An accepted protocol upgrade returns the `101` and keeps tunnelling
    /// in the background.
    async fn relay(&self, request: Request<Body>) -> Response<Body>;
}

/// A backend reached over HTTP or HTTPS.
#[derive(Debug)]
pub struct HttpBackend {
    /// Origin exactly as configured.
    address: String,
    /// Parsed origin; scheme, authority and base path of every relayed request.
    origin: Url,
    /// Liveness flag. Starts `true`; only `set_alive` changes it.
    alive: AtomicBool,
    client: UpstreamClient,
}

impl HttpBackend {
    /// Create a backend with its own upstream client.
    pub fn new(origin: &str) -> Result<Self, BalancerError> {
        Self::with_client(origin, build_client())
    }

    /// Create a backend sharing an existing upstream client.
    pub fn with_client(origin: &str, client: UpstreamClient) -> Result<Self, BalancerError> {
        let url = parse_origin(origin)?;
        Ok(Self {
            address: origin.to_string(),
            origin: url,
            alive: AtomicBool::new(true),
            client,
        })
    }

    /// The parsed origin URL.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Override liveness. Hook for an external health collaborator.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::Release);
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn address(&self) -> &str {
        &self.address
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    async fn relay(&self, mut request: Request<Body>) -> Response<Body> {
        let requested_upgrade = upgrade_type(request.headers());
        let client_upgrade = requested_upgrade
            .is_some()
            .then(|| hyper::upgrade::on(&mut request));

        let outbound = match forward_request(&self.origin, request) {
            Ok(req) => req,
            Err(e) => {
                tracing::error!(backend = %self.address, error = %e, "Failed to build upstream request");
                return bad_gateway();
            }
        };

        tracing::debug!(
            backend = %self.address,
            method = %outbound.method(),
            uri = %outbound.uri(),
            "Relaying request"
        );

        match self.client.request(outbound).await {
            Ok(upstream) if upstream.status() == StatusCode::SWITCHING_PROTOCOLS => {
                switch_protocols(&self.address, requested_upgrade, client_upgrade, upstream)
            }
            Ok(upstream) => relay_response(upstream),
            Err(e) => {
                tracing::error!(backend = %self.address, error = %e, "Upstream request failed");
                bad_gateway()
            }
        }
    }
}

/// Parse and check a configured origin.
///
/// Accepts absolute `http`/`https` URLs with a host. Everything else is rejected
/// rather than resolved to some fallback.
pub fn parse_origin(origin: &str) -> Result<Url, BalancerError> {
    let invalid = |reason: String| BalancerError::InvalidOrigin {
        origin: origin.to_string(),
        reason,
    };

    if origin.chars().any(char::is_control) {
        return Err(invalid("contains control characters".into()));
    }

    let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme {other:?}"))),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".into()));
    }

    Ok(url)
}
