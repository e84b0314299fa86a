//! Protocol upgrade passthrough (WebSocket and friends).
//!
//! # Responsibilities
//! - Accept an upstream `101 Switching Protocols` only for the protocol the
//!   client asked for
//! - Relay the `101` with its `Connection`/`Upgrade` headers intact
//! - Splice the client and upstream connections once both sides switch
//!
//! The tunnel runs in its own task. It ends when either side closes.

use axum::body::Body;
use axum::http::{HeaderValue, Response};
use hyper::body::Incoming;
use hyper::upgrade::OnUpgrade;
use hyper_util::rt::TokioIo;
use tokio::io::copy_bidirectional;

use crate::http::headers::upgrade_type;
use crate::http::response::bad_gateway;

/// Handle a `101` from the upstream.
///
/// `requested` is the protocol named by the client and `client` its pending
/// upgrade. A `101` the client did not ask for, or one for another protocol,
/// becomes a `502`.
pub fn switch_protocols(
    backend: &str,
    requested: Option<HeaderValue>,
    client: Option<OnUpgrade>,
    mut upstream: Response<Incoming>,
) -> Response<Body> {
    let (Some(requested), Some(client)) = (requested, client) else {
        tracing::error!(backend, "Upstream switched protocols without an upgrade request");
        return bad_gateway();
    };

    let offered = upgrade_type(upstream.headers());
    if !offered
        .as_ref()
        .is_some_and(|o| o.as_bytes().eq_ignore_ascii_case(requested.as_bytes()))
    {
        tracing::error!(
            backend,
            requested = ?requested,
            offered = ?offered,
            "Upstream switched to a protocol the client did not request"
        );
        return bad_gateway();
    }

    let upstream_upgrade = hyper::upgrade::on(&mut upstream);
    tokio::spawn(tunnel(backend.to_string(), client, upstream_upgrade));

    let (parts, _) = upstream.into_parts();
    Response::from_parts(parts, Body::empty())
}

/// Copy bytes both ways between the upgraded connections.
async fn tunnel(backend: String, client: OnUpgrade, upstream: OnUpgrade) {
    let (client, upstream) = match tokio::try_join!(client, upstream) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::warn!(backend = %backend, error = %e, "Protocol upgrade failed");
            return;
        }
    };

    let mut client = TokioIo::new(client);
    let mut upstream = TokioIo::new(upstream);

    match copy_bidirectional(&mut client, &mut upstream).await {
        Ok((to_upstream, to_client)) => {
            tracing::debug!(backend = %backend, to_upstream, to_client, "Upgraded connection closed");
        }
        Err(e) => {
            tracing::debug!(backend = %backend, error = %e, "Upgraded connection aborted");
        }
    }
}
