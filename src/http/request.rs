//! Outbound request construction.
//!
//! # Responsibilities
//! - Point the inbound request at the backend origin (path and query joined)
//! - Strip hop-by-hop headers and the inbound `Host`
//! - Carry a protocol upgrade request through to the origin
//! - Record the client in `X-Forwarded-For`
//!
//! Method, remaining headers and body pass through untouched. The body is
//! streamed, never buffered.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{HeaderValue, Request, Uri, Version, header};
use std::net::SocketAddr;
use url::{Position, Url};

use crate::http::headers::{append_forwarded_for, remove_hop_by_hop_headers, upgrade_type};

/// Turn an inbound request into the request sent to `origin`.
///
/// The inbound `Host` is dropped, unlike a plain single-host relay that keeps
/// the client's value: the upstream client fills in the origin's authority,
/// which public origins require. `Connection: upgrade` and `Upgrade` are
/// re-added after hop-by-hop stripping when the client asked to switch
/// protocols.
pub fn forward_request(origin: &Url, request: Request<Body>) -> Result<Request<Body>, axum::http::Error> {
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let (mut parts, body) = request.into_parts();
    parts.uri = rewrite_uri(origin, &parts.uri)?;
    parts.version = Version::HTTP_11;

    let upgrade = upgrade_type(&parts.headers);
    parts.headers.remove(header::HOST);
    remove_hop_by_hop_headers(&mut parts.headers);
    if let Some(protocol) = upgrade {
        parts.headers.insert(header::CONNECTION, HeaderValue::from_static("upgrade"));
        parts.headers.insert(header::UPGRADE, protocol);
    }
    if let Some(ip) = client_ip {
        append_forwarded_for(&mut parts.headers, ip);
    }

    Ok(Request::from_parts(parts, body))
}

/// Absolute upstream URI for `inbound` under `origin`.
pub fn rewrite_uri(origin: &Url, inbound: &Uri) -> Result<Uri, axum::http::Error> {
    let path = join_paths(origin.path(), inbound.path());

    let query = match (
        origin.query().filter(|q| !q.is_empty()),
        inbound.query().filter(|q| !q.is_empty()),
    ) {
        (Some(base), Some(extra)) => Some(format!("{base}&{extra}")),
        (Some(q), None) | (None, Some(q)) => Some(q.to_string()),
        (None, None) => None,
    };

    let path_and_query = match query {
        Some(q) => format!("{path}?{q}"),
        None => path,
    };

    Uri::builder()
        .scheme(origin.scheme())
        .authority(&origin[Position::BeforeHost..Position::AfterPort])
        .path_and_query(path_and_query)
        .build()
}

/// Join two paths with exactly one slash between them.
fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}
