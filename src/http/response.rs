//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream status, headers and body to the client
//! - Strip hop-by-hop headers
//! - Map transport failures to 502 Bad Gateway
//!
//! # Design Decisions
//! - Body is streamed, not buffered
//! - Upstream error statuses are relayed as-is, never rewritten

use axum::body::Body;
use axum::http::{Response, StatusCode};
use hyper::body::Incoming;

use crate::http::headers::remove_hop_by_hop_headers;

/// Convert an upstream response into the response sent to the client.
pub fn relay_response(upstream: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = upstream.into_parts();
    remove_hop_by_hop_headers(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}

/// Response for an upstream that could not be reached.
pub fn bad_gateway() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::BAD_GATEWAY;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_gateway_is_empty() {
        let response = bad_gateway();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}
