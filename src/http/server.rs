//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all route
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Hand every request to the balancer

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::load_balancer::Balancer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub balancer: Arc<Balancer>,
}

/// HTTP front end of the load balancer.
pub struct HttpServer {
    router: Router,
    balancer: Arc<Balancer>,
}

impl HttpServer {
    /// Create a new HTTP server dispatching through `balancer`.
    pub fn new(balancer: Balancer) -> Self {
        let balancer = Arc::new(balancer);
        let state = AppState {
            balancer: balancer.clone(),
        };

        let router = Self::build_router(state);
        Self { router, balancer }
    }

    /// Every path and method goes to the same handler.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// The router, for serving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn balancer(&self) -> &Arc<Balancer> {
        &self.balancer
    }

    /// Serve on `listener` until the process is killed.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.balancer.backends().len(),
            strategy = self.balancer.strategy_name(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app).await
    }
}

/// Catch-all handler.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let span = tracing::info_span!("dispatch", request_id = %Uuid::new_v4());
    state.balancer.dispatch(request).instrument(span).await
}
