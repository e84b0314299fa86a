//! Local origin for trying the balancer by hand.
//!
//! ```text
//! cargo run --example echo_backend -- --port 8081 --name one
//! cargo run --example echo_backend -- --port 8082 --name two
//! cargo run -- --port 8080 --backend http://127.0.0.1:8081 --backend http://127.0.0.1:8082
//! ```

use axum::{body::Body, http::Request, Router};
use clap::Parser;
use std::net::SocketAddr;

#[derive(Parser)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8081)]
    port: u16,

    /// Name reported in every response
    #[arg(short, long, default_value = "echo")]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let name = args.name;

    let app = Router::new().fallback(move |request: Request<Body>| {
        let name = name.clone();
        async move { format!("{} answered {} {}\n", name, request.method(), request.uri()) }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Echo backend listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
