// Head Ball relay server
// Pairs two clients per room code and forwards GAME_STATE / PLAYER_INPUT
//
// Usage: cargo run --bin relay-server [-- --addr 0.0.0.0:8080]

use std::env;

use headball::relay::{serve, RoomRegistry};
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// `--addr` wins, then `$PORT` (hosted deployments), then the default
fn bind_address(args: &[String]) -> String {
    if let Some(pos) = args.iter().position(|arg| arg == "--addr") {
        if let Some(addr) = args.get(pos + 1) {
            return addr.clone();
        }
    }

    match env::var("PORT") {
        Ok(port) if !port.trim().is_empty() => format!("0.0.0.0:{}", port.trim()),
        _ => DEFAULT_ADDR.to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();
    let addr = bind_address(&args);

    let listener = TcpListener::bind(&addr).await?;
    info!("Relay server starting on {}", addr);

    serve(listener, RoomRegistry::new()).await?;
    Ok(())
}
