//! Transport plumbing: the HTTP router (liveness, WebSocket upgrade, CORS)
//! and the event loop that owns all game state.

pub mod event_loop;
mod socket;

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ServerError;
use crate::session::{Gateway, RoomRegistry};

pub use event_loop::{EventLoop, EventLoopHandle};

pub const LIVENESS_BODY: &str = "Server is running";

#[derive(Clone)]
pub struct AppState {
    events: EventLoopHandle,
}

/// Build the router around an already running event loop.
pub fn router(events: EventLoopHandle, allowed_origin: &str) -> Result<Router, ServerError> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|_| ServerError::InvalidOrigin(allowed_origin.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST]);

    Ok(Router::new()
        .route("/", get(liveness))
        .route("/ws", get(socket::ws_handler))
        .with_state(AppState { events })
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn liveness() -> &'static str {
    LIVENESS_BODY
}

pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

/// Serve on `listener` with a fresh registry until Ctrl-C.
pub async fn run(listener: TcpListener, allowed_origin: &str) -> Result<(), ServerError> {
    let events = event_loop::spawn(Gateway::new(RoomRegistry::new()));
    let app = router(events, allowed_origin)?;

    info!(addr = %listener.local_addr()?, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available: run until the process is killed.
        std::future::pending::<()>().await;
    }
}
