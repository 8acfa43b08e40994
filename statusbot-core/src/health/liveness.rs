use std::net::{SocketAddr, TcpListener};

use axum::{
    Router,
    http::StatusCode,
};
use axum_server::Handle;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::Error;

pub const LIVENESS_BODY: &str = "Bot is running!\n";

/// Running liveness endpoint; dropping it does not stop the server, call
/// [`shutdown`](Self::shutdown).
pub struct LivenessServer {
    local_addr: SocketAddr,
    handle: Handle,
    task: JoinHandle<()>,
}

impl LivenessServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn shutdown(self) {
        self.handle.graceful_shutdown(None);
        let _ = self.task.await;
    }
}

/// Any path, any method: `200 OK` with a fixed plain-text body.
pub fn liveness_router() -> Router {
    Router::new()
        .fallback(|| async { (StatusCode::OK, LIVENESS_BODY) })
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Binds `addr` and serves the liveness endpoint in the background.
pub async fn start_liveness_server(addr: SocketAddr) -> Result<LivenessServer, Error> {
    let listener = TcpListener::bind(addr)?;
    listener.set_nonblocking(true)?;
    let local_addr = listener.local_addr()?;

    let handle = Handle::new();
    let server = axum_server::from_tcp(listener)
        .handle(handle.clone())
        .serve(liveness_router().into_make_service());

    info!("Liveness server listening on http://{}", local_addr);
    let task = tokio::spawn(async move {
        if let Err(e) = server.await {
            error!("Liveness server error: {}", e);
        }
        info!("Liveness server shut down.");
    });

    Ok(LivenessServer {
        local_addr,
        handle,
        task,
    })
}
