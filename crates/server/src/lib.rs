//! HTTP API for the movie recommender.
//!
//! Exposes the catalog listing and the recommendation operation of
//! [`engine::Recommender`] as JSON endpoints:
//!
//! | Method | Path             | Body                          |
//! |--------|------------------|-------------------------------|
//! | GET    | `/health`        |                               |
//! | GET    | `/api/movies`    |                               |
//! | POST   | `/api/recommend` | `{"selected_movies": [1, 2]}` |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::{info, warn};

/// Serve the API on `listener` until Ctrl-C
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}", addr);
    }
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await
        }
    }
}
