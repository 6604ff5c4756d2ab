//! The `/api` CRUD surface over the student store.

mod error;
mod handlers;
mod router;
mod types;

pub use error::{ApiError, INTERNAL_MESSAGE, NOT_FOUND_MESSAGE};
pub use router::build_router;
pub use types::{AppState, Envelope, ErrorBody};

use tokio::net::TcpListener;

use crate::error::Result;

/// Serve until ctrl-c.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}
