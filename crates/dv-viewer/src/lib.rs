//! HTTP viewer for dv documentation.
//!
//! Serves the pages of a [`Manifest`] as HTML under its link base:
//!
//! ```text
//! GET /<base>/                                   entity index
//! GET /<base>/_manifest.json                     manifest summary (JSON)
//! GET /<base>/<lang>/<entity>/[<version>/]<page>/ rendered page
//! ```
//!
//! Any request may carry `?flush=1` to rebuild the manifest from storage
//! before it is answered.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use dv_manifest::{Manifest, ManifestConfig};
//! use dv_storage::FsStorage;
//! use dv_viewer::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manifest = Arc::new(Manifest::new(Arc::new(FsStorage::new()), ManifestConfig::default()));
//!     run_server(ServerConfig::default(), manifest).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod layout;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use dv_manifest::Manifest;

pub use app::create_router;
pub use error::ViewerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
        }
    }
}

/// Run the viewer until Ctrl-C or SIGTERM.
///
/// The manifest is built before the listener starts so that scan warnings
/// show up at startup rather than on the first request.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig, manifest: Arc<Manifest>) -> Result<(), ViewerError> {
    let state = manifest.state();
    tracing::info!(
        entities = state.entities().len(),
        pages = state.page_count(),
        "Documentation loaded"
    );

    let app = create_router(manifest);

    let address = format!("{}:{}", config.host, config.port);
    let addr = SocketAddr::from_str(&address).map_err(|_| ViewerError::InvalidAddress(address))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for a shutdown signal (Ctrl-C, or SIGTERM on Unix).
///
/// A signal that cannot be listened for never fires, so the other one still
/// stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
