//! Bath ROI is a small finance tracker for a sauna ("bath") business.
//!
//! This library provides a JSON REST API for recording income and expense
//! transactions and for managing the price charged per bath session, backed
//! by SQLite. The [client] module holds a typed client for the API and the
//! cached ledger state that front ends build on.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
pub mod client;
mod database_id;
mod db;
pub mod endpoints;
mod error;
mod logging;
mod not_found;
mod routing;
pub mod setting;
pub mod transaction;
mod validation;

pub use app_state::AppState;
pub use database_id::{DatabaseId, TransactionId};
pub use error::{Error, ErrorBody};
pub use logging::{LOG_BODY_LENGTH_LIMIT, add_logging_layers, logging_middleware};
pub use routing::{HealthStatus, build_router};
pub use validation::ValidationError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
