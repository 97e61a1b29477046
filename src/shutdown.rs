use std::sync::Arc;

use tokio::signal;

use crate::state::AppState;

/// Wait for a shutdown signal (SIGINT or SIGTERM).
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

/// Log every chain that is being abandoned.
///
/// Commands already started are not killed; they run to completion on
/// their own and their results are dropped.
pub async fn graceful_shutdown(state: &Arc<AppState>) {
    tracing::info!("Starting graceful shutdown...");

    let in_flight = state.get_in_flight_chains().await;

    if in_flight.is_empty() {
        tracing::info!("No in-flight chains");
        return;
    }

    tracing::warn!(
        count = in_flight.len(),
        "Abandoning in-flight chains, their p4 commands keep running"
    );

    for chain in in_flight {
        tracing::info!(
            chain_id = chain.id,
            chain = %chain.name,
            elapsed_ms = chain.elapsed().as_millis() as u64,
            "Abandoned chain"
        );
    }

    tracing::info!("Graceful shutdown complete");
}
