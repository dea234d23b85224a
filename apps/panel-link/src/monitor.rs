//! Operator-facing reporting for a running session.
//!
//! Without a UI attached, the binary surfaces what an operator would see:
//! connection transitions and liveness changes, one log line each.

use link_core::connection::{ConnectionState, ConnectionStatus};
use link_core::heartbeat::LivenessSignal;
use link_core::session::SessionHandle;

use std::future::Future;

use log::{debug, error, info, warn};
use tokio::signal::ctrl_c;
use tokio::sync::broadcast::error::RecvError;

/// Log connection and liveness changes of `session` until `stop` resolves.
pub async fn report_until<F>(session: &SessionHandle, stop: F)
where
    F: Future<Output = ()>,
{
    let mut liveness = session.subscribe_liveness();
    let mut connection = session.subscribe_connection();
    let mut connection_open = true;
    tokio::pin!(stop);

    loop {
        tokio::select! {
            biased;

            _ = &mut stop => {
                info!("Stop requested");
                break;
            }

            signal = liveness.recv() => match signal {
                Ok(signal) => report_liveness(signal),
                Err(RecvError::Lagged(missed)) => {
                    warn!("Missed {missed} liveness signals");
                }
                Err(RecvError::Closed) => {
                    debug!("Liveness channel closed");
                    break;
                }
            },

            changed = connection.changed(), if connection_open => match changed {
                Ok(()) => report_connection(*connection.borrow_and_update()),
                Err(_) => connection_open = false,
            },
        }
    }
}

/// Resolves on Ctrl+C. A failure to install the handler is logged and
/// treated as a stop request.
pub async fn shutdown_signal() {
    if let Err(e) = ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
    }
}

fn report_liveness(signal: LivenessSignal) {
    match signal {
        LivenessSignal::ConnectionDown { last_seen } => {
            warn!("Controller connection down (last heard at {last_seen} ms)")
        }
        LivenessSignal::ConnectionRestored { last_seen } => {
            info!("Controller connection restored (heard at {last_seen} ms)")
        }
    }
}

fn report_connection(state: ConnectionState) {
    match state.status {
        ConnectionStatus::Open => info!(
            "Connected to controller (connection {})",
            state.connection_id.unwrap_or_default()
        ),
        ConnectionStatus::Connecting => debug!(
            "Connecting to controller, {} failed attempts so far",
            state.retry_count
        ),
        ConnectionStatus::Closed | ConnectionStatus::Failed => warn!(
            "Controller connection {:?}, retry {}",
            state.status, state.retry_count
        ),
        ConnectionStatus::Idle => {}
    }
}
