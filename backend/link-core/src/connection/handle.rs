use crate::connection::event::{ConnectionState, ConnectionStatus};

use log::{info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owner of a running connection manager.
///
/// Dropping the handle stops the manager as well; [`shutdown`](Self::shutdown)
/// additionally waits until the socket has been released.
pub struct ConnectionHandle {
    shutdown: watch::Sender<bool>,
    state: watch::Receiver<ConnectionState>,
    task: JoinHandle<()>,
}

impl ConnectionHandle {
    pub(crate) fn new(
        shutdown: watch::Sender<bool>,
        state: watch::Receiver<ConnectionState>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            shutdown,
            state,
            task,
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.borrow().status
    }

    pub fn retry_count(&self) -> u32 {
        self.state.borrow().retry_count
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Stop the manager and wait for the connection task to exit.
    pub async fn shutdown(self) {
        self.shutdown.send_replace(true);
        match self.task.await {
            Ok(()) => info!("Connection manager stopped"),
            Err(e) => warn!("Connection manager task ended abnormally: {e}"),
        }
    }
}
