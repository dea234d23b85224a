//! Session runtime using actor pattern.
//!
//! One task owns the whole link: controller state, heartbeat monitor,
//! reconciler and the open connection. It waits on four sources and handles
//! whichever is ready first:
//!
//! - Shutdown (always checked first)
//! - Connection events from the [`ConnectionManager`]
//! - Ticks of the shared clock
//! - Operator commands from any [`SessionHandle`]
//!
//! After each step a fresh [`SessionSnapshot`] is published behind an
//! `Arc<RwLock<_>>` so readers never wait on the session task.

mod command;
mod control;
mod snapshot;

pub use command::SessionCommand;
pub use control::ControlSession;
pub use snapshot::{EntityView, SessionSnapshot};

use crate::config::LinkConfig;
use crate::connection::{
    ConnectionEvent, ConnectionHandle, ConnectionManager, ConnectionSettings, ConnectionState,
};
use crate::error::session::SessionError;
use crate::heartbeat::{HeartbeatThresholds, LivenessSignal};
use crate::reconcile::{EntityKey, FieldPatch};

use common::{Clock, ErrorLocation};

use models::{FrontendDisplaySettingRequest, SystemSettingsRequest};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::spawn as TokioSpawn;
use tokio::sync::{Mutex, RwLock, broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use url::Url;

const COMMAND_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub connection: ConnectionSettings,
    pub thresholds: HeartbeatThresholds,
    pub clock_tick: Duration,
}

impl From<&LinkConfig> for SessionSettings {
    fn from(config: &LinkConfig) -> Self {
        Self {
            connection: ConnectionSettings::from(config),
            thresholds: HeartbeatThresholds::from(&config.liveness),
            clock_tick: config.clock_tick(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings::from(&LinkConfig::default())
    }
}

/// Cloneable front door to a running session.
///
/// All clones talk to the same session task. Commands are serialized by the
/// task; reads come from the last published snapshot.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    liveness: broadcast::Sender<LivenessSignal>,
    connection: watch::Receiver<ConnectionState>,
    shutdown: Arc<watch::Sender<bool>>,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionHandle {
    /// Start a connection manager for `url` and a session task on top of it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(url: Url, settings: SessionSettings, clock: Arc<dyn Clock>) -> Self {
        let (connection, events) = ConnectionManager::start(url, settings.connection);
        let session = ControlSession::new(settings.thresholds, clock.now());

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let snapshot = Arc::new(RwLock::new(session.snapshot(clock.now())));
        let liveness = session.heartbeat().signal_sender();
        let connection_state = connection.subscribe_state();

        let task = TokioSpawn(run_session(
            session,
            connection,
            events,
            command_rx,
            Arc::clone(&snapshot),
            clock,
            settings.clock_tick,
            shutdown_rx,
        ));
        info!("Session task spawned");

        Self {
            commands: command_tx,
            snapshot,
            liveness,
            connection: connection_state,
            shutdown: Arc::new(shutdown_tx),
            task: Arc::new(Mutex::new(Some(task))),
        }
    }

    /// Last published snapshot (read-only).
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Receive every liveness signal raised from now on.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe_liveness(&self) -> broadcast::Receiver<LivenessSignal> {
        self.liveness.subscribe()
    }

    /// Connection status as published by the connection manager.
    pub fn subscribe_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.clone()
    }

    pub async fn edit(&self, patch: FieldPatch) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::Edit { patch, reply })
            .await
    }

    /// Send the draft of `key` to the controller.
    ///
    /// Returns `Ok(false)` when there was nothing to send.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Send`] - no open connection or full outbound buffer
    /// - [`SessionError::Unavailable`] - the session task has stopped
    pub async fn confirm(&self, key: EntityKey) -> Result<bool, SessionError> {
        Ok(self
            .request(|reply| SessionCommand::Confirm { key, reply })
            .await??)
    }

    pub async fn discard(&self, key: EntityKey) -> Result<bool, SessionError> {
        self.request(|reply| SessionCommand::Discard { key, reply })
            .await
    }

    pub async fn apply_draft_to_standby(&self, key: EntityKey) -> Result<(), SessionError> {
        self.request(|reply| SessionCommand::ApplyDraftToStandby { key, reply })
            .await
    }

    pub async fn activate(&self) -> Result<(), SessionError> {
        Ok(self
            .request(|reply| SessionCommand::Activate { reply })
            .await??)
    }

    pub async fn deactivate(&self) -> Result<(), SessionError> {
        Ok(self
            .request(|reply| SessionCommand::Deactivate { reply })
            .await??)
    }

    pub async fn set_screen_lock(&self, lock: bool) -> Result<(), SessionError> {
        Ok(self
            .request(|reply| SessionCommand::SetScreenLock { lock, reply })
            .await??)
    }

    pub async fn set_alarm_mute(&self, active: bool) -> Result<(), SessionError> {
        Ok(self
            .request(|reply| SessionCommand::SetAlarmMute { active, reply })
            .await??)
    }

    pub async fn request_system_settings(
        &self,
        request: SystemSettingsRequest,
    ) -> Result<(), SessionError> {
        Ok(self
            .request(|reply| SessionCommand::RequestSystemSettings { request, reply })
            .await??)
    }

    pub async fn request_display_settings(
        &self,
        request: FrontendDisplaySettingRequest,
    ) -> Result<(), SessionError> {
        Ok(self
            .request(|reply| SessionCommand::RequestDisplaySettings { request, reply })
            .await??)
    }

    /// Stop the session and its connection, then wait for both to exit.
    ///
    /// Safe to call from several clones; only the first call waits.
    pub async fn shutdown(&self) {
        self.shutdown.send_replace(true);

        let task = self.task.lock().await.take();
        if let Some(task) = task {
            match task.await {
                Ok(()) => info!("Session stopped"),
                Err(e) => warn!("Session task ended abnormally: {e}"),
            }
        }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> SessionCommand,
    ) -> Result<R, SessionError> {
        let (reply, response) = oneshot::channel();

        self.commands
            .send(build(reply))
            .await
            .map_err(|e| SessionError::Unavailable {
                message: format!("Session task stopped: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        response.await.map_err(|e| SessionError::Unavailable {
            message: format!("Session task dropped the request: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// The session task.
///
/// Runs until shutdown is requested or every handle has been dropped, then
/// shuts the connection manager down before returning.
#[allow(clippy::too_many_arguments)]
async fn run_session(
    mut session: ControlSession,
    connection: ConnectionHandle,
    mut events: mpsc::Receiver<ConnectionEvent>,
    mut commands: mpsc::Receiver<SessionCommand>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    clock: Arc<dyn Clock>,
    clock_tick: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Session started");

    let mut ticker = interval(clock_tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let mut answer = None;

        tokio::select! {
            biased;

            _ = shutdown.changed() => break,

            Some(event) = events.recv() => {
                session.handle_connection_event(event, clock.now());
            }

            _ = ticker.tick() => {
                session.tick(clock.now());
            }

            command = commands.recv() => match command {
                Some(command) => answer = Some(command.execute(&mut session)),
                None => {
                    info!("All session handles dropped");
                    break;
                }
            },
        }

        *snapshot.write().await = session.snapshot(clock.now());

        if let Some(answer) = answer {
            answer();
        }
    }

    connection.shutdown().await;
    info!("Session loop exited");
}
