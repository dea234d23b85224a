use crate::connection::{
    ConnectionEvent, ConnectionId, ConnectionState, ConnectionStatus, NoLink, OutboundLink,
};
use crate::error::send::SendError;
use crate::heartbeat::{HeartbeatMonitor, HeartbeatThresholds, LivenessSignal};
use crate::reconcile::{EntityKey, FieldKeys, FieldPatch, OperatingMode, Reconciler};
use crate::router::{FrameSink, MessageRouter};
use crate::session::snapshot::{EntityView, SessionSnapshot};
use crate::state::ControllerState;

use common::Timestamp;

use models::{
    AlarmMuteRequest, AlarmMuteSource, ControllerMessage, ExpectedLogEvent,
    FrontendDisplaySettingRequest, LogEventCode, LogEventType, ScreenStatusRequest,
    SystemSettingsRequest,
};

use log::{debug, info, trace, warn};

/// Synchronous core of a session.
///
/// Owns every piece of link state and applies connection events, clock ticks
/// and operator commands one at a time. The async runner in
/// [`crate::session`] drives it; tests drive it directly.
pub struct ControlSession {
    state: ControllerState,
    router: MessageRouter,
    heartbeat: HeartbeatMonitor,
    reconciler: Reconciler,
    link: Option<OutboundLink>,
    connection: ConnectionState,
    stale_frames: u64,
}

impl ControlSession {
    pub fn new(thresholds: HeartbeatThresholds, started_at: Timestamp) -> Self {
        Self {
            state: ControllerState::default(),
            router: MessageRouter::new(),
            heartbeat: HeartbeatMonitor::new(thresholds, started_at),
            reconciler: Reconciler::new(),
            link: None,
            connection: ConnectionState::default(),
            stale_frames: 0,
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn heartbeat(&self) -> &HeartbeatMonitor {
        &self.heartbeat
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Id of the connection whose frames are currently routed.
    pub fn open_connection(&self) -> Option<ConnectionId> {
        self.link.as_ref().map(OutboundLink::id)
    }

    pub fn is_live(&self, now: Timestamp) -> bool {
        self.heartbeat.is_live(now, self.state.last_seen)
    }

    /// Frames discarded because they belonged to a connection that was no
    /// longer the open one.
    pub fn stale_frames(&self) -> u64 {
        self.stale_frames
    }

    // ============================================
    // CONNECTION EVENTS
    // ============================================

    /// Apply one event from the connection manager. Returns any liveness
    /// signals raised as a consequence.
    pub fn handle_connection_event(
        &mut self,
        event: ConnectionEvent,
        now: Timestamp,
    ) -> Vec<LivenessSignal> {
        match event {
            ConnectionEvent::Connecting { id, attempt } => {
                self.link = None;
                self.connection = ConnectionState {
                    status: ConnectionStatus::Connecting,
                    retry_count: attempt.saturating_sub(1),
                    connection_id: Some(id),
                };
                Vec::new()
            }
            ConnectionEvent::Opened { id, link } => {
                info!("Session attached to connection {id}");
                self.link = Some(link);
                self.connection = ConnectionState {
                    status: ConnectionStatus::Open,
                    retry_count: 0,
                    connection_id: Some(id),
                };
                Vec::new()
            }
            ConnectionEvent::Received { id, payload } => {
                if self.open_connection() != Some(id) {
                    self.stale_frames += 1;
                    debug!("Discarding frame from stale connection {id}");
                    return Vec::new();
                }
                self.receive_frame(&payload, now)
            }
            ConnectionEvent::Closed { id } => {
                self.end_connection(id, ConnectionStatus::Closed);
                Vec::new()
            }
            ConnectionEvent::Errored { id, error } => {
                debug!("Connection {id} reported: {error}");
                self.end_connection(id, ConnectionStatus::Failed);
                Vec::new()
            }
        }
    }

    fn end_connection(&mut self, id: ConnectionId, status: ConnectionStatus) {
        if self.open_connection() == Some(id) {
            self.link = None;
        }
        if self.connection.connection_id == Some(id) {
            self.connection.status = status;
            self.connection.retry_count = self.connection.retry_count.saturating_add(1);
        }
    }

    /// Route one wire frame from the open connection.
    ///
    /// Undecodable frames are dropped. Liveness frames re-run the heartbeat
    /// evaluation immediately.
    pub fn receive_frame(&mut self, bytes: &[u8], now: Timestamp) -> Vec<LivenessSignal> {
        let Ok(message_type) = self.router.route_bytes(&mut self.state, bytes, now) else {
            return Vec::new();
        };

        self.reconciler.observe_current(message_type, &self.state);

        if message_type.is_liveness() {
            self.evaluate_liveness(now)
        } else {
            Vec::new()
        }
    }

    // ============================================
    // CLOCK
    // ============================================

    /// One tick of the shared clock: evaluate liveness, then report the next
    /// expected log event id to the controller.
    pub fn tick(&mut self, now: Timestamp) -> Vec<LivenessSignal> {
        let signals = self.evaluate_liveness(now);

        if self.link.is_some() {
            let expected = ExpectedLogEvent {
                id: self.state.event_log.expected_id(),
                session_id: self.state.event_log.session_id(),
            };
            let sink = sink_for(&self.link);
            if let Err(e) = self.router.send(expected.into(), sink) {
                trace!("Expected log event not sent: {e}");
            }
        }

        signals
    }

    fn evaluate_liveness(&mut self, now: Timestamp) -> Vec<LivenessSignal> {
        let fault_logged = self
            .state
            .event_log
            .has_active(LogEventCode::FrontendBackendConnectionDown);
        let signals = self
            .heartbeat
            .evaluate(now, self.state.last_seen, fault_logged);

        for signal in &signals {
            match *signal {
                LivenessSignal::ConnectionDown { last_seen } => {
                    let id = self.state.event_log.add_ephemeral(
                        LogEventCode::FrontendBackendConnectionDown,
                        LogEventType::System,
                        last_seen,
                    );
                    debug!("Logged connection-down fault as event {id}");
                }
                LivenessSignal::ConnectionRestored { .. } => {
                    let cleared = self
                        .state
                        .event_log
                        .deactivate_ephemeral(LogEventCode::FrontendBackendConnectionDown);
                    if cleared > 0 {
                        debug!("Cleared {cleared} connection-down fault(s)");
                    }
                }
            }
        }

        signals
    }

    // ============================================
    // OPERATOR COMMANDS
    // ============================================

    pub fn edit(&mut self, patch: FieldPatch) {
        self.reconciler.edit_draft(patch, &self.state);
    }

    pub fn unsaved_keys(&self, key: EntityKey) -> FieldKeys {
        self.reconciler.unsaved_keys(key, &self.state)
    }

    pub fn has_unsaved_changes(&self, key: EntityKey) -> bool {
        self.reconciler.has_unsaved_changes(key, &self.state)
    }

    /// # Errors
    ///
    /// Returns [`SendError`] if the request could not be handed to the connection.
    pub fn confirm(&mut self, key: EntityKey) -> Result<bool, SendError> {
        let sink = sink_for(&self.link);
        self.reconciler
            .confirm(key, &self.state, &mut self.router, sink)
    }

    pub fn discard(&mut self, key: EntityKey) -> bool {
        self.reconciler.discard(key, &self.state)
    }

    pub fn apply_draft_to_standby(&mut self, key: EntityKey) {
        self.reconciler.apply_draft_to_standby(key);
    }

    pub fn mode(&self) -> OperatingMode {
        self.reconciler.mode()
    }

    /// # Errors
    ///
    /// Returns [`SendError`] if the start request could not be sent.
    pub fn activate(&mut self) -> Result<(), SendError> {
        let sink = sink_for(&self.link);
        self.reconciler
            .activate(&self.state, &mut self.router, sink)
    }

    /// # Errors
    ///
    /// Returns [`SendError`] if the stop request could not be sent.
    pub fn deactivate(&mut self) -> Result<(), SendError> {
        let sink = sink_for(&self.link);
        self.reconciler
            .deactivate(&self.state, &mut self.router, sink)
    }

    /// # Errors
    ///
    /// Returns [`SendError`] if the request could not be sent.
    pub fn set_screen_lock(&mut self, lock: bool) -> Result<(), SendError> {
        let request = ScreenStatusRequest { lock: Some(lock) };
        self.send(request.into())?;
        info!("Requested screen {}", if lock { "lock" } else { "unlock" });
        Ok(())
    }

    /// Ask the controller to mute or unmute alarms.
    ///
    /// The sequence number advances past the controller's last reported one
    /// so the controller can tell a new request from a repeated one.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] if the request could not be sent.
    pub fn set_alarm_mute(&mut self, active: bool) -> Result<(), SendError> {
        let seq_num = self
            .state
            .alarm_mute
            .as_ref()
            .and_then(|mute| mute.seq_num)
            .unwrap_or(0)
            .wrapping_add(1);
        let request = AlarmMuteRequest {
            active: Some(active),
            seq_num: Some(seq_num),
            source: Some(AlarmMuteSource::UserSoftware as i32),
        };
        self.send(request.into())?;
        info!("Requested alarm mute active={active} (seq {seq_num})");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SendError`] if the request could not be sent.
    pub fn request_system_settings(
        &mut self,
        mut request: SystemSettingsRequest,
    ) -> Result<(), SendError> {
        if request.seq_num.is_none() {
            let last = self
                .state
                .system_settings
                .as_ref()
                .and_then(|settings| settings.seq_num)
                .unwrap_or(0);
            request.seq_num = Some(last.wrapping_add(1));
        }
        self.send(request.into())
    }

    /// # Errors
    ///
    /// Returns [`SendError`] if the request could not be sent.
    pub fn request_display_settings(
        &mut self,
        request: FrontendDisplaySettingRequest,
    ) -> Result<(), SendError> {
        self.send(request.into())
    }

    fn send(&mut self, message: ControllerMessage) -> Result<(), SendError> {
        let message_type = message.message_type();
        let sink = sink_for(&self.link);
        self.router.send(message, sink).inspect_err(|e| {
            warn!("{message_type} not sent: {e}");
        })
    }

    // ============================================
    // SNAPSHOT
    // ============================================

    pub fn snapshot(&self, now: Timestamp) -> SessionSnapshot {
        let mode = self.reconciler.mode();
        SessionSnapshot {
            taken_at: now,
            connection: self.connection,
            is_live: self.is_live(now),
            connection_down: self.heartbeat.is_down(),
            mode,
            parameters: EntityView::new(
                self.reconciler.parameters(),
                self.state.current_parameters(),
                mode,
            ),
            alarm_limits: EntityView::new(
                self.reconciler.alarm_limits(),
                self.state.current_alarm_limits(),
                mode,
            ),
            router: self.router.stats(),
            stale_frames: self.stale_frames,
            state: self.state.clone(),
        }
    }
}

fn sink_for(link: &Option<OutboundLink>) -> &dyn FrameSink {
    match link {
        Some(link) => link,
        None => &NoLink,
    }
}
