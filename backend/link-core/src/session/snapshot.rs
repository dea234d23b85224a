use crate::connection::ConnectionState;
use crate::reconcile::{EditableSchema, EntityTriple, FieldKeys, OperatingMode};
use crate::router::RouterStats;
use crate::state::ControllerState;

use common::Timestamp;

use models::{AlarmLimitsRequest, ParametersRequest};

use serde::Serialize;

/// Current/Draft/Standby of one entity, resolved for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityView<T> {
    pub current: T,
    pub draft: T,
    pub standby: T,
    pub pending: Option<T>,
    pub unsaved_keys: FieldKeys,
    pub staged_keys: FieldKeys,
    pub conflicting_keys: FieldKeys,
}

impl<T: EditableSchema> EntityView<T> {
    pub(crate) fn new(triple: &EntityTriple<T>, current: T, mode: OperatingMode) -> Self {
        Self {
            draft: triple.draft(&current),
            standby: triple.standby(&current),
            pending: triple.pending().cloned(),
            unsaved_keys: triple.unsaved_keys(&current, mode),
            staged_keys: triple.staged_keys(&current),
            conflicting_keys: triple.conflicting_keys().clone(),
            current,
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.unsaved_keys.is_empty()
    }
}

/// Read-only view of a session, published after every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub taken_at: Timestamp,
    pub connection: ConnectionState,
    /// Last liveness frame is younger than the down threshold.
    pub is_live: bool,
    /// Latched ConnectionDown without a later ConnectionRestored.
    pub connection_down: bool,
    pub mode: OperatingMode,
    pub parameters: EntityView<ParametersRequest>,
    pub alarm_limits: EntityView<AlarmLimitsRequest>,
    pub router: RouterStats,
    pub stale_frames: u64,
    pub state: ControllerState,
}
