//! Operator edits against controller-acknowledged values.
//!
//! Each editable entity keeps a Current/Draft/Standby triple:
//!
//! - **Current** lives in [`ControllerState`] and is written only by the router
//! - **Draft** holds unconfirmed edits while the device is active
//! - **Standby** holds staged values while the device is not operating
//!
//! This module is the only writer of Draft and Standby.

mod schema;
mod triple;

pub use schema::{EditableSchema, FieldKeys};
pub use triple::{ACKNOWLEDGE_WINDOW, Acknowledgement, EntityTriple};

use crate::error::send::SendError;
use crate::router::{FrameSink, MessageRouter};
use crate::state::ControllerState;

use models::{AlarmLimitsRequest, MessageType, ParametersRequest};

use std::fmt::{Display, Formatter, Result as FormatResult};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    Parameters,
    AlarmLimits,
}

impl Display for EntityKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self {
            EntityKey::Parameters => write!(formatter, "parameters"),
            EntityKey::AlarmLimits => write!(formatter, "alarm limits"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatingMode {
    /// Not operating. Edits are staged in Standby.
    #[default]
    Standby,
    /// Operating. Edits go to Draft and need confirmation.
    Active,
}

/// A sparse edit: present fields overwrite, absent fields are untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch {
    Parameters(ParametersRequest),
    AlarmLimits(AlarmLimitsRequest),
}

impl FieldPatch {
    pub fn entity(&self) -> EntityKey {
        match self {
            FieldPatch::Parameters(_) => EntityKey::Parameters,
            FieldPatch::AlarmLimits(_) => EntityKey::AlarmLimits,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciler {
    mode: OperatingMode,
    parameters: EntityTriple<ParametersRequest>,
    alarm_limits: EntityTriple<AlarmLimitsRequest>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn parameters(&self) -> &EntityTriple<ParametersRequest> {
        &self.parameters
    }

    pub fn alarm_limits(&self) -> &EntityTriple<AlarmLimitsRequest> {
        &self.alarm_limits
    }

    pub fn edit_draft(&mut self, patch: FieldPatch, state: &ControllerState) {
        debug!("Editing {} in {:?} mode", patch.entity(), self.mode);
        match patch {
            FieldPatch::Parameters(patch) => {
                self.parameters
                    .edit(&patch, &state.current_parameters(), self.mode)
            }
            FieldPatch::AlarmLimits(patch) => {
                self.alarm_limits
                    .edit(&patch, &state.current_alarm_limits(), self.mode)
            }
        }
    }

    pub fn unsaved_keys(&self, key: EntityKey, state: &ControllerState) -> FieldKeys {
        match key {
            EntityKey::Parameters => self
                .parameters
                .unsaved_keys(&state.current_parameters(), self.mode),
            EntityKey::AlarmLimits => self
                .alarm_limits
                .unsaved_keys(&state.current_alarm_limits(), self.mode),
        }
    }

    pub fn has_unsaved_changes(&self, key: EntityKey, state: &ControllerState) -> bool {
        !self.unsaved_keys(key, state).is_empty()
    }

    pub fn staged_keys(&self, key: EntityKey, state: &ControllerState) -> FieldKeys {
        match key {
            EntityKey::Parameters => self.parameters.staged_keys(&state.current_parameters()),
            EntityKey::AlarmLimits => self.alarm_limits.staged_keys(&state.current_alarm_limits()),
        }
    }

    pub fn conflicting_keys(&self, key: EntityKey) -> FieldKeys {
        match key {
            EntityKey::Parameters => self.parameters.conflicting_keys().clone(),
            EntityKey::AlarmLimits => self.alarm_limits.conflicting_keys().clone(),
        }
    }

    /// Send the draft as a request and copy it into standby.
    ///
    /// Returns `Ok(false)` without sending when nothing is unsaved or the same
    /// draft is already awaiting acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns the [`SendError`] from the router; the triple is left unchanged.
    pub fn confirm(
        &mut self,
        key: EntityKey,
        state: &ControllerState,
        router: &mut MessageRouter,
        sink: &dyn FrameSink,
    ) -> Result<bool, SendError> {
        match key {
            EntityKey::Parameters => confirm_entity(
                &mut self.parameters,
                &state.current_parameters(),
                self.mode,
                router,
                sink,
            ),
            EntityKey::AlarmLimits => confirm_entity(
                &mut self.alarm_limits,
                &state.current_alarm_limits(),
                self.mode,
                router,
                sink,
            ),
        }
    }

    /// Reset draft and standby from current. Returns false when nothing changed.
    pub fn discard(&mut self, key: EntityKey, state: &ControllerState) -> bool {
        let discarded = match key {
            EntityKey::Parameters => self
                .parameters
                .discard(&state.current_parameters(), self.mode),
            EntityKey::AlarmLimits => self
                .alarm_limits
                .discard(&state.current_alarm_limits(), self.mode),
        };
        if discarded {
            info!("Discarded {key} edits");
        }
        discarded
    }

    /// Copy the draft into standby. Standby mode has no draft, so this is a no-op there.
    pub fn apply_draft_to_standby(&mut self, key: EntityKey) {
        if self.mode == OperatingMode::Standby {
            debug!("No draft to apply to standby for {key} in Standby mode");
            return;
        }
        match key {
            EntityKey::Parameters => self.parameters.apply_draft_to_standby(),
            EntityKey::AlarmLimits => self.alarm_limits.apply_draft_to_standby(),
        }
    }

    /// Switch mode without talking to the controller.
    ///
    /// Entering Active seeds each draft from its standby snapshot; entering
    /// Standby drops the drafts.
    pub fn set_mode(&mut self, mode: OperatingMode) {
        if mode == self.mode {
            return;
        }
        match mode {
            OperatingMode::Active => {
                self.parameters.enter_active();
                self.alarm_limits.enter_active();
            }
            OperatingMode::Standby => {
                self.parameters.enter_standby();
                self.alarm_limits.enter_standby();
            }
        }
        info!("Operating mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    /// Start operating with the staged standby values.
    ///
    /// Sends the standby parameters with `ventilating` set, then confirms any
    /// staged alarm limits. Nothing changes if the parameters request cannot
    /// be sent.
    pub fn activate(
        &mut self,
        state: &ControllerState,
        router: &mut MessageRouter,
        sink: &dyn FrameSink,
    ) -> Result<(), SendError> {
        if self.mode == OperatingMode::Active {
            return Ok(());
        }

        let mut request = self.parameters.standby(&state.current_parameters());
        request.ventilating = Some(true);
        router.send(request.clone().into(), sink)?;

        self.set_mode(OperatingMode::Active);
        self.parameters.mark_sent(request);

        if let Err(e) = self.confirm(EntityKey::AlarmLimits, state, router, sink) {
            warn!("Activated, but staged alarm limits were not sent: {e}");
            return Err(e);
        }
        Ok(())
    }

    /// Stop operating. Sends the current parameters with `ventilating` cleared.
    pub fn deactivate(
        &mut self,
        state: &ControllerState,
        router: &mut MessageRouter,
        sink: &dyn FrameSink,
    ) -> Result<(), SendError> {
        if self.mode == OperatingMode::Standby {
            return Ok(());
        }

        let mut request = state.current_parameters();
        request.ventilating = Some(false);
        router.send(request.into(), sink)?;

        self.set_mode(OperatingMode::Standby);
        Ok(())
    }

    /// Settle outstanding requests after the router updated a current slice.
    pub fn observe_current(&mut self, message_type: MessageType, state: &ControllerState) {
        let (key, outcome) = match message_type {
            MessageType::Parameters => (
                EntityKey::Parameters,
                self.parameters.observe_current(&state.current_parameters()),
            ),
            MessageType::AlarmLimits => (
                EntityKey::AlarmLimits,
                self.alarm_limits
                    .observe_current(&state.current_alarm_limits()),
            ),
            _ => return,
        };

        match outcome {
            Acknowledgement::Idle => {}
            Acknowledgement::Applied => info!("Controller applied {key} request"),
            Acknowledgement::Awaiting { pushes } => {
                debug!("{key} request not reflected yet after {pushes} pushes")
            }
            Acknowledgement::Conflict(keys) => {
                warn!("Controller kept different {key} values for {keys:?}")
            }
        }
    }
}

fn confirm_entity<T: EditableSchema>(
    triple: &mut EntityTriple<T>,
    current: &T,
    mode: OperatingMode,
    router: &mut MessageRouter,
    sink: &dyn FrameSink,
) -> Result<bool, SendError> {
    let Some(draft) = triple.confirmable(current, mode) else {
        debug!("Nothing to confirm for {}", T::ENTITY);
        return Ok(false);
    };

    router.send(draft.clone().into_message(), sink)?;
    info!(
        "Confirmed {} request for {:?}",
        T::ENTITY,
        draft.differing_fields(current)
    );
    triple.mark_sent(draft);
    Ok(true)
}
