use crate::reconcile::OperatingMode;
use crate::reconcile::schema::{EditableSchema, FieldKeys};

use serde::Serialize;

/// Disagreeing current pushes tolerated before an outstanding request is
/// declared conflicting. The controller pushes its state continuously, so the
/// first push after a request usually predates it.
pub const ACKNOWLEDGE_WINDOW: u32 = 3;

/// What an inbound current value meant for an outstanding request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgement {
    /// No request was outstanding.
    Idle,
    /// The controller now reports exactly what was requested.
    Applied,
    /// Still disagreeing, but within the acknowledgement window.
    Awaiting { pushes: u32 },
    /// The window ran out; the controller reports different values for these fields.
    Conflict(FieldKeys),
}

/// Draft/standby bookkeeping for one editable entity.
///
/// `current` is not stored here; callers pass the router-owned value in.
/// A `None` draft or standby tracks `current`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityTriple<T> {
    draft: Option<T>,
    standby: Option<T>,
    pending: Option<T>,
    /// Disagreeing pushes seen since `pending` was sent.
    pending_pushes: u32,
    conflicts: FieldKeys,
}

impl<T: EditableSchema> EntityTriple<T> {
    pub fn draft(&self, current: &T) -> T {
        self.draft.clone().unwrap_or_else(|| current.clone())
    }

    pub fn standby(&self, current: &T) -> T {
        self.standby.clone().unwrap_or_else(|| current.clone())
    }

    /// Request sent but not yet reflected by the controller.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    pub fn conflicting_keys(&self) -> &FieldKeys {
        &self.conflicts
    }

    pub fn unsaved_keys(&self, current: &T, mode: OperatingMode) -> FieldKeys {
        match (mode, &self.draft) {
            (OperatingMode::Active, Some(draft)) => draft.differing_fields(current),
            _ => FieldKeys::new(),
        }
    }

    /// Fields where standby has been staged away from current.
    pub fn staged_keys(&self, current: &T) -> FieldKeys {
        self.standby
            .as_ref()
            .map(|standby| standby.differing_fields(current))
            .unwrap_or_default()
    }

    pub(crate) fn edit(&mut self, patch: &T, current: &T, mode: OperatingMode) {
        let target = match mode {
            OperatingMode::Active => &mut self.draft,
            OperatingMode::Standby => &mut self.standby,
        };
        target
            .get_or_insert_with(|| current.clone())
            .apply_patch(patch);
        self.conflicts.clear();
    }

    /// The draft to send, or `None` when confirming would be a no-op.
    pub(crate) fn confirmable(&self, current: &T, mode: OperatingMode) -> Option<T> {
        if self.unsaved_keys(current, mode).is_empty() {
            return None;
        }
        match (&self.draft, &self.pending) {
            (Some(draft), Some(pending)) if draft == pending => None,
            (draft, _) => draft.clone(),
        }
    }

    /// Record a request that reached the transport.
    pub(crate) fn mark_sent(&mut self, sent: T) {
        self.draft = Some(sent.clone());
        self.standby = Some(sent.clone());
        self.pending = Some(sent);
        self.pending_pushes = 0;
        self.conflicts.clear();
    }

    /// Reset toward current. Returns false when there was nothing to discard.
    pub(crate) fn discard(&mut self, current: &T, mode: OperatingMode) -> bool {
        let dirty = match mode {
            OperatingMode::Active => !self.unsaved_keys(current, mode).is_empty(),
            OperatingMode::Standby => !self.staged_keys(current).is_empty(),
        };
        if !dirty {
            return false;
        }

        if mode == OperatingMode::Active {
            self.draft = None;
            self.pending = None;
            self.pending_pushes = 0;
        }
        self.standby = None;
        self.conflicts.clear();
        true
    }

    pub(crate) fn apply_draft_to_standby(&mut self) {
        self.standby = self.draft.clone();
    }

    pub(crate) fn enter_active(&mut self) {
        self.draft = self.standby.clone();
    }

    pub(crate) fn enter_standby(&mut self) {
        self.draft = None;
    }

    /// Reconcile against a freshly updated current value.
    ///
    /// An outstanding request is acknowledged by the first push that matches
    /// it. A request still unmatched after [`ACKNOWLEDGE_WINDOW`] pushes is
    /// settled as a conflict: the controller's value stands and the
    /// disagreeing fields are flagged until the operator's value and current
    /// agree again, or the operator edits, confirms or discards.
    pub(crate) fn observe_current(&mut self, current: &T) -> Acknowledgement {
        let outcome = match self.pending.take() {
            None => Acknowledgement::Idle,
            Some(pending) => {
                let disagreeing = pending.differing_fields(current);
                if disagreeing.is_empty() {
                    self.pending_pushes = 0;
                    self.conflicts.clear();
                    Acknowledgement::Applied
                } else {
                    self.pending_pushes += 1;
                    if self.pending_pushes < ACKNOWLEDGE_WINDOW {
                        self.pending = Some(pending);
                        Acknowledgement::Awaiting {
                            pushes: self.pending_pushes,
                        }
                    } else {
                        self.pending_pushes = 0;
                        self.conflicts = disagreeing.clone();
                        Acknowledgement::Conflict(disagreeing)
                    }
                }
            }
        };

        for slot in [&mut self.draft, &mut self.standby] {
            if slot
                .as_ref()
                .is_some_and(|value| value.differing_fields(current).is_empty())
            {
                *slot = None;
            }
        }

        let still_differing = self
            .draft(current)
            .differing_fields(current)
            .into_iter()
            .chain(self.standby(current).differing_fields(current))
            .collect::<FieldKeys>();
        self.conflicts.retain(|key| still_differing.contains(key));

        outcome
    }
}
