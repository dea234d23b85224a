use crate::reconcile::EntityKey;

use models::{AlarmLimitsRequest, ControllerMessage, ParametersRequest};

use std::collections::BTreeSet;
use std::fmt::Debug;

/// Names of editable fields.
pub type FieldKeys = BTreeSet<&'static str>;

/// A request schema whose operator-editable fields can be compared and patched.
///
/// Bookkeeping fields such as `time` and `ventilating` are not editable and
/// never show up as unsaved.
pub trait EditableSchema: Clone + Default + PartialEq + Debug {
    const ENTITY: EntityKey;

    /// Editable fields whose values differ between `self` and `other`.
    fn differing_fields(&self, other: &Self) -> FieldKeys;

    /// Overwrite editable fields that are present in `patch`.
    fn apply_patch(&mut self, patch: &Self);

    fn into_message(self) -> ControllerMessage;
}

macro_rules! editable_schema {
    ($schema:ty, $entity:expr, [$($field:ident),+ $(,)?]) => {
        impl EditableSchema for $schema {
            const ENTITY: EntityKey = $entity;

            fn differing_fields(&self, other: &Self) -> FieldKeys {
                let mut keys = FieldKeys::new();
                $(
                    if self.$field != other.$field {
                        keys.insert(stringify!($field));
                    }
                )+
                keys
            }

            fn apply_patch(&mut self, patch: &Self) {
                $(
                    if patch.$field.is_some() {
                        self.$field = patch.$field.clone();
                    }
                )+
            }

            fn into_message(self) -> ControllerMessage {
                ControllerMessage::from(self)
            }
        }
    };
}

editable_schema!(
    ParametersRequest,
    EntityKey::Parameters,
    [mode, fio2, flow, pip, peep, vt, rr, ie]
);

editable_schema!(
    AlarmLimitsRequest,
    EntityKey::AlarmLimits,
    [fio2, flow, spo2, hr, rr, pip, peep, ip_above_peep, insp_time, paw, mve, tv, etco2, apnea]
);
