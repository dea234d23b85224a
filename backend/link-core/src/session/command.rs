use crate::error::send::SendError;
use crate::reconcile::{EntityKey, FieldPatch};
use crate::session::control::ControlSession;

use models::{FrontendDisplaySettingRequest, SystemSettingsRequest};

use tokio::sync::oneshot;

type Reply<T> = oneshot::Sender<T>;

/// Operator intents forwarded to the session task.
///
/// Each command carries a reply channel; the session applies commands one
/// at a time and answers after the state change is complete.
#[derive(Debug)]
pub enum SessionCommand {
    Edit {
        patch: FieldPatch,
        reply: Reply<()>,
    },
    Confirm {
        key: EntityKey,
        reply: Reply<Result<bool, SendError>>,
    },
    Discard {
        key: EntityKey,
        reply: Reply<bool>,
    },
    ApplyDraftToStandby {
        key: EntityKey,
        reply: Reply<()>,
    },
    Activate {
        reply: Reply<Result<(), SendError>>,
    },
    Deactivate {
        reply: Reply<Result<(), SendError>>,
    },
    SetScreenLock {
        lock: bool,
        reply: Reply<Result<(), SendError>>,
    },
    SetAlarmMute {
        active: bool,
        reply: Reply<Result<(), SendError>>,
    },
    RequestSystemSettings {
        request: SystemSettingsRequest,
        reply: Reply<Result<(), SendError>>,
    },
    RequestDisplaySettings {
        request: FrontendDisplaySettingRequest,
        reply: Reply<Result<(), SendError>>,
    },
}

/// Delivers a command's result to its caller.
pub(crate) type Answer = Box<dyn FnOnce() + Send>;

fn answer<T: Send + 'static>(reply: Reply<T>, value: T) -> Answer {
    Box::new(move || {
        // A caller that stopped waiting is not an error; the change stands.
        let _ = reply.send(value);
    })
}

impl SessionCommand {
    /// Apply to `session`. The returned [`Answer`] is called once the new
    /// snapshot is published, so a caller never reads state older than its
    /// own command.
    pub(crate) fn execute(self, session: &mut ControlSession) -> Answer {
        match self {
            SessionCommand::Edit { patch, reply } => {
                session.edit(patch);
                answer(reply, ())
            }
            SessionCommand::Confirm { key, reply } => answer(reply, session.confirm(key)),
            SessionCommand::Discard { key, reply } => answer(reply, session.discard(key)),
            SessionCommand::ApplyDraftToStandby { key, reply } => {
                session.apply_draft_to_standby(key);
                answer(reply, ())
            }
            SessionCommand::Activate { reply } => answer(reply, session.activate()),
            SessionCommand::Deactivate { reply } => answer(reply, session.deactivate()),
            SessionCommand::SetScreenLock { lock, reply } => {
                answer(reply, session.set_screen_lock(lock))
            }
            SessionCommand::SetAlarmMute { active, reply } => {
                answer(reply, session.set_alarm_mute(active))
            }
            SessionCommand::RequestSystemSettings { request, reply } => {
                answer(reply, session.request_system_settings(request))
            }
            SessionCommand::RequestDisplaySettings { request, reply } => {
                answer(reply, session.request_display_settings(request))
            }
        }
    }
}
