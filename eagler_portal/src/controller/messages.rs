//! Controller actor message types.

use crate::{
    browser::FullscreenError,
    fullscreen::RequestOrigin,
    session::{LaunchOutcome, PhaseKind, SessionResult},
};
use serde::Serialize;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Messages that can be sent to a SessionController
#[derive(Debug)]
pub enum ControllerMessage {
    /// Change the selected version (idle only)
    SelectVersion {
        version_id: String,
        response: oneshot::Sender<SessionResult<()>>,
    },

    /// Launch the selected version
    Launch {
        response: oneshot::Sender<SessionResult<LaunchOutcome>>,
    },

    /// In-view fullscreen button
    ToggleFullscreen {
        response: oneshot::Sender<ToggleResponse>,
    },

    /// Read the current state
    GetSnapshot {
        response: oneshot::Sender<SessionSnapshot>,
    },

    /// Tear the view down and stop the actor
    Unmount { response: oneshot::Sender<()> },
}

/// Events the actor posts to itself
#[derive(Debug)]
pub(crate) enum InternalEvent {
    /// Next scheduling turn after a launch
    Activate,

    /// A fullscreen request finished, successfully or not
    RequestSettled {
        origin: RequestOrigin,
        result: Result<(), FullscreenError>,
    },

    /// An exit call returned
    ExitSettled,
}

/// Response to a fullscreen toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleResponse {
    /// Enter request issued; confirmation arrives later
    Requested,
    /// Exit request issued
    ExitRequested,
    /// A request is already pending
    AlreadyPending,
    /// No active session to toggle
    NotActive,
}

/// Point-in-time view of the controller state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: PhaseKind,
    pub selected_version_id: String,
    pub active_resource_url: Option<String>,
    pub is_fullscreen: bool,
    pub request_pending: bool,
    pub deferred_request_scheduled: bool,
    pub key_listener_registered: bool,
}
