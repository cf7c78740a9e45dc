//! Fullscreen coordinator.
//!
//! Keeps two channels apart:
//! - the outcome of our own request (accepted or rejected), and
//! - the browser's change notification, which is the only thing allowed to
//!   flip [`FullscreenCoordinator::is_fullscreen`].
//!
//! The coordinator does no I/O. The controller actor performs the calls it
//! asks for and feeds the results back in.

use crate::{
    browser::FullscreenError,
    notify::Notification,
};

/// Who asked for fullscreen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Automatic request scheduled after launch
    Deferred,
    /// User pressed the in-view toggle
    Manual,
}

/// What a toggle press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Issue a new enter request
    Request,
    /// Issue an exit request
    Exit,
    /// A request is already pending; do nothing
    AlreadyPending,
}

#[derive(Debug, Clone, Default)]
pub struct FullscreenCoordinator {
    is_fullscreen: bool,
    in_flight: Option<RequestOrigin>,
    exit_pending: bool,
}

impl FullscreenCoordinator {
    /// Start from the browser's ambient fullscreen condition at mount
    pub fn new(is_fullscreen: bool) -> Self {
        Self {
            is_fullscreen,
            in_flight: None,
            exit_pending: false,
        }
    }

    /// Confirmed fullscreen state
    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn in_flight(&self) -> Option<RequestOrigin> {
        self.in_flight
    }

    /// An exit was issued and its change notification has not arrived yet
    pub fn exit_pending(&self) -> bool {
        self.exit_pending
    }

    /// Claim the single request slot. `false` if a request is already pending.
    pub fn begin_request(&mut self, origin: RequestOrigin) -> bool {
        if let Some(pending) = self.in_flight {
            log::debug!(
                "Fullscreen request ({:?}) skipped: {:?} request still pending",
                origin,
                pending
            );
            return false;
        }
        self.in_flight = Some(origin);
        true
    }

    /// Whether the deferred post-launch request still has work to do
    pub fn deferred_request_needed(&self) -> bool {
        !self.is_fullscreen && self.in_flight.is_none()
    }

    /// Decide what the manual toggle does, claiming the request slot if needed
    pub fn toggle(&mut self) -> ToggleAction {
        if self.exit_pending {
            ToggleAction::AlreadyPending
        } else if self.is_fullscreen {
            self.exit_pending = true;
            ToggleAction::Exit
        } else if self.begin_request(RequestOrigin::Manual) {
            ToggleAction::Request
        } else {
            ToggleAction::AlreadyPending
        }
    }

    /// Record the outcome of a request. Never touches the confirmed state.
    ///
    /// Returns the error notification to show if the request failed.
    pub fn settle(
        &mut self,
        origin: RequestOrigin,
        result: Result<(), FullscreenError>,
    ) -> Option<Notification> {
        self.in_flight = None;
        match result {
            Ok(()) => {
                log::debug!("Fullscreen request ({:?}) accepted, awaiting change", origin);
                None
            }
            Err(err) => {
                log::warn!("Fullscreen request ({:?}) failed: {}", origin, err);
                let message = match origin {
                    RequestOrigin::Deferred => format!(
                        "Could not automatically enter fullscreen: {err}. You can try the manual button."
                    ),
                    RequestOrigin::Manual => format!("Could not enter fullscreen: {err}"),
                };
                Some(Notification::error("Fullscreen Error", message))
            }
        }
    }

    /// The exit call returned. Frees the slot even if no change follows.
    pub fn exit_settled(&mut self) {
        self.exit_pending = false;
    }

    /// Apply a change notification. Returns `true` when focus should move
    /// into the embed.
    pub fn on_change(&mut self, is_fullscreen: bool) -> bool {
        self.is_fullscreen = is_fullscreen;
        if !is_fullscreen {
            self.exit_pending = false;
        }
        is_fullscreen
    }
}
