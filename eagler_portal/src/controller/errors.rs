//! Controller error types.

use crate::session::SessionError;
use thiserror::Error;

/// Result type for controller handle calls
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors returned through a [`super::ControllerHandle`]
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The view was unmounted and the actor has stopped
    #[error("Session controller is closed")]
    Closed,

    /// Rejected by the session state machine
    #[error(transparent)]
    Session(#[from] SessionError),
}
