//! Session error types.

use super::states::PhaseKind;
use crate::catalog::CatalogError;
use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session state machine errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Selected id is not in the catalog
    #[error("Invalid version selected: {0}")]
    InvalidSelection(String),

    /// Selection can only change before launch
    #[error("Version selection is locked while the session is {phase}")]
    SelectionLocked { phase: PhaseKind },

    /// Catalog lookup failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
