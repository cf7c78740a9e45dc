//! Session state machine: `Idle -> Launching -> Active`.
//!
//! There is no transition back to `Idle`. A session ends when the view that
//! owns it is unmounted; a fresh mount starts a fresh `Idle` session.
//!
//! ## Example
//!
//! ```
//! use eagler_portal::catalog::VersionCatalog;
//! use eagler_portal::session::{LaunchOutcome, PhaseKind, Session};
//! use std::sync::Arc;
//!
//! let mut session = Session::new(Arc::new(VersionCatalog::default()));
//! session.select_version("1.8.8").unwrap();
//! assert!(matches!(session.launch().unwrap(), LaunchOutcome::Started(_)));
//! assert!(session.activate());
//! assert_eq!(session.kind(), PhaseKind::Active);
//! assert_eq!(
//!     session.active_resource_url(),
//!     Some("https://eaglercraft.com/mc/1.8.8/")
//! );
//! ```

pub mod errors;
pub mod states;

pub use errors::{SessionError, SessionResult};
pub use states::{Active, Idle, LaunchTarget, Launching, PhaseKind};

use crate::catalog::{Version, VersionCatalog};
use enum_dispatch::enum_dispatch;
use std::sync::Arc;
use uuid::Uuid;

/// Behaviour shared by every phase
#[enum_dispatch]
pub trait Phase {
    fn kind(&self) -> PhaseKind;

    /// Version frozen at launch, if any
    fn launch_target(&self) -> Option<&LaunchTarget>;
}

impl Phase for Idle {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Idle
    }

    fn launch_target(&self) -> Option<&LaunchTarget> {
        None
    }
}

impl Phase for Launching {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Launching
    }

    fn launch_target(&self) -> Option<&LaunchTarget> {
        Some(&self.target)
    }
}

impl Phase for Active {
    fn kind(&self) -> PhaseKind {
        PhaseKind::Active
    }

    fn launch_target(&self) -> Option<&LaunchTarget> {
        Some(&self.target)
    }
}

#[enum_dispatch(Phase)]
#[derive(Debug, Clone)]
pub enum SessionPhase {
    Idle,
    Launching,
    Active,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle(Idle::default())
    }
}

/// Result of a launch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Session moved to `Launching` with this target
    Started(LaunchTarget),

    /// A session was already launched; nothing changed
    AlreadyLaunched(PhaseKind),
}

/// Mutable session record, owned by the controller
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    catalog: Arc<VersionCatalog>,
    phase: SessionPhase,
    selected_version_id: String,
}

impl Session {
    /// New idle session selecting the first catalog entry
    pub fn new(catalog: Arc<VersionCatalog>) -> Self {
        let selected_version_id = catalog.default_version().id.clone();
        Self {
            id: Uuid::new_v4(),
            catalog,
            phase: SessionPhase::default(),
            selected_version_id,
        }
    }

    /// Identifier used to correlate log lines for this session
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn is_active(&self) -> bool {
        self.kind() == PhaseKind::Active
    }

    pub fn selected_version_id(&self) -> &str {
        &self.selected_version_id
    }

    /// Currently selected catalog entry
    pub fn selected_version(&self) -> SessionResult<&Version> {
        Ok(self.catalog.resolve(&self.selected_version_id)?)
    }

    pub fn launch_target(&self) -> Option<&LaunchTarget> {
        self.phase.launch_target()
    }

    /// URL frozen at launch; `None` while idle
    pub fn active_resource_url(&self) -> Option<&str> {
        self.launch_target().map(|t| t.resource_url.as_str())
    }

    /// Change the selected version. Only allowed while idle.
    pub fn select_version(&mut self, id: &str) -> SessionResult<()> {
        let phase = self.kind();
        if phase != PhaseKind::Idle {
            return Err(SessionError::SelectionLocked { phase });
        }
        if !self.catalog.contains(id) {
            return Err(SessionError::InvalidSelection(id.to_string()));
        }

        log::debug!("Session {}: selected version {}", self.id, id);
        self.selected_version_id = id.to_string();
        Ok(())
    }

    /// Freeze the selected version and move to `Launching`.
    ///
    /// Repeated calls after the first are no-ops reporting the current phase.
    pub fn launch(&mut self) -> SessionResult<LaunchOutcome> {
        let phase = self.kind();
        if phase != PhaseKind::Idle {
            log::debug!("Session {}: launch ignored while {}", self.id, phase);
            return Ok(LaunchOutcome::AlreadyLaunched(phase));
        }

        let version = self.selected_version()?;
        let target = LaunchTarget {
            version_id: version.id.clone(),
            resource_url: version.resource_url.clone(),
        };

        log::info!(
            "Session {}: launching {} ({})",
            self.id,
            target.version_id,
            target.resource_url
        );
        self.phase = SessionPhase::Launching(Launching {
            target: target.clone(),
        });
        Ok(LaunchOutcome::Started(target))
    }

    /// `Launching -> Active`. Returns `false` from any other phase.
    pub fn activate(&mut self) -> bool {
        match std::mem::take(&mut self.phase) {
            SessionPhase::Launching(launching) => {
                self.phase = SessionPhase::Active(launching.into());
                log::info!("Session {}: active", self.id);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }
}
