//! Phase definitions for the session FSM.
//!
//! Each phase is its own type. The frozen launch target only exists inside
//! the phases that follow a launch, so an idle session cannot carry one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of a session phase, cheap to copy into snapshots and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Idle,
    Launching,
    Active,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Idle => write!(f, "idle"),
            PhaseKind::Launching => write!(f, "launching"),
            PhaseKind::Active => write!(f, "active"),
        }
    }
}

/// The version captured at launch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTarget {
    pub version_id: String,
    pub resource_url: String,
}

/// Version selection; nothing is embedded yet
#[derive(Debug, Clone, Default)]
pub struct Idle {}

/// Launch accepted, embed requested, waiting for the next turn
#[derive(Debug, Clone)]
pub struct Launching {
    pub(crate) target: LaunchTarget,
}

/// Game embedded and playable
#[derive(Debug, Clone)]
pub struct Active {
    pub(crate) target: LaunchTarget,
}

impl From<Launching> for Active {
    fn from(value: Launching) -> Self {
        Self {
            target: value.target,
        }
    }
}
