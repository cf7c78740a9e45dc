//! # Eagler Portal
//!
//! Session and fullscreen controller for a browser portal that embeds
//! Eaglercraft in an isolated surface.
//!
//! The session is a small finite state machine (`Idle -> Launching ->
//! Active`) built on `enum_dispatch`. Around it, a tokio actor reconciles the
//! controller's own fullscreen *requests* with the browser's fullscreen
//! *change notifications*, which are the only source of truth for whether
//! the page is actually fullscreen.
//!
//! ## Core Modules
//!
//! - [`catalog`]: Version catalog (id, label, resource URL)
//! - [`session`]: Session state machine
//! - [`fullscreen`]: Requested vs. confirmed fullscreen bookkeeping
//! - [`input`]: Escape advisory while a session is active
//! - [`controller`]: Actor wiring everything to the browser collaborators
//! - [`browser`]: Browser contracts and a headless simulated browser
//! - [`notify`]: Notifications (toasts) and notifier sinks
//! - [`config`]: Controller configuration
//! - [`ui`]: Theme and navigation menu store
//!
//! ## Example
//!
//! ```
//! use eagler_portal::{PhaseKind, Session, VersionCatalog};
//! use std::sync::Arc;
//!
//! let mut session = Session::new(Arc::new(VersionCatalog::default()));
//! session.launch().unwrap();
//! assert_eq!(session.kind(), PhaseKind::Launching);
//! ```

pub mod browser;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod fullscreen;
pub mod input;
pub mod notify;
pub mod session;
pub mod ui;

pub use browser::{SimulatedBrowser, SimulatedBrowserConfig, ViewHost};
pub use catalog::{CatalogError, Version, VersionCatalog};
pub use config::{ConfigError, ControllerConfig};
pub use controller::{ControllerError, ControllerHandle, SessionController, SessionSnapshot};
pub use notify::{Notification, Notifier, Severity};
pub use session::{LaunchOutcome, PhaseKind, Session, SessionError};
