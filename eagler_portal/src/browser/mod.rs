//! Contracts for the browser collaborators the controller drives.
//!
//! The controller never touches a real DOM. It talks to three narrow
//! interfaces:
//! - [`FullscreenApi`]: request/exit fullscreen and the ambient
//!   fullscreen-change notification
//! - [`EmbedSurface`]: the isolated surface hosting the game
//! - [`KeyboardEvents`]: key presses while the view is mounted
//!
//! Every notification source is a `tokio::sync::broadcast` subscription.
//! Dropping the receiver is the unsubscribe.
//!
//! [`SimulatedBrowser`] implements all three without a browser and is used by
//! the terminal host and the tests.

pub mod simulated;

pub use simulated::{SimulatedBrowser, SimulatedBrowserConfig};

use crate::notify::Notifier;
use async_trait::async_trait;
use std::{fmt, sync::Arc};
use thiserror::Error;
use tokio::sync::broadcast;

/// Why a fullscreen request was not satisfied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FullscreenError {
    /// Browser or user refused the request
    #[error("{0}")]
    Denied(String),

    /// No fullscreen capability on this platform
    #[error("Fullscreen API is not supported")]
    Unsupported,
}

/// Browser fullscreen capability targeting the game container
#[async_trait]
pub trait FullscreenApi: Send + Sync {
    /// Ask the browser to enter fullscreen.
    ///
    /// `Ok` only means the request was accepted. The actual change is
    /// reported through [`FullscreenApi::subscribe_changes`].
    async fn request_fullscreen(&self) -> Result<(), FullscreenError>;

    /// Ask the browser to leave fullscreen
    async fn exit_fullscreen(&self);

    /// Ambient check equivalent to "is there a fullscreen element"
    fn is_fullscreen(&self) -> bool;

    /// Subscribe to fullscreen-change notifications
    fn subscribe_changes(&self) -> broadcast::Receiver<bool>;
}

/// Isolated surface that hosts the embedded game
pub trait EmbedSurface: Send + Sync {
    /// Point the surface at `url` with the given sandbox
    fn load(&self, url: &str, sandbox: &EmbedSandbox);

    /// Move keyboard and pointer focus into the embed
    fn focus(&self);

    /// Subscribe to load-completion signals; each carries the loaded URL
    fn subscribe_loads(&self) -> broadcast::Receiver<String>;
}

/// Keyboard events reaching the mounted view
pub trait KeyboardEvents: Send + Sync {
    fn subscribe_keys(&self) -> broadcast::Receiver<Key>;
}

/// A key press
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM-style key name to a [`Key`]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" | "escape" | "esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Escape => write!(f, "Escape"),
            Key::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Capabilities granted to the embedded game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedSandbox {
    pub allow_scripts: bool,
    pub allow_same_origin: bool,
    pub allow_pointer_lock: bool,
    pub allow_forms: bool,
    pub allow_top_navigation: bool,
}

impl Default for EmbedSandbox {
    fn default() -> Self {
        Self {
            allow_scripts: true,
            allow_same_origin: true,
            allow_pointer_lock: true,
            allow_forms: true,
            allow_top_navigation: false,
        }
    }
}

impl EmbedSandbox {
    /// Value for an iframe `sandbox` attribute
    pub fn attribute(&self) -> String {
        [
            (self.allow_scripts, "allow-scripts"),
            (self.allow_same_origin, "allow-same-origin"),
            (self.allow_pointer_lock, "allow-pointer-lock"),
            (self.allow_forms, "allow-forms"),
            (self.allow_top_navigation, "allow-top-navigation"),
        ]
        .into_iter()
        .filter_map(|(enabled, token)| enabled.then_some(token))
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Everything a mounted game view talks to
#[derive(Clone)]
pub struct ViewHost {
    pub fullscreen: Arc<dyn FullscreenApi>,
    pub embed: Arc<dyn EmbedSurface>,
    pub keyboard: Arc<dyn KeyboardEvents>,
    pub notifier: Arc<dyn Notifier>,
}

impl ViewHost {
    /// Host backed entirely by one simulated browser
    pub fn simulated(browser: &SimulatedBrowser, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            fullscreen: Arc::new(browser.clone()),
            embed: Arc::new(browser.clone()),
            keyboard: Arc::new(browser.clone()),
            notifier,
        }
    }
}
