//! Headless browser model.
//!
//! Confirms fullscreen requests after a configurable latency through the
//! change subscription, can be told to deny requests, and counts every call
//! the controller makes so tests can assert on them.

use super::{EmbedSandbox, EmbedSurface, FullscreenApi, FullscreenError, Key, KeyboardEvents};
use async_trait::async_trait;
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

/// Simulated browser behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedBrowserConfig {
    /// Reject every fullscreen request with this message
    pub deny_with: Option<String>,

    /// Delay between an accepted request and the change notification
    pub confirm_latency: Duration,
}

impl Default for SimulatedBrowserConfig {
    fn default() -> Self {
        Self {
            deny_with: None,
            confirm_latency: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Default)]
struct BrowserState {
    fullscreen: bool,
    deny_with: Option<String>,
    loaded_url: Option<String>,
    sandbox: Option<EmbedSandbox>,
    request_count: usize,
    exit_count: usize,
    focus_count: usize,
    load_count: usize,
}

struct Inner {
    state: Mutex<BrowserState>,
    confirm_latency: Duration,
    changes: broadcast::Sender<bool>,
    loads: broadcast::Sender<String>,
    keys: broadcast::Sender<Key>,
}

/// Cheaply cloneable handle to one simulated browser tab
#[derive(Clone)]
pub struct SimulatedBrowser {
    inner: Arc<Inner>,
}

impl Default for SimulatedBrowser {
    fn default() -> Self {
        Self::new(SimulatedBrowserConfig::default())
    }
}

impl SimulatedBrowser {
    pub fn new(config: SimulatedBrowserConfig) -> Self {
        let (changes, _) = broadcast::channel(EVENT_CAPACITY);
        let (loads, _) = broadcast::channel(EVENT_CAPACITY);
        let (keys, _) = broadcast::channel(EVENT_CAPACITY);
        let state = BrowserState {
            deny_with: config.deny_with,
            ..BrowserState::default()
        };

        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                confirm_latency: config.confirm_latency,
                changes,
                loads,
                keys,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, BrowserState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the denial behaviour for subsequent requests
    pub fn set_denial(&self, deny_with: Option<String>) {
        self.state().deny_with = deny_with;
    }

    /// Fullscreen changed outside the controller (F11, platform control)
    pub fn set_external_fullscreen(&self, fullscreen: bool) {
        self.apply_fullscreen(fullscreen);
    }

    /// Deliver a key press to the page
    pub fn press_key(&self, key: Key) {
        let _ = self.inner.keys.send(key);
    }

    /// Complete loading of the current embed URL, if any
    pub fn finish_load(&self) -> bool {
        let url = self.state().loaded_url.clone();
        match url {
            Some(url) => {
                let _ = self.inner.loads.send(url);
                true
            }
            None => false,
        }
    }

    pub fn request_count(&self) -> usize {
        self.state().request_count
    }

    pub fn exit_count(&self) -> usize {
        self.state().exit_count
    }

    pub fn focus_count(&self) -> usize {
        self.state().focus_count
    }

    pub fn load_count(&self) -> usize {
        self.state().load_count
    }

    pub fn loaded_url(&self) -> Option<String> {
        self.state().loaded_url.clone()
    }

    pub fn sandbox(&self) -> Option<EmbedSandbox> {
        self.state().sandbox.clone()
    }

    /// Number of live fullscreen-change subscriptions
    pub fn change_subscribers(&self) -> usize {
        self.inner.changes.receiver_count()
    }

    /// Number of live key subscriptions
    pub fn key_subscribers(&self) -> usize {
        self.inner.keys.receiver_count()
    }

    fn apply_fullscreen(&self, fullscreen: bool) {
        let changed = {
            let mut state = self.state();
            let changed = state.fullscreen != fullscreen;
            state.fullscreen = fullscreen;
            changed
        };
        if changed {
            log::debug!("Simulated browser fullscreen -> {}", fullscreen);
            let _ = self.inner.changes.send(fullscreen);
        }
    }
}

#[async_trait]
impl FullscreenApi for SimulatedBrowser {
    async fn request_fullscreen(&self) -> Result<(), FullscreenError> {
        let denial = {
            let mut state = self.state();
            state.request_count += 1;
            state.deny_with.clone()
        };

        if let Some(message) = denial {
            return Err(FullscreenError::Denied(message));
        }

        // The change notification goes out before the request resolves, as in
        // real browsers; subscribers see them on independent channels.
        tokio::time::sleep(self.inner.confirm_latency).await;
        self.apply_fullscreen(true);
        Ok(())
    }

    async fn exit_fullscreen(&self) {
        self.state().exit_count += 1;
        self.apply_fullscreen(false);
    }

    fn is_fullscreen(&self) -> bool {
        self.state().fullscreen
    }

    fn subscribe_changes(&self) -> broadcast::Receiver<bool> {
        self.inner.changes.subscribe()
    }
}

impl EmbedSurface for SimulatedBrowser {
    fn load(&self, url: &str, sandbox: &EmbedSandbox) {
        let mut state = self.state();
        state.load_count += 1;
        state.loaded_url = Some(url.to_string());
        state.sandbox = Some(sandbox.clone());
    }

    fn focus(&self) {
        self.state().focus_count += 1;
    }

    fn subscribe_loads(&self) -> broadcast::Receiver<String> {
        self.inner.loads.subscribe()
    }
}

impl KeyboardEvents for SimulatedBrowser {
    fn subscribe_keys(&self) -> broadcast::Receiver<Key> {
        self.inner.keys.subscribe()
    }
}
