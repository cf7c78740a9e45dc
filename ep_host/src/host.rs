//! Terminal host: executes parsed commands against a mounted controller
//! backed by the simulated browser.

use crate::commands::{HELP, HostCommand};
use anyhow::Result;
use eagler_portal::{
    ControllerConfig, ControllerError, ControllerHandle, LaunchOutcome, Notification,
    SessionController, SimulatedBrowser, SimulatedBrowserConfig, VersionCatalog, ViewHost,
    notify::ChannelNotifier,
    ui::{MemoryPreferences, UiStore},
};
use std::sync::Arc;
use tokio::{sync::mpsc, task::JoinHandle};

/// Whether the prompt loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Host {
    catalog: Arc<VersionCatalog>,
    browser: SimulatedBrowser,
    handle: ControllerHandle,
    task: JoinHandle<()>,
    ui: UiStore<MemoryPreferences>,
}

impl Host {
    /// Mount the game view. Returns the host and the stream of notifications
    /// the controller emits.
    pub fn mount(
        catalog: VersionCatalog,
        config: ControllerConfig,
        browser_config: SimulatedBrowserConfig,
        prefers_dark: bool,
    ) -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let catalog = Arc::new(catalog);
        let browser = SimulatedBrowser::new(browser_config);
        let (notifier, notifications) = ChannelNotifier::new();
        let view = ViewHost::simulated(&browser, Arc::new(notifier));
        let (handle, task) = SessionController::spawn(Arc::clone(&catalog), config, view);

        let host = Self {
            catalog,
            browser,
            handle,
            task,
            ui: UiStore::init(MemoryPreferences::default(), prefers_dark),
        };
        (host, notifications)
    }

    pub fn browser(&self) -> &SimulatedBrowser {
        &self.browser
    }

    pub fn ui(&self) -> &UiStore<MemoryPreferences> {
        &self.ui
    }

    /// Run one command, printing its result
    pub async fn execute(&mut self, command: HostCommand) -> Result<Flow> {
        match command {
            HostCommand::Versions => {
                let selected = self.handle.snapshot().await?.selected_version_id;
                for version in self.catalog.list() {
                    let marker = if version.id == selected { "*" } else { " " };
                    println!(
                        "{marker} {:<8} {:<16} {}",
                        version.id, version.label, version.resource_url
                    );
                }
            }

            HostCommand::Select(id) => match self.handle.select_version(id.as_str()).await {
                Ok(()) => println!("Selected {id}"),
                Err(ControllerError::Session(e)) => println!("Error: {e}"),
                Err(e) => return Err(e.into()),
            },

            HostCommand::Launch => match self.handle.launch().await? {
                LaunchOutcome::Started(target) => {
                    println!("Embedding {}", target.resource_url);
                }
                LaunchOutcome::AlreadyLaunched(phase) => {
                    println!("Already launched (session is {phase})");
                }
            },

            HostCommand::Toggle => {
                let response = self.handle.toggle_fullscreen().await?;
                println!("Toggle: {response:?}");
            }

            HostCommand::Key(key) => self.browser.press_key(key),

            HostCommand::External(fullscreen) => self.browser.set_external_fullscreen(fullscreen),

            HostCommand::Load => {
                if !self.browser.finish_load() {
                    println!("Nothing is loading");
                }
            }

            HostCommand::Status => {
                let snapshot = self.handle.snapshot().await?;
                println!("session    {}", snapshot.session_id);
                println!("phase      {}", snapshot.phase);
                println!("selected   {}", snapshot.selected_version_id);
                println!(
                    "embed      {}",
                    snapshot.active_resource_url.as_deref().unwrap_or("-")
                );
                println!("fullscreen {}", snapshot.is_fullscreen);
                println!(
                    "pending    request={} deferred={}",
                    snapshot.request_pending, snapshot.deferred_request_scheduled
                );
                println!("theme      {}", self.ui.theme());
            }

            HostCommand::Theme => println!("Theme: {}", self.ui.toggle_theme()),

            HostCommand::Menu => {
                let open = self.ui.toggle_mobile_menu();
                println!("Menu {}", if open { "open" } else { "closed" });
            }

            HostCommand::Help => print!("{HELP}"),

            HostCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Unmount the view and wait for the controller to stop
    pub async fn unmount(self) -> Result<()> {
        match self.handle.unmount().await {
            Ok(()) | Err(ControllerError::Closed) => {}
            Err(e) => return Err(e.into()),
        }
        self.task.await?;
        Ok(())
    }
}
