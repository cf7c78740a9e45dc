//! Controller actor implementation with async event handling.

use super::{
    errors::{ControllerError, ControllerResult},
    messages::{ControllerMessage, InternalEvent, SessionSnapshot, ToggleResponse},
};
use crate::{
    browser::{EmbedSandbox, Key, ViewHost},
    catalog::VersionCatalog,
    config::ControllerConfig,
    fullscreen::{FullscreenCoordinator, RequestOrigin, ToggleAction},
    input::InputInterceptor,
    notify::Notification,
    session::{LaunchOutcome, LaunchTarget, Session, SessionError},
};
use std::{future, pin::Pin, sync::Arc};
use tokio::{
    sync::{
        broadcast::{self, error::RecvError},
        mpsc, oneshot,
    },
    task::JoinHandle,
    time::{Sleep, sleep},
};
use uuid::Uuid;

/// Controller handle for sending messages
#[derive(Clone)]
pub struct ControllerHandle {
    sender: mpsc::Sender<ControllerMessage>,
    session_id: Uuid,
}

impl ControllerHandle {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Change the selected version
    pub async fn select_version(&self, version_id: impl Into<String>) -> ControllerResult<()> {
        let version_id = version_id.into();
        self.request(|response| ControllerMessage::SelectVersion {
            version_id,
            response,
        })
        .await??;
        Ok(())
    }

    /// Launch the selected version
    pub async fn launch(&self) -> ControllerResult<LaunchOutcome> {
        Ok(self
            .request(|response| ControllerMessage::Launch { response })
            .await??)
    }

    /// Press the in-view fullscreen toggle
    pub async fn toggle_fullscreen(&self) -> ControllerResult<ToggleResponse> {
        self.request(|response| ControllerMessage::ToggleFullscreen { response })
            .await
    }

    pub async fn snapshot(&self) -> ControllerResult<SessionSnapshot> {
        self.request(|response| ControllerMessage::GetSnapshot { response })
            .await
    }

    /// Unmount the view. Resolves once every scoped resource is released.
    pub async fn unmount(&self) -> ControllerResult<()> {
        self.request(|response| ControllerMessage::Unmount { response })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ControllerMessage,
    ) -> ControllerResult<T> {
        let (response, receiver) = oneshot::channel();
        self.sender
            .send(build(response))
            .await
            .map_err(|_| ControllerError::Closed)?;
        receiver.await.map_err(|_| ControllerError::Closed)
    }
}

/// Actor owning one mounted game view
pub struct SessionController {
    /// Controller configuration
    config: ControllerConfig,

    /// Session FSM
    session: Session,

    /// Requested vs. confirmed fullscreen bookkeeping
    coordinator: FullscreenCoordinator,

    /// Escape advisory
    interceptor: InputInterceptor,

    /// Browser collaborators and notifier
    host: ViewHost,

    /// Capabilities granted to the embed
    sandbox: EmbedSandbox,

    /// Message inbox
    inbox: mpsc::Receiver<ControllerMessage>,

    /// Self-addressed events (activation, request outcomes)
    internal_tx: mpsc::UnboundedSender<InternalEvent>,
    internal_rx: mpsc::UnboundedReceiver<InternalEvent>,

    /// Fullscreen-change subscription, held from mount to unmount
    fullscreen_changes: Option<broadcast::Receiver<bool>>,

    /// Embed load-completion subscription
    embed_loads: Option<broadcast::Receiver<String>>,

    /// Key subscription, held only while the session is active
    key_events: Option<broadcast::Receiver<Key>>,

    /// Pending post-launch fullscreen request
    deferred_request: Option<Pin<Box<Sleep>>>,

    /// In-flight fullscreen request
    request_task: Option<JoinHandle<()>>,

    /// Is the view unmounted
    is_unmounted: bool,
}

impl SessionController {
    /// Mount a game view: create an idle session and subscribe to the
    /// browser's fullscreen and embed-load notifications.
    ///
    /// # Returns
    ///
    /// * `(SessionController, ControllerHandle)` - Actor and handle for sending messages
    pub fn mount(
        catalog: Arc<VersionCatalog>,
        config: ControllerConfig,
        host: ViewHost,
    ) -> (Self, ControllerHandle) {
        let (sender, inbox) = mpsc::channel(32);
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();

        // Subscribe before sampling so no change slips between the two.
        let fullscreen_changes = host.fullscreen.subscribe_changes();
        let embed_loads = host.embed.subscribe_loads();
        let coordinator = FullscreenCoordinator::new(host.fullscreen.is_fullscreen());

        let session = Session::new(catalog);
        let handle = ControllerHandle {
            sender,
            session_id: session.id(),
        };

        let controller = Self {
            interceptor: InputInterceptor::new(config.advisory_duration),
            config,
            session,
            coordinator,
            host,
            sandbox: EmbedSandbox::default(),
            inbox,
            internal_tx,
            internal_rx,
            fullscreen_changes: Some(fullscreen_changes),
            embed_loads: Some(embed_loads),
            key_events: None,
            deferred_request: None,
            request_task: None,
            is_unmounted: false,
        };

        (controller, handle)
    }

    /// Mount and spawn the actor on the current runtime
    pub fn spawn(
        catalog: Arc<VersionCatalog>,
        config: ControllerConfig,
        host: ViewHost,
    ) -> (ControllerHandle, JoinHandle<()>) {
        let (controller, handle) = Self::mount(catalog, config, host);
        (handle, tokio::spawn(controller.run()))
    }

    /// Run the controller event loop until unmount or until every handle is dropped
    pub async fn run(mut self) {
        log::info!("Session {} mounted", self.session.id());

        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(message) => self.handle_message(message),
                    None => {
                        log::debug!("Session {}: all handles dropped", self.session.id());
                        break;
                    }
                },

                Some(event) = self.internal_rx.recv() => {
                    self.handle_internal(event);
                }

                change = next_event(&mut self.fullscreen_changes) => match change {
                    Ok(is_fullscreen) => self.on_fullscreen_change(is_fullscreen),
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!(
                            "Session {}: missed {} fullscreen changes, resyncing",
                            self.session.id(),
                            skipped
                        );
                        let is_fullscreen = self.host.fullscreen.is_fullscreen();
                        self.on_fullscreen_change(is_fullscreen);
                    }
                    Err(RecvError::Closed) => {
                        log::warn!("Session {}: fullscreen notifications closed", self.session.id());
                        self.fullscreen_changes = None;
                    }
                },

                load = next_event(&mut self.embed_loads) => match load {
                    Ok(url) => self.on_embed_loaded(&url),
                    Err(RecvError::Lagged(skipped)) => {
                        log::warn!("Session {}: missed {} embed loads", self.session.id(), skipped);
                    }
                    Err(RecvError::Closed) => self.embed_loads = None,
                },

                key = next_event(&mut self.key_events) => match key {
                    Ok(key) => self.on_key(&key),
                    Err(RecvError::Lagged(skipped)) => {
                        log::debug!("Session {}: dropped {} key events", self.session.id(), skipped);
                    }
                    Err(RecvError::Closed) => self.key_events = None,
                },

                () = deferred_elapsed(&mut self.deferred_request) => {
                    self.deferred_request = None;
                    self.fire_deferred_request();
                }
            }

            if self.is_unmounted {
                break;
            }
        }

        self.teardown();
    }

    /// Handle a controller message
    fn handle_message(&mut self, message: ControllerMessage) {
        match message {
            ControllerMessage::SelectVersion {
                version_id,
                response,
            } => {
                let result = self.session.select_version(&version_id);
                if let Err(ref e) = result {
                    log::warn!("Session {}: selection rejected: {}", self.session.id(), e);
                }
                let _ = response.send(result);
            }

            ControllerMessage::Launch { response } => {
                let result = self.handle_launch();
                let _ = response.send(result);
            }

            ControllerMessage::ToggleFullscreen { response } => {
                let result = self.handle_toggle();
                let _ = response.send(result);
            }

            ControllerMessage::GetSnapshot { response } => {
                let _ = response.send(self.snapshot());
            }

            ControllerMessage::Unmount { response } => {
                self.teardown();
                let _ = response.send(());
            }
        }
    }

    fn handle_internal(&mut self, event: InternalEvent) {
        match event {
            InternalEvent::Activate => self.activate(),

            InternalEvent::RequestSettled { origin, result } => {
                self.request_task = None;
                if let Some(notification) = self.coordinator.settle(origin, result) {
                    self.notify(notification);
                }
            }

            InternalEvent::ExitSettled => self.coordinator.exit_settled(),
        }
    }

    /// Handle launch request
    fn handle_launch(&mut self) -> Result<LaunchOutcome, SessionError> {
        let outcome = match self.session.launch() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Session {}: launch failed: {}", self.session.id(), e);
                self.notify(Notification::error("Error", "Invalid version selected."));
                return Err(e);
            }
        };

        if let LaunchOutcome::Started(ref target) = outcome {
            self.host.embed.load(&target.resource_url, &self.sandbox);
            self.notify(Notification::info(
                "Launching Game",
                format!(
                    "Loading {} {}. Please wait...",
                    self.config.game_title, target.version_id
                ),
            ));

            // Activation happens on the next turn of the event loop.
            let _ = self.internal_tx.send(InternalEvent::Activate);
        }

        Ok(outcome)
    }

    /// `Launching -> Active`: register the key listener and schedule the
    /// automatic fullscreen request
    fn activate(&mut self) {
        if self.is_unmounted || !self.session.activate() {
            return;
        }

        self.interceptor.arm();
        self.key_events = Some(self.host.keyboard.subscribe_keys());

        if self.config.auto_fullscreen {
            log::debug!(
                "Session {}: fullscreen request scheduled in {:?}",
                self.session.id(),
                self.config.fullscreen_delay
            );
            self.deferred_request = Some(Box::pin(sleep(self.config.fullscreen_delay)));
        }
    }

    fn fire_deferred_request(&mut self) {
        if !self.session.is_active() {
            return;
        }
        if !self.coordinator.deferred_request_needed() {
            log::debug!(
                "Session {}: deferred fullscreen request not needed",
                self.session.id()
            );
            return;
        }
        if self.coordinator.begin_request(RequestOrigin::Deferred) {
            self.spawn_request(RequestOrigin::Deferred);
        }
    }

    /// Handle the in-view toggle
    fn handle_toggle(&mut self) -> ToggleResponse {
        if !self.session.is_active() {
            return ToggleResponse::NotActive;
        }

        match self.coordinator.toggle() {
            ToggleAction::Request => {
                self.spawn_request(RequestOrigin::Manual);
                ToggleResponse::Requested
            }
            ToggleAction::Exit => {
                let fullscreen = Arc::clone(&self.host.fullscreen);
                let internal_tx = self.internal_tx.clone();
                tokio::spawn(async move {
                    fullscreen.exit_fullscreen().await;
                    let _ = internal_tx.send(InternalEvent::ExitSettled);
                });
                ToggleResponse::ExitRequested
            }
            ToggleAction::AlreadyPending => ToggleResponse::AlreadyPending,
        }
    }

    /// Issue a fullscreen request. The outcome comes back as an internal
    /// event; the state change comes through the change subscription.
    fn spawn_request(&mut self, origin: RequestOrigin) {
        let fullscreen = Arc::clone(&self.host.fullscreen);
        let internal_tx = self.internal_tx.clone();
        log::debug!(
            "Session {}: requesting fullscreen ({:?})",
            self.session.id(),
            origin
        );

        self.request_task = Some(tokio::spawn(async move {
            let result = fullscreen.request_fullscreen().await;
            let _ = internal_tx.send(InternalEvent::RequestSettled { origin, result });
        }));
    }

    fn on_fullscreen_change(&mut self, is_fullscreen: bool) {
        log::debug!(
            "Session {}: fullscreen changed to {}",
            self.session.id(),
            is_fullscreen
        );
        if self.coordinator.on_change(is_fullscreen) && self.session.launch_target().is_some() {
            self.host.embed.focus();
        }
    }

    fn on_embed_loaded(&mut self, url: &str) {
        let Some(LaunchTarget {
            version_id,
            resource_url,
        }) = self.session.launch_target()
        else {
            log::debug!("Session {}: load of {} before launch ignored", self.session.id(), url);
            return;
        };

        if resource_url != url {
            log::debug!("Session {}: load of stale embed {} ignored", self.session.id(), url);
            return;
        }

        let message = format!(
            "{} {} is ready to play! Click inside the game to activate controls.",
            self.config.game_title, version_id
        );
        self.notify(Notification::info("Game Loaded", message));
        self.host.embed.focus();
    }

    fn on_key(&mut self, key: &Key) {
        let advisory = self.interceptor.on_key(
            key,
            self.session.kind(),
            self.coordinator.is_fullscreen(),
        );
        if let Some(notification) = advisory {
            self.notify(notification);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session.id(),
            phase: self.session.kind(),
            selected_version_id: self.session.selected_version_id().to_string(),
            active_resource_url: self.session.active_resource_url().map(str::to_string),
            is_fullscreen: self.coordinator.is_fullscreen(),
            request_pending: self.coordinator.in_flight().is_some()
                || self.coordinator.exit_pending(),
            deferred_request_scheduled: self.deferred_request.is_some(),
            key_listener_registered: self.key_events.is_some(),
        }
    }

    fn notify(&self, notification: Notification) {
        self.host.notifier.notify(notification);
    }

    /// Release every scoped resource. Safe to call more than once.
    fn teardown(&mut self) {
        if self.deferred_request.take().is_some() {
            log::debug!(
                "Session {}: pending fullscreen request cancelled",
                self.session.id()
            );
        }
        if let Some(task) = self.request_task.take() {
            task.abort();
        }
        self.fullscreen_changes = None;
        self.embed_loads = None;
        self.key_events = None;
        self.interceptor.disarm();

        if !self.is_unmounted {
            self.is_unmounted = true;
            log::info!("Session {} unmounted", self.session.id());
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(task) = self.request_task.take() {
            task.abort();
        }
    }
}

/// Next event from an optional subscription; pending forever when absent
async fn next_event<T: Clone>(receiver: &mut Option<broadcast::Receiver<T>>) -> Result<T, RecvError> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => future::pending().await,
    }
}

/// Completes when the deferred request timer fires; pending when none is scheduled
async fn deferred_elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => future::pending().await,
    }
}
