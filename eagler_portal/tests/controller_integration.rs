//! Integration tests for the session controller actor.
//!
//! All tests run on a paused tokio clock, so timers (the deferred fullscreen
//! request, the simulated browser's confirmation latency) advance only when
//! every task is idle.

use eagler_portal::{
    ControllerConfig, ControllerError, LaunchOutcome, Notification, PhaseKind, SessionController,
    SessionError, Severity, SimulatedBrowser, SimulatedBrowserConfig, VersionCatalog, ViewHost,
    browser::{FullscreenApi, Key},
    controller::{ControllerHandle, ToggleResponse},
    notify::ChannelNotifier,
    session::LaunchTarget,
};
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};

struct Harness {
    browser: SimulatedBrowser,
    handle: ControllerHandle,
    task: JoinHandle<()>,
    notifications: mpsc::UnboundedReceiver<Notification>,
}

impl Harness {
    fn drain(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            out.push(notification);
        }
        out
    }
}

fn mount_with(browser_config: SimulatedBrowserConfig, config: ControllerConfig) -> Harness {
    let browser = SimulatedBrowser::new(browser_config);
    let (notifier, notifications) = ChannelNotifier::new();
    let host = ViewHost::simulated(&browser, Arc::new(notifier));
    let (handle, task) =
        SessionController::spawn(Arc::new(VersionCatalog::default()), config, host);

    Harness {
        browser,
        handle,
        task,
        notifications,
    }
}

fn mount() -> Harness {
    mount_with(SimulatedBrowserConfig::default(), ControllerConfig::default())
}

/// Let the actor process everything queued, without reaching the deferred timer
async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_default_launch_uses_first_version() {
    let mut h = mount();

    let outcome = h.handle.launch().await.unwrap();
    assert_eq!(
        outcome,
        LaunchOutcome::Started(LaunchTarget {
            version_id: "1.12.2".to_string(),
            resource_url: "https://eaglercraft.com/mc/1.12.2/".to_string(),
        })
    );
    settle().await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, PhaseKind::Active);
    assert_eq!(
        snapshot.active_resource_url.as_deref(),
        Some("https://eaglercraft.com/mc/1.12.2/")
    );
    assert_eq!(
        h.browser.loaded_url().as_deref(),
        Some("https://eaglercraft.com/mc/1.12.2/")
    );

    let notifications = h.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Launching Game");
    assert_eq!(
        notifications[0].message,
        "Loading Eaglercraft 1.12.2. Please wait..."
    );
}

#[tokio::test(start_paused = true)]
async fn test_selected_version_is_frozen_at_launch() {
    let h = mount();

    h.handle.select_version("1.8.8").await.unwrap();
    h.handle.launch().await.unwrap();

    let err = h.handle.select_version("1.5.2").await.unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Session(SessionError::SelectionLocked { .. })
    ));

    settle().await;
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.selected_version_id, "1.8.8");
    assert_eq!(
        snapshot.active_resource_url.as_deref(),
        Some("https://eaglercraft.com/mc/1.8.8/")
    );
}

#[tokio::test(start_paused = true)]
async fn test_invalid_selection_is_rejected_without_mutation() {
    let h = mount();

    let err = h.handle.select_version("1.20.1").await.unwrap_err();
    assert!(matches!(
        err,
        ControllerError::Session(SessionError::InvalidSelection(_))
    ));

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.selected_version_id, "1.12.2");
    assert_eq!(snapshot.phase, PhaseKind::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_double_launch_schedules_one_request() {
    let mut h = mount();

    let (first, second) = tokio::join!(h.handle.launch(), h.handle.launch());
    let outcomes = [first.unwrap(), second.unwrap()];
    let started = outcomes
        .iter()
        .filter(|o| matches!(o, LaunchOutcome::Started(_)))
        .count();
    assert_eq!(started, 1);

    sleep(Duration::from_secs(1)).await;

    assert_eq!(h.browser.request_count(), 1);
    assert_eq!(h.browser.load_count(), 1);
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, PhaseKind::Active);
    assert!(snapshot.is_fullscreen);

    let launching = h
        .drain()
        .into_iter()
        .filter(|n| n.title == "Launching Game")
        .count();
    assert_eq!(launching, 1);
}

#[tokio::test(start_paused = true)]
async fn test_deferred_request_waits_for_delay_and_confirmation() {
    let h = mount();
    h.handle.launch().await.unwrap();

    sleep(Duration::from_millis(400)).await;
    assert_eq!(h.browser.request_count(), 0, "request fired before the delay");
    assert!(h.handle.snapshot().await.unwrap().deferred_request_scheduled);

    // Request goes out at 500ms; the browser confirms 50ms later.
    sleep(Duration::from_millis(120)).await;
    assert_eq!(h.browser.request_count(), 1);
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(!snapshot.is_fullscreen, "state flipped before confirmation");

    sleep(Duration::from_millis(100)).await;
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.is_fullscreen);
    assert!(!snapshot.request_pending);
    assert_eq!(h.browser.focus_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_external_change_updates_state_and_focus() {
    let config = ControllerConfig {
        auto_fullscreen: false,
        ..ControllerConfig::default()
    };
    let h = mount_with(SimulatedBrowserConfig::default(), config);
    h.handle.launch().await.unwrap();
    settle().await;

    h.browser.set_external_fullscreen(true);
    settle().await;
    assert!(h.handle.snapshot().await.unwrap().is_fullscreen);
    assert_eq!(h.browser.focus_count(), 1);

    h.browser.set_external_fullscreen(false);
    settle().await;
    assert!(!h.handle.snapshot().await.unwrap().is_fullscreen);
    assert_eq!(h.browser.focus_count(), 1);
    assert_eq!(h.browser.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_external_change_before_deferred_request_skips_it() {
    let h = mount();
    h.handle.launch().await.unwrap();
    settle().await;

    h.browser.set_external_fullscreen(true);
    sleep(Duration::from_secs(1)).await;

    assert_eq!(h.browser.request_count(), 0);
    assert!(h.handle.snapshot().await.unwrap().is_fullscreen);
}

#[tokio::test(start_paused = true)]
async fn test_denied_request_reports_one_error() {
    let mut h = mount_with(
        SimulatedBrowserConfig {
            deny_with: Some("Permissions check failed".to_string()),
            ..SimulatedBrowserConfig::default()
        },
        ControllerConfig::default(),
    );
    h.handle.launch().await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.phase, PhaseKind::Active);
    assert!(!snapshot.is_fullscreen);
    assert!(!snapshot.request_pending);

    let errors: Vec<Notification> = h
        .drain()
        .into_iter()
        .filter(|n| n.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "Fullscreen Error");
    assert!(errors[0].message.contains("Permissions check failed"));
    assert!(errors[0].message.contains("manual button"));

    // No automatic retry.
    sleep(Duration::from_secs(5)).await;
    assert_eq!(h.browser.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_manual_toggle_after_denial() {
    let mut h = mount_with(
        SimulatedBrowserConfig {
            deny_with: Some("Not allowed".to_string()),
            ..SimulatedBrowserConfig::default()
        },
        ControllerConfig::default(),
    );
    h.handle.launch().await.unwrap();
    sleep(Duration::from_secs(1)).await;
    h.drain();

    h.browser.set_denial(None);
    assert_eq!(
        h.handle.toggle_fullscreen().await.unwrap(),
        ToggleResponse::Requested
    );
    assert_eq!(
        h.handle.toggle_fullscreen().await.unwrap(),
        ToggleResponse::AlreadyPending
    );

    sleep(Duration::from_millis(200)).await;
    assert!(h.handle.snapshot().await.unwrap().is_fullscreen);
    assert_eq!(h.browser.request_count(), 2);

    assert_eq!(
        h.handle.toggle_fullscreen().await.unwrap(),
        ToggleResponse::ExitRequested
    );
    settle().await;
    assert!(!h.handle.snapshot().await.unwrap().is_fullscreen);
    assert_eq!(h.browser.exit_count(), 1);
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_manual_denial_message() {
    let mut h = mount_with(
        SimulatedBrowserConfig {
            deny_with: Some("Not allowed".to_string()),
            ..SimulatedBrowserConfig::default()
        },
        ControllerConfig {
            auto_fullscreen: false,
            ..ControllerConfig::default()
        },
    );
    h.handle.launch().await.unwrap();
    settle().await;
    h.drain();

    h.handle.toggle_fullscreen().await.unwrap();
    settle().await;

    let notifications = h.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(
        notifications[0].message,
        "Could not enter fullscreen: Not allowed"
    );
}

#[tokio::test(start_paused = true)]
async fn test_toggle_before_launch_is_ignored() {
    let h = mount();
    assert_eq!(
        h.handle.toggle_fullscreen().await.unwrap(),
        ToggleResponse::NotActive
    );
    settle().await;
    assert_eq!(h.browser.request_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unmount_cancels_pending_request() {
    let mut h = mount();
    h.handle.launch().await.unwrap();
    settle().await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.deferred_request_scheduled);
    assert!(snapshot.key_listener_registered);

    h.handle.unmount().await.unwrap();
    (&mut h.task).await.unwrap();
    sleep(Duration::from_secs(2)).await;

    assert_eq!(h.browser.request_count(), 0);
    assert_eq!(h.browser.change_subscribers(), 0);
    assert_eq!(h.browser.key_subscribers(), 0);
    assert!(matches!(
        h.handle.snapshot().await,
        Err(ControllerError::Closed)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_every_handle_releases_resources() {
    let Harness { browser, handle, task, .. } = mount();
    handle.launch().await.unwrap();
    settle().await;
    assert_eq!(browser.key_subscribers(), 1);

    drop(handle);
    task.await.unwrap();
    sleep(Duration::from_secs(2)).await;

    assert_eq!(browser.request_count(), 0);
    assert_eq!(browser.change_subscribers(), 0);
    assert_eq!(browser.key_subscribers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_changes_after_unmount_are_ignored() {
    let mut h = mount();
    h.handle.unmount().await.unwrap();
    (&mut h.task).await.unwrap();

    h.browser.set_external_fullscreen(true);
    h.browser.press_key(Key::Escape);
    settle().await;

    assert_eq!(h.browser.focus_count(), 0);
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_escape_outside_active_has_no_effect() {
    let mut h = mount();
    h.browser.set_external_fullscreen(true);
    settle().await;

    h.browser.press_key(Key::Escape);
    settle().await;

    assert!(h.drain().is_empty());
    assert_eq!(h.browser.key_subscribers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_escape_in_fullscreen_shows_advisory() {
    let mut h = mount();
    h.handle.launch().await.unwrap();
    sleep(Duration::from_secs(1)).await;
    assert!(h.handle.snapshot().await.unwrap().is_fullscreen);
    h.drain();

    h.browser.press_key(Key::Other("w".to_string()));
    h.browser.press_key(Key::Escape);
    settle().await;

    let notifications = h.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Fullscreen Active");
    assert_eq!(notifications[0].duration, Some(Duration::from_secs(3)));

    // The advisory never changes state.
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.is_fullscreen);
    assert_eq!(snapshot.phase, PhaseKind::Active);
}

#[tokio::test(start_paused = true)]
async fn test_escape_while_windowed_is_silent() {
    let mut h = mount_with(
        SimulatedBrowserConfig::default(),
        ControllerConfig {
            auto_fullscreen: false,
            ..ControllerConfig::default()
        },
    );
    h.handle.launch().await.unwrap();
    settle().await;
    h.drain();

    h.browser.press_key(Key::Escape);
    settle().await;
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_embed_load_notifies_ready_and_focuses() {
    let mut h = mount_with(
        SimulatedBrowserConfig::default(),
        ControllerConfig {
            auto_fullscreen: false,
            ..ControllerConfig::default()
        },
    );
    h.handle.select_version("1.5.2").await.unwrap();
    h.handle.launch().await.unwrap();
    settle().await;
    h.drain();

    assert!(h.browser.finish_load());
    settle().await;

    let notifications = h.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Game Loaded");
    assert_eq!(
        notifications[0].message,
        "Eaglercraft 1.5.2 is ready to play! Click inside the game to activate controls."
    );
    assert_eq!(h.browser.focus_count(), 1);
    assert_eq!(
        h.browser.sandbox().map(|s| s.attribute()).as_deref(),
        Some("allow-scripts allow-same-origin allow-pointer-lock allow-forms")
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_toggles_exit_once() {
    let mut h = mount();
    h.handle.launch().await.unwrap();
    sleep(Duration::from_secs(1)).await;
    assert!(h.browser.is_fullscreen());
    h.drain();

    let (first, second) = tokio::join!(
        h.handle.toggle_fullscreen(),
        h.handle.toggle_fullscreen()
    );
    assert_eq!(first.unwrap(), ToggleResponse::ExitRequested);
    assert_eq!(second.unwrap(), ToggleResponse::AlreadyPending);

    settle().await;
    assert_eq!(h.browser.exit_count(), 1);
    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(!snapshot.is_fullscreen);
    assert!(!snapshot.request_pending);

    // Slot is free again once the exit is confirmed.
    assert_eq!(
        h.handle.toggle_fullscreen().await.unwrap(),
        ToggleResponse::Requested
    );
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_unmount_aborts_in_flight_request() {
    let mut h = mount();
    h.handle.launch().await.unwrap();

    // Deferred request fires at 500ms; confirmation is due at 550ms.
    sleep(Duration::from_millis(520)).await;
    assert_eq!(h.browser.request_count(), 1);
    assert!(h.handle.snapshot().await.unwrap().request_pending);
    h.drain();

    h.handle.unmount().await.unwrap();
    (&mut h.task).await.unwrap();
    sleep(Duration::from_secs(1)).await;

    assert!(!h.browser.is_fullscreen());
    assert_eq!(h.browser.focus_count(), 0);
    assert!(h.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lagged_change_subscription_resyncs() {
    let config = ControllerConfig {
        auto_fullscreen: false,
        ..ControllerConfig::default()
    };
    let h = mount_with(SimulatedBrowserConfig::default(), config);

    // Overflow the change channel before the actor gets to run.
    for i in 0..101 {
        h.browser.set_external_fullscreen(i % 2 == 0);
    }
    assert!(h.browser.is_fullscreen());
    settle().await;

    let snapshot = h.handle.snapshot().await.unwrap();
    assert!(snapshot.is_fullscreen);

    // Still listening after the overflow.
    h.browser.set_external_fullscreen(false);
    settle().await;
    assert!(!h.handle.snapshot().await.unwrap().is_fullscreen);
}

#[tokio::test(start_paused = true)]
async fn test_handle_reports_session_id() {
    let h = mount();
    let snapshot = h.handle.snapshot().await.unwrap();
    assert_eq!(snapshot.session_id, h.handle.session_id());
    assert_eq!(h.handle.clone().session_id(), h.handle.session_id());
}
