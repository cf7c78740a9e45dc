//! Session controller actor.
//!
//! The controller owns the [`Session`](crate::session::Session), the
//! [`FullscreenCoordinator`](crate::fullscreen::FullscreenCoordinator) and the
//! [`InputInterceptor`](crate::input::InputInterceptor), and runs them on a
//! single tokio task. Caller commands, browser notifications, timers and
//! request completions are all processed one at a time by that task.
//!
//! ## Example
//!
//! ```
//! use eagler_portal::{
//!     browser::{SimulatedBrowser, ViewHost},
//!     catalog::VersionCatalog,
//!     config::ControllerConfig,
//!     controller::SessionController,
//!     notify::LogNotifier,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let browser = SimulatedBrowser::default();
//!     let host = ViewHost::simulated(&browser, Arc::new(LogNotifier));
//!     let (controller, handle) = SessionController::mount(
//!         Arc::new(VersionCatalog::default()),
//!         ControllerConfig::default(),
//!         host,
//!     );
//!     let task = tokio::spawn(controller.run());
//!
//!     handle.select_version("1.8.8").await.unwrap();
//!     handle.launch().await.unwrap();
//!     handle.unmount().await.unwrap();
//!     task.await.unwrap();
//! }
//! ```

pub mod actor;
pub mod errors;
pub mod messages;

pub use actor::{ControllerHandle, SessionController};
pub use errors::{ControllerError, ControllerResult};
pub use messages::{ControllerMessage, SessionSnapshot, ToggleResponse};
