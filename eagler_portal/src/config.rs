//! Controller configuration.
//!
//! Defaults match the portal's behaviour. Every value can be overridden from
//! the environment; the host binary may override further from CLI flags.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound for the pre-fullscreen delay. Longer waits fall outside the
/// user-gesture window browsers allow for fullscreen requests.
pub const MAX_FULLSCREEN_DELAY: Duration = Duration::from_secs(5);

pub const DEFAULT_FULLSCREEN_DELAY_MS: u64 = 500;
pub const DEFAULT_ADVISORY_DURATION_MS: u64 = 3_000;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Session controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Wait between entering `Active` and the automatic fullscreen request.
    /// Best-effort: gives the embed time to mount, guarantees nothing.
    pub fullscreen_delay: Duration,

    /// Request fullscreen automatically after launch
    pub auto_fullscreen: bool,

    /// Display time of the Escape advisory
    pub advisory_duration: Duration,

    /// Game name used in notification texts
    pub game_title: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            fullscreen_delay: Duration::from_millis(DEFAULT_FULLSCREEN_DELAY_MS),
            auto_fullscreen: true,
            advisory_duration: Duration::from_millis(DEFAULT_ADVISORY_DURATION_MS),
            game_title: "Eaglercraft".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables
    ///
    /// Recognised variables:
    /// - `PORTAL_FULLSCREEN_DELAY_MS` (default: 500)
    /// - `PORTAL_AUTO_FULLSCREEN` (default: true)
    /// - `PORTAL_ADVISORY_DURATION_MS` (default: 3000)
    /// - `PORTAL_GAME_TITLE` (default: Eaglercraft)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fullscreen_delay: Duration::from_millis(parse_env_or(
                "PORTAL_FULLSCREEN_DELAY_MS",
                DEFAULT_FULLSCREEN_DELAY_MS,
            )),
            auto_fullscreen: parse_env_or("PORTAL_AUTO_FULLSCREEN", defaults.auto_fullscreen),
            advisory_duration: Duration::from_millis(parse_env_or(
                "PORTAL_ADVISORY_DURATION_MS",
                DEFAULT_ADVISORY_DURATION_MS,
            )),
            game_title: std::env::var("PORTAL_GAME_TITLE").unwrap_or(defaults.game_title),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fullscreen_delay > MAX_FULLSCREEN_DELAY {
            return Err(ConfigError::Invalid {
                var: "PORTAL_FULLSCREEN_DELAY_MS".to_string(),
                reason: format!(
                    "Must be at most {} ms",
                    MAX_FULLSCREEN_DELAY.as_millis()
                ),
            });
        }

        if self.advisory_duration.is_zero() {
            return Err(ConfigError::Invalid {
                var: "PORTAL_ADVISORY_DURATION_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game_title.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "PORTAL_GAME_TITLE".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
