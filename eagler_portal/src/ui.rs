//! Process-wide UI state: colour theme and the mobile navigation menu.
//!
//! Created once at startup and passed by reference to whoever needs it.
//! There is no teardown; the store lives as long as the process.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, PoisonError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{other}'")),
        }
    }
}

/// Where the chosen theme is remembered between visits
pub trait ThemePreferences: Send + Sync {
    fn load(&self) -> Option<Theme>;
    fn save(&self, theme: Theme);
}

/// Keeps the preference for the lifetime of the process only
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    theme: Mutex<Option<Theme>>,
}

impl MemoryPreferences {
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme: Mutex::new(Some(theme)),
        }
    }
}

impl ThemePreferences for MemoryPreferences {
    fn load(&self) -> Option<Theme> {
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save(&self, theme: Theme) {
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner) = Some(theme);
    }
}

pub struct UiStore<P: ThemePreferences> {
    preferences: P,
    theme: Theme,
    mobile_menu_open: bool,
}

impl<P: ThemePreferences> UiStore<P> {
    /// Initialise from the stored preference, falling back to the platform's
    /// dark-mode preference, then to light.
    pub fn init(preferences: P, platform_prefers_dark: bool) -> Self {
        let theme = preferences.load().unwrap_or(if platform_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        });
        preferences.save(theme);

        Self {
            preferences,
            theme,
            mobile_menu_open: false,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.preferences.save(theme);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }

    pub fn close_mobile_menu(&mut self) {
        self.mobile_menu_open = false;
    }
}
