//! The persisted light/dark theme preference.
//!
//! The preference lives in a key-value store under [`THEME_KEY`]. When the key is unset
//! the system preference decides. The resolved [`ThemeSettings`] value is passed to
//! whatever renders output instead of being read from global state.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Key under which the theme preference is stored.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Preference store error: {0}")]
    Store(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Interprets a stored preference value. Only the exact string `dark` selects the
    /// dark theme; anything else reads as light.
    pub fn from_stored(value: &str) -> Self {
        if value == Self::Dark.as_str() {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string key-value store backing user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError>;
    fn remove(&mut self, key: &str) -> Result<(), ThemeError>;
}

impl PreferenceStore for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        BTreeMap::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), ThemeError> {
        BTreeMap::remove(self, key);
        Ok(())
    }
}

/// Where the active theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Stored,
    System,
}

/// The theme in effect for one run of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSettings {
    pub theme: Theme,
    pub source: ThemeSource,
}

impl ThemeSettings {
    /// Reads the stored preference, falling back to the system preference only when
    /// no value is stored.
    pub fn load(store: &impl PreferenceStore, system_prefers_dark: bool) -> Self {
        match store.get(THEME_KEY) {
            Some(value) => Self {
                theme: Theme::from_stored(&value),
                source: ThemeSource::Stored,
            },
            None => Self {
                theme: if system_prefers_dark {
                    Theme::Dark
                } else {
                    Theme::Light
                },
                source: ThemeSource::System,
            },
        }
    }

    /// Changes the theme and writes it back to the store.
    pub fn set(
        &mut self,
        theme: Theme,
        store: &mut impl PreferenceStore,
    ) -> Result<(), ThemeError> {
        store.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        self.source = ThemeSource::Stored;
        Ok(())
    }

    pub fn toggle(&mut self, store: &mut impl PreferenceStore) -> Result<Theme, ThemeError> {
        let next = self.theme.toggled();
        self.set(next, store)?;
        Ok(next)
    }

    /// Removes the stored preference so the system preference applies again.
    pub fn reset(
        store: &mut impl PreferenceStore,
        system_prefers_dark: bool,
    ) -> Result<Self, ThemeError> {
        store.remove(THEME_KEY)?;
        Ok(Self::load(store, system_prefers_dark))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_preference_falls_back_to_system() {
        let store: BTreeMap<String, String> = BTreeMap::new();
        let dark = ThemeSettings::load(&store, true);
        assert_eq!(dark.theme, Theme::Dark);
        assert_eq!(dark.source, ThemeSource::System);
        assert_eq!(ThemeSettings::load(&store, false).theme, Theme::Light);
    }

    #[test]
    fn stored_preference_wins_over_system() {
        let mut store = BTreeMap::new();
        store.insert(THEME_KEY.to_string(), "light".to_string());
        let settings = ThemeSettings::load(&store, true);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.source, ThemeSource::Stored);
    }

    #[test]
    fn unrecognised_stored_value_reads_as_light() {
        let mut store = BTreeMap::new();
        store.insert(THEME_KEY.to_string(), "sepia".to_string());
        let settings = ThemeSettings::load(&store, true);
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.source, ThemeSource::Stored);
    }

    #[test]
    fn stored_value_must_match_dark_exactly() {
        let mut store = BTreeMap::new();
        for value in ["Dark", " dark", "DARK", ""] {
            store.insert(THEME_KEY.to_string(), value.to_string());
            let settings = ThemeSettings::load(&store, false);
            assert_eq!(settings.theme, Theme::Light, "{:?}", value);
            assert_eq!(settings.source, ThemeSource::Stored);
        }
        store.insert(THEME_KEY.to_string(), "dark".to_string());
        assert_eq!(ThemeSettings::load(&store, false).theme, Theme::Dark);
    }

    #[test]
    fn toggle_writes_through_to_store() {
        let mut store: BTreeMap<String, String> = BTreeMap::new();
        let mut settings = ThemeSettings::load(&store, false);
        assert_eq!(settings.toggle(&mut store), Ok(Theme::Dark));
        assert_eq!(store.get(THEME_KEY).map(String::as_str), Some("dark"));
        assert_eq!(ThemeSettings::load(&store, false).theme, Theme::Dark);
    }

    #[test]
    fn reset_removes_stored_preference() {
        let mut store = BTreeMap::new();
        store.insert(THEME_KEY.to_string(), "dark".to_string());
        let settings = ThemeSettings::reset(&mut store, false).unwrap();
        assert!(store.is_empty());
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.source, ThemeSource::System);
    }
}
