//! File-backed user preferences.

use crate::error::{CliError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zincsight::core::theme::{PreferenceStore, ThemeError};

/// A flat string table persisted as TOML. Every change is written through immediately.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlPreferenceStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: anyhow::Error::new(e),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened preference store {:?}", &path);
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> std::result::Result<(), ThemeError> {
        let write = || -> Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = toml::to_string(&self.values).map_err(anyhow::Error::new)?;
            fs::write(&self.path, content)?;
            Ok(())
        };
        write().map_err(|e| ThemeError::Store(e.to_string()))
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), ThemeError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), ThemeError> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// Best guess at whether the terminal has a dark background.
///
/// Reads `COLORFGBG` (`fg;bg`, set by many terminal emulators); background colours 0-6
/// and 8 are dark. Without the variable a dark background is assumed.
pub fn system_prefers_dark() -> bool {
    prefers_dark_from(std::env::var("COLORFGBG").ok().as_deref())
}

fn prefers_dark_from(colorfgbg: Option<&str>) -> bool {
    let Some(value) = colorfgbg else {
        return true;
    };
    match value.rsplit(';').next().map(str::trim).map(str::parse::<u8>) {
        Some(Ok(bg)) => bg <= 6 || bg == 8,
        _ => {
            warn!("Ignoring unrecognized COLORFGBG value '{}'", value);
            true
        }
    }
}
