pub mod residues;
pub mod table;
pub mod theme;
pub mod view;

use crate::config::{AppConfig, ConfigOverrides, build_config};
use crate::data::{AppDirs, fetch_table};
use crate::error::{CliError, Result};
use crate::preferences::{TomlPreferenceStore, system_prefers_dark};
use crate::render::Palette;
use crate::utils::progress::CliProgressHandler;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};
use zincsight::core::io::predictions::LoadError;
use zincsight::core::models::record::RecordSet;
use zincsight::core::theme::ThemeSettings;
use zincsight::engine::loader::LoadState;
use zincsight::engine::progress::ProgressReporter;
use zincsight::workflows;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub set_values: Vec<String>,
    pub quiet: bool,
}

impl GlobalOptions {
    /// Resolves the configuration, reading the per-user config file when no path was given.
    pub fn app_config(&self, overrides: &ConfigOverrides) -> Result<AppConfig> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => AppDirs::new().ok().and_then(|dirs| dirs.default_config_file()),
        };
        debug!("Configuration file: {:?}", &path);
        build_config(path.as_deref(), &self.set_values, overrides)
    }

    pub fn progress(&self) -> CliProgressHandler {
        if self.quiet {
            CliProgressHandler::hidden()
        } else {
            CliProgressHandler::new()
        }
    }
}

/// Fetches and parses the configured prediction table.
///
/// A table that cannot be fetched settles the load as failed with
/// [`LoadError::Unavailable`], the same way a malformed table does.
pub async fn load_records(config: &AppConfig, progress: &CliProgressHandler) -> Result<RecordSet> {
    let mut state = LoadState::default();
    match fetch_table(&config.data_source, config.viewer.fetch_timeout).await {
        Ok(content) => {
            let reporter = ProgressReporter::with_callback(progress.get_callback());
            state = workflows::load::run(&content, &config.reader, &reporter);
        }
        Err(e) => {
            warn!("Could not fetch prediction table from {}: {}", config.data_source, e);
            state.finish(Err(LoadError::Unavailable(e.to_string())))?;
        }
    }
    progress.clear();

    match state {
        LoadState::Ready(records) => Ok(records),
        LoadState::Failed(err) => Err(CliError::Load(err)),
        LoadState::Loading => Err(CliError::Other(anyhow::anyhow!(
            "Prediction table load did not settle"
        ))),
    }
}

pub fn preference_store() -> Result<TomlPreferenceStore> {
    TomlPreferenceStore::open(AppDirs::new()?.preferences_file())
}

/// The theme for this run. Unreadable preferences fall back to the system setting.
pub fn active_theme() -> ThemeSettings {
    match preference_store() {
        Ok(store) => ThemeSettings::load(&store, system_prefers_dark()),
        Err(e) => {
            warn!("Ignoring unreadable preferences: {}", e);
            ThemeSettings::load(&BTreeMap::<String, String>::new(), system_prefers_dark())
        }
    }
}

pub fn palette() -> Palette {
    Palette::new(active_theme().theme, console::colors_enabled())
}
