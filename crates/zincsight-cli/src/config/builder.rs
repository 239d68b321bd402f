use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::data::DataSource;
use crate::error::{CliError, Result};
use crate::utils::parser;
use std::path::Path;
use std::time::Duration;
use zincsight::core::io::predictions::{DuplicateKeyPolicy, ReaderOptions};
use zincsight::engine::config::ViewerConfigBuilder;

/// Values given as explicit command-line flags. They win over every other layer.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub data_source: Option<String>,
    pub url_template: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<usize>,
}

/// Layers defaults, the config file, `--set` values and CLI flags into an [`AppConfig`].
pub fn build_config(
    config_path: Option<&Path>,
    set_values: &[String],
    overrides: &ConfigOverrides,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, set_values)?;

    let data_file = file_config.data.take().unwrap_or_default();
    let loader_file = file_config.loader.take().unwrap_or_default();
    let structure_file = file_config.structure.take().unwrap_or_default();
    let table_file = file_config.table.take().unwrap_or_default();

    let data_source: DataSource = overrides
        .data_source
        .as_deref()
        .or(data_file.source.as_deref())
        .unwrap_or(&defaults.data_source)
        .parse()?;

    let page_size = overrides
        .page_size
        .or(table_file.page_size)
        .unwrap_or(defaults.page_size);
    if page_size == 0 {
        return Err(CliError::Config("`table.page-size` must be at least 1.".to_string()));
    }

    let url_template = overrides
        .url_template
        .clone()
        .or(structure_file.url_template)
        .unwrap_or(defaults.url_template);
    let mut viewer = ViewerConfigBuilder::new().url_template(url_template);
    if let Some(secs) = overrides
        .timeout_secs
        .or(structure_file.timeout_secs)
        .or(defaults.timeout_secs)
    {
        if secs == 0 {
            return Err(CliError::Config(
                "`structure.timeout-secs` must be at least 1.".to_string(),
            ));
        }
        viewer = viewer.fetch_timeout(Duration::from_secs(secs));
    }

    Ok(AppConfig {
        data_source,
        reader: ReaderOptions {
            duplicate_keys: loader_file
                .duplicate_keys
                .unwrap_or(defaults.duplicate_keys),
        },
        viewer: viewer.build()?,
        page_size,
    })
}

fn apply_set_values(mut file_config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) = parser::parse_key_value(kv_pair)
            .map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "data.source" => {
                file_config.data.get_or_insert_with(Default::default).source =
                    Some(value_str.to_string());
            }
            "loader.duplicate-keys" => {
                let policy = match value_str {
                    "reject" => DuplicateKeyPolicy::Reject,
                    "warn" => DuplicateKeyPolicy::Warn,
                    _ => {
                        return Err(CliError::Config(format!(
                            "Invalid value for {}: {} (expected 'reject' or 'warn')",
                            key, value_str
                        )));
                    }
                };
                file_config
                    .loader
                    .get_or_insert_with(Default::default)
                    .duplicate_keys = Some(policy);
            }
            "structure.url-template" => {
                file_config
                    .structure
                    .get_or_insert_with(Default::default)
                    .url_template = Some(value_str.to_string());
            }
            "structure.timeout-secs" => {
                file_config
                    .structure
                    .get_or_insert_with(Default::default)
                    .timeout_secs = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "table.page-size" => {
                file_config
                    .table
                    .get_or_insert_with(Default::default)
                    .page_size = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(file_config)
}
