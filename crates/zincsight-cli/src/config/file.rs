use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use zincsight::core::io::predictions::DuplicateKeyPolicy;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDataConfig {
    pub source: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLoaderConfig {
    pub duplicate_keys: Option<DuplicateKeyPolicy>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileStructureConfig {
    pub url_template: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileTableConfig {
    pub page_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub data: Option<FileDataConfig>,
    pub loader: Option<FileLoaderConfig>,
    pub structure: Option<FileStructureConfig>,
    pub table: Option<FileTableConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_parses_kebab_case_keys() {
        let config = FileConfig::from_toml(
            r#"
            [data]
            source = "https://example.org/predictions.csv"

            [loader]
            duplicate-keys = "warn"

            [structure]
            url-template = "https://example.org/{id}.pdb"
            timeout-secs = 30

            [table]
            page-size = 25
            "#,
        )
        .unwrap();

        assert_eq!(
            config.data.unwrap().source.as_deref(),
            Some("https://example.org/predictions.csv")
        );
        assert_eq!(
            config.loader.unwrap().duplicate_keys,
            Some(DuplicateKeyPolicy::Warn)
        );
        let structure = config.structure.unwrap();
        assert_eq!(structure.timeout_secs, Some(30));
        assert_eq!(config.table.unwrap().page_size, Some(25));
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(FileConfig::from_toml("").unwrap(), FileConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[table]\npage_size = 5\n").is_err());
        assert!(FileConfig::from_toml("[viewer]\nwidth = 5\n").is_err());
        assert!(FileConfig::from_toml("[loader]\nduplicate-keys = \"merge\"\n").is_err());
    }

    #[test]
    fn from_file_reports_the_offending_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zincsight.toml");
        fs::write(&path, "[table]\npage-size = \"ten\"\n").unwrap();

        let err = FileConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { path: p, .. } if p == path));
    }
}
