use crate::error::{CliError, Result};
use async_trait::async_trait;
use directories::ProjectDirs;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};
use zincsight::engine::config::{UrlTemplate, ViewerConfig};
use zincsight::engine::source::{SourceError, StructureSource};

pub const CONFIG_FILE_NAME: &str = "zincsight.toml";
pub const PREFERENCES_FILE_NAME: &str = "preferences.toml";

/// Where a prediction table is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl FromStr for DataSource {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CliError::Argument("data source cannot be empty".to_string()));
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Reads the whole prediction table text from `source`.
pub async fn fetch_table(source: &DataSource, timeout: Option<Duration>) -> Result<String> {
    match source {
        DataSource::Path(path) => {
            debug!("Reading prediction table from {:?}", path);
            Ok(tokio::fs::read_to_string(path).await?)
        }
        DataSource::Url(url) => {
            info!("Downloading prediction table from {}", url);
            let client = build_client(timeout)?;
            let response = client.get(url).send().await?.error_for_status()?;
            Ok(response.text().await?)
        }
    }
}

fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Downloads structure files from a URL template over HTTP.
pub struct HttpStructureSource {
    client: reqwest::Client,
    template: UrlTemplate,
    timeout: Option<Duration>,
}

impl HttpStructureSource {
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.fetch_timeout)?,
            template: config.url_template.clone(),
            timeout: config.fetch_timeout,
        })
    }

    pub fn url_for(&self, structure_id: &str) -> String {
        self.template.resolve(structure_id)
    }

    fn map_error(&self, err: reqwest::Error) -> SourceError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => SourceError::Timeout(timeout),
            _ => SourceError::Request(err.to_string()),
        }
    }
}

#[async_trait]
impl StructureSource for HttpStructureSource {
    async fn fetch(&self, structure_id: &str) -> std::result::Result<String, SourceError> {
        let url = self.url_for(structure_id);
        debug!("Fetching structure from {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(structure_id.to_string()));
        }
        let response = response.error_for_status().map_err(|e| self.map_error(e))?;
        response.text().await.map_err(|e| self.map_error(e))
    }
}

/// Per-user directories of the application.
#[derive(Debug, Clone)]
pub struct AppDirs {
    config_dir: PathBuf,
}

impl AppDirs {
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("org", "zincsight", "zincsight").ok_or_else(|| {
            CliError::Config("Could not determine the user configuration directory.".to_string())
        })?;
        let config_dir = dirs.config_dir().to_path_buf();
        debug!("Using configuration directory {:?}", &config_dir);
        Ok(Self { config_dir })
    }

    #[cfg(test)]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.config_dir.join(PREFERENCES_FILE_NAME)
    }

    /// The config file to read when none is given explicitly, if it exists.
    pub fn default_config_file(&self) -> Option<PathBuf> {
        let path = self.config_file();
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn data_source_distinguishes_urls_from_paths() {
        assert_eq!(
            "https://example.org/data.csv".parse::<DataSource>().unwrap(),
            DataSource::Url("https://example.org/data.csv".to_string())
        );
        assert_eq!(
            "HTTP://example.org/data.csv".parse::<DataSource>().unwrap(),
            DataSource::Url("HTTP://example.org/data.csv".to_string())
        );
        assert_eq!(
            " ./data.csv ".parse::<DataSource>().unwrap(),
            DataSource::Path(PathBuf::from("./data.csv"))
        );
        assert!(matches!(
            "  ".parse::<DataSource>(),
            Err(CliError::Argument(_))
        ));
    }

    #[tokio::test]
    async fn local_table_is_read_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let text = fetch_table(&DataSource::Path(path), None).await.unwrap();
        assert_eq!(text, "a,b\n1,2\n");
    }

    #[tokio::test]
    async fn missing_local_table_is_io_error() {
        let dir = tempdir().unwrap();
        let result = fetch_table(&DataSource::Path(dir.path().join("nope.csv")), None).await;
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn http_source_resolves_template() {
        let source = HttpStructureSource::new(&ViewerConfig::default()).unwrap();
        assert_eq!(
            source.url_for("Q9Y6K9"),
            "https://alphafold.ebi.ac.uk/files/Q9Y6K9.pdb"
        );
    }

    #[test]
    fn app_dirs_place_files_in_config_dir() {
        let dir = tempdir().unwrap();
        let dirs = AppDirs::with_config_dir(dir.path());
        assert_eq!(dirs.preferences_file(), dir.path().join("preferences.toml"));
        assert_eq!(dirs.default_config_file(), None);

        fs::write(dirs.config_file(), "").unwrap();
        assert_eq!(dirs.default_config_file(), Some(dir.path().join("zincsight.toml")));
    }
}
