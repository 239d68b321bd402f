use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use zincsight::core::io::predictions::LoadError;
use zincsight::core::table::TableError;
use zincsight::core::theme::ThemeError;
use zincsight::engine::config::ConfigError;
use zincsight::engine::error::ViewerError;
use zincsight::engine::loader::TransitionError;
use zincsight::workflows::view::RecordNotFound;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Data temporarily unavailable: {0}")]
    Load(#[source] Arc<LoadError>),

    #[error(transparent)]
    LoadState(#[from] TransitionError),

    #[error("Failed to open '{key}': {source}")]
    Viewer {
        key: String,
        #[source]
        source: Arc<ViewerError>,
    },

    #[error(transparent)]
    RecordNotFound(#[from] RecordNotFound),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        Self::Load(Arc::new(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
