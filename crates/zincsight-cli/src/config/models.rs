use crate::data::DataSource;
use zincsight::core::io::predictions::ReaderOptions;
use zincsight::engine::config::ViewerConfig;

/// Fully resolved settings for one run of the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_source: DataSource,
    pub reader: ReaderOptions,
    pub viewer: ViewerConfig,
    pub page_size: usize,
}
