use zincsight::core::io::predictions::DuplicateKeyPolicy;
use zincsight::core::table::DEFAULT_PAGE_SIZE;
use zincsight::engine::config::DEFAULT_URL_TEMPLATE;

pub const DEFAULT_DATA_SOURCE: &str = "data.csv";

pub struct DefaultsConfig {
    pub data_source: String,
    pub duplicate_keys: DuplicateKeyPolicy,
    pub url_template: String,
    pub timeout_secs: Option<u64>,
    pub page_size: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            data_source: DEFAULT_DATA_SOURCE.to_string(),
            duplicate_keys: DuplicateKeyPolicy::Reject,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout_secs: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
