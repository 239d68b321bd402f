use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Placeholder replaced by the structure identifier in a [`UrlTemplate`].
pub const ID_PLACEHOLDER: &str = "{id}";

pub const DEFAULT_URL_TEMPLATE: &str = "https://alphafold.ebi.ac.uk/files/{id}.pdb";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("URL template '{0}' does not contain the '{{id}}' placeholder")]
    MissingPlaceholder(String),
    #[error("Viewport dimensions must be non-zero (got {width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
}

/// Pixel dimensions of the surface a rendering engine draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 840,
            height: 800,
        }
    }
}

/// Location of structure files, with `{id}` standing for the structure identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        if !template.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(template));
        }
        Ok(Self(template))
    }

    pub fn resolve(&self, structure_id: &str) -> String {
        self.0.replace(ID_PLACEHOLDER, structure_id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self(DEFAULT_URL_TEMPLATE.to_string())
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewerConfig {
    pub url_template: UrlTemplate,
    pub viewport: Viewport,
    /// Upper bound on a single structure fetch. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

#[derive(Default)]
pub struct ViewerConfigBuilder {
    url_template: Option<String>,
    viewport: Option<(u32, u32)>,
    fetch_timeout: Option<Duration>,
}

impl ViewerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = Some(template.into());
        self
    }
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Some((width, height));
        self
    }
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ViewerConfig, ConfigError> {
        let url_template = match self.url_template {
            Some(template) => UrlTemplate::new(template)?,
            None => UrlTemplate::default(),
        };
        let viewport = match self.viewport {
            Some((width, height)) => Viewport::new(width, height)?,
            None => Viewport::default(),
        };
        Ok(ViewerConfig {
            url_template,
            viewport,
            fetch_timeout: self.fetch_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_points_at_alphafold() {
        assert_eq!(
            UrlTemplate::default().resolve("P12345"),
            "https://alphafold.ebi.ac.uk/files/P12345.pdb"
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert_eq!(
            UrlTemplate::new("https://example.org/files.pdb"),
            Err(ConfigError::MissingPlaceholder(
                "https://example.org/files.pdb".to_string()
            ))
        );
    }

    #[test]
    fn builder_applies_defaults() {
        let config = ViewerConfigBuilder::new().build().unwrap();
        assert_eq!(config.viewport, Viewport { width: 840, height: 800 });
        assert_eq!(config.url_template, UrlTemplate::default());
        assert_eq!(config.fetch_timeout, None);
    }

    #[test]
    fn builder_validates_fields() {
        let config = ViewerConfigBuilder::new()
            .url_template("file:///data/{id}.pdb")
            .viewport(400, 300)
            .fetch_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(config.url_template.resolve("Q1"), "file:///data/Q1.pdb");
        assert_eq!(config.fetch_timeout, Some(Duration::from_secs(5)));

        let err = ViewerConfigBuilder::new().viewport(0, 10).build().unwrap_err();
        assert_eq!(err, ConfigError::EmptyViewport { width: 0, height: 10 });
    }
}
