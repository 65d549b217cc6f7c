use std::path::Path;

use toml::Table;

use super::{ConfigError, Layer, Settings};

/// Builder for loading configuration from layered TOML sources.
///
/// Layers are merged in registration order, with later layers overriding
/// earlier ones key by key. Values are replaced whole; nested tables are not
/// merged.
///
/// ## Example
///
/// ```no_run
/// use dragon_mvc::Config;
///
/// let settings = Config::builder()
///     .with_framework_defaults()
///     .with_file("Application/Common/Config/config.toml", true)
///     .build()?;
///
/// let debug = settings.get_bool("DEBUG").unwrap_or(false);
/// # Ok::<(), dragon_mvc::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    layers: Vec<Layer>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds the defaults shipped with the framework.
    pub fn with_framework_defaults(mut self) -> Self {
        self.layers.push(Layer::Framework);
        self
    }

    /// Adds a TOML file to be loaded.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.layers.push(Layer::file(path, required));
        self
    }

    /// Adds an in-memory table.
    pub fn with_table(mut self, table: Table) -> Self {
        self.layers.push(Layer::Table(table));
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Loads and merges every layer in order.
    pub fn build(self) -> Result<Settings, ConfigError> {
        let mut settings = Settings::new();
        for layer in &self.layers {
            settings.load_layer(layer)?;
        }
        Ok(settings)
    }
}
