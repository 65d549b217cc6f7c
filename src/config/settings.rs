use serde::de::DeserializeOwned;
use serde::Deserialize;
use toml::{Table, Value};

use super::{ConfigError, Layer};

/// The merged configuration store.
///
/// Keys are merged at the top level only: a key present in a later layer
/// replaces the earlier value whole, tables and arrays included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    table: Table,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a layer and merges it over the current keys.
    ///
    /// A missing optional file leaves the store untouched.
    pub fn load_layer(&mut self, layer: &Layer) -> Result<(), ConfigError> {
        match layer.load()? {
            Some(table) => {
                tracing::debug!(layer = %layer.describe(), keys = table.len(), "Merging config layer");
                self.merge(table);
            }
            None => {
                tracing::debug!(layer = %layer.describe(), "Optional config layer absent, skipped");
            }
        }
        Ok(())
    }

    pub fn merge(&mut self, overlay: Table) {
        for (key, value) in overlay {
            self.table.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.table.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn as_table(&self) -> &Table {
        &self.table
    }

    /// Deserializes the whole store into `T`.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Value::Table(self.table.clone())
            .try_into()
            .map_err(ConfigError::DeserializeError)
    }

    /// Reads the keys the bootstrap itself consumes.
    pub fn core(&self) -> Result<CoreSettings, ConfigError> {
        let core: CoreSettings = self.extract()?;
        if core.time_zone.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "DEFAULT_TIME_ZONE",
                reason: "time zone must not be empty".to_string(),
            });
        }
        Ok(core)
    }
}

/// Keys consumed directly by the bootstrap.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoreSettings {
    #[serde(rename = "DEFAULT_TIME_ZONE")]
    pub time_zone: String,

    #[serde(rename = "SESSION_AUTO_START", default)]
    pub session_auto_start: bool,

    #[serde(rename = "AUTO_LOAD_USER_FILE", default)]
    pub user_files: Vec<String>,

    #[serde(rename = "DEBUG", default)]
    pub debug: bool,
}
