//! Configuration layers.

use std::path::{Path, PathBuf};

use toml::Table;

use super::ConfigError;

const FRAMEWORK_DEFAULTS: &str = include_str!("defaults.toml");

/// One source of configuration keys.
///
/// File layers can be marked as required or optional. Required files that don't
/// exist cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub enum Layer {
    /// The framework defaults compiled into the crate.
    Framework,
    File { path: PathBuf, required: bool },
    Table(Table),
}

impl Layer {
    pub fn file(path: impl AsRef<Path>, required: bool) -> Self {
        Layer::File {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    /// Loads the layer's table.
    ///
    /// Returns `Ok(None)` for an optional file that doesn't exist.
    pub fn load(&self) -> Result<Option<Table>, ConfigError> {
        match self {
            Layer::Framework => toml::from_str(FRAMEWORK_DEFAULTS)
                .map(Some)
                .map_err(|e| ConfigError::ParseError {
                    path: PathBuf::from("defaults.toml"),
                    source: e,
                }),
            Layer::File { path, required } => load_config_file(path, *required),
            Layer::Table(table) => Ok(Some(table.clone())),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Layer::Framework => "framework defaults".to_string(),
            Layer::File { path, .. } => path.display().to_string(),
            Layer::Table(_) => "inline table".to_string(),
        }
    }
}

fn load_config_file(path: &Path, required: bool) -> Result<Option<Table>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_layer_loads_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "KEY = \"value\"").unwrap();

        let table = Layer::file(file.path(), true).load().unwrap().unwrap();
        assert_eq!(table.get("KEY"), Some(&toml::Value::String("value".into())));
    }

    #[test]
    fn test_file_layer_required_missing() {
        let result = Layer::file("/nonexistent/path/config.toml", true).load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_file_layer_optional_missing() {
        let result = Layer::file("/nonexistent/path/config.toml", false).load();
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_file_layer_parse_error_names_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "KEY = ").unwrap();

        let result = Layer::file(file.path(), false).load();
        match result {
            Err(ConfigError::ParseError { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_framework_defaults_parse() {
        let table = Layer::Framework.load().unwrap().unwrap();
        assert_eq!(table["DEFAULT_TIME_ZONE"].as_str(), Some("UTC"));
        assert_eq!(table["DEBUG"].as_bool(), Some(false));
    }
}
