//! Directory convention for applications, shared code and configuration.
//!
//! ```text
//! <root>/
//!   Common/Config/config.toml      shared config layer
//!   Common/Model/<Name>Model       models
//!   Common/Tool/<Name>             tools
//!   Common/Lib/<file>              user library files
//!   <App>/Config/config.toml       user config layer
//!   <App>/Controller/<Name>Controller
//! ```
//!
//! Registry entries are keyed by these paths, so diagnostics name the same
//! location a developer would look in.

use std::path::{Path, PathBuf};

/// Application whose controller directory holds the last-resort empty controller.
pub const DEFAULT_APP: &str = "Index";

/// Class name of the fallback controller.
pub const EMPTY_CONTROLLER: &str = "EmptyController";

const COMMON_DIR: &str = "Common";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new("Application")
    }
}

impl Layout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn common_dir(&self) -> PathBuf {
        self.root.join(COMMON_DIR)
    }

    pub fn shared_config(&self) -> PathBuf {
        self.common_dir().join("Config").join(CONFIG_FILE)
    }

    pub fn user_config(&self, app: &str) -> PathBuf {
        self.root.join(app).join("Config").join(CONFIG_FILE)
    }

    pub fn controller_dir(&self, app: &str) -> PathBuf {
        self.root.join(app).join("Controller")
    }

    pub fn controller_path(&self, app: &str, class: &str) -> PathBuf {
        self.controller_dir(app).join(class)
    }

    pub fn model_path(&self, class: &str) -> PathBuf {
        self.common_dir().join("Model").join(class)
    }

    pub fn tool_path(&self, class: &str) -> PathBuf {
        self.common_dir().join("Tool").join(class)
    }

    pub fn library_path(&self, file: &str) -> PathBuf {
        self.common_dir().join("Lib").join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_paths() {
        let layout = Layout::default();

        assert_eq!(
            layout.controller_path("Home", "UserController"),
            Path::new("Application/Home/Controller/UserController")
        );
        assert_eq!(
            layout.model_path("UserModel"),
            Path::new("Application/Common/Model/UserModel")
        );
        assert_eq!(
            layout.tool_path("Page"),
            Path::new("Application/Common/Tool/Page")
        );
        assert_eq!(
            layout.library_path("functions"),
            Path::new("Application/Common/Lib/functions")
        );
    }

    #[test]
    fn test_config_paths() {
        let layout = Layout::new("/srv/site");

        assert_eq!(
            layout.shared_config(),
            Path::new("/srv/site/Common/Config/config.toml")
        );
        assert_eq!(
            layout.user_config("Admin"),
            Path::new("/srv/site/Admin/Config/config.toml")
        );
    }
}
