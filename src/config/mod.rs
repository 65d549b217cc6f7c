//! Configuration loading and management.

mod builder;
mod error;
mod layer;
mod settings;

pub use builder::Config;
pub use error::ConfigError;
pub use layer::Layer;
pub use settings::{CoreSettings, Settings};
