pub mod app;
pub mod config;
pub mod context;
pub mod controller;
pub mod diagnostics;
pub mod dispatch;
pub mod layout;
pub mod registry;
pub mod router;
pub mod session;
pub mod urls;
mod error;

pub use app::{halt, Application};
pub use config::{Config, ConfigError, Layer, Settings};
pub use context::AppContext;
pub use controller::{ActionContext, Controller, EmptyController};
pub use diagnostics::{Diagnostic, ErrorHandler, ErrorKind};
pub use dispatch::{DispatchState, Dispatcher, Invocation, Response};
pub use error::Error;
pub use layout::Layout;
pub use registry::Registry;
pub use router::{Request, RequestTarget, Router};
pub use session::Session;
pub use urls::Urls;
