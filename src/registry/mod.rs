//! Startup registry of controllers, models, tools and user libraries.
//!
//! Entries are keyed by their conventional [`Layout`] path, so a lookup that
//! fails reports the same location a file-based loader would have tried.
//!
//! Controller lookups fall back in order:
//! 1. `<root>/<app>/Controller/<Name>Controller`
//! 2. `<root>/<app>/Controller/EmptyController`
//! 3. `<root>/Index/Controller/EmptyController`

mod class;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::context::AppContext;
use crate::controller::{Controller, EmptyController};
use crate::layout::{Layout, DEFAULT_APP, EMPTY_CONTROLLER};
use crate::Error;

pub use class::ClassKind;

pub type ControllerFactory = Box<dyn Fn() -> Box<dyn Controller> + Send + Sync>;
pub type ComponentFactory = Box<dyn Fn() -> Box<dyn Any + Send> + Send + Sync>;
pub type LibraryInit = Box<dyn Fn(&mut AppContext) -> Result<(), Error> + Send + Sync>;

/// A controller found for a requested class name.
pub struct ControllerResolution<'r> {
    path: PathBuf,
    exact: bool,
    factory: &'r ControllerFactory,
}

impl ControllerResolution<'_> {
    /// Path of the entry that was found.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` if the requested class itself was found, `false` for an empty
    /// controller fallback.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn instantiate(&self) -> Box<dyn Controller> {
        (self.factory)()
    }
}

/// Outcome of a name-based lookup.
pub enum Resolved<'r> {
    Controller(ControllerResolution<'r>),
    Component {
        path: PathBuf,
        factory: &'r ComponentFactory,
    },
}

/// Maps class paths to constructors.
///
/// ```
/// use dragon_mvc::{ActionContext, Controller, Error, Layout, Registry};
///
/// struct UserController;
///
/// impl Controller for UserController {
///     fn supports(&self, action: &str) -> bool {
///         action == "index"
///     }
///
///     fn call(&mut self, _action: &str, cx: &mut ActionContext<'_>) -> Result<(), Error> {
///         cx.echo("users");
///         Ok(())
///     }
/// }
///
/// let registry = Registry::new(Layout::default())
///     .with_controller("Home", "UserController", || UserController)
///     .with_default_empty_controller();
///
/// let found = registry.resolve_controller("Home", "UserController")?;
/// assert!(found.is_exact());
/// # Ok::<(), Error>(())
/// ```
pub struct Registry {
    layout: Layout,
    controllers: HashMap<PathBuf, ControllerFactory>,
    components: HashMap<PathBuf, ComponentFactory>,
    libraries: HashMap<PathBuf, LibraryInit>,
}

impl Registry {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            controllers: HashMap::new(),
            components: HashMap::new(),
            libraries: HashMap::new(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Registers a controller class, e.g. `"UserController"`, for `app`.
    pub fn with_controller<F, C>(mut self, app: &str, class: &str, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        let path = self.layout.controller_path(app, class);
        self.controllers
            .insert(path, Box::new(move || Box::new(factory()) as Box<dyn Controller>));
        self
    }

    /// Registers the empty controller for `app`.
    pub fn with_empty_controller<F, C>(self, app: &str, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Controller + 'static,
    {
        self.with_controller(app, EMPTY_CONTROLLER, factory)
    }

    /// Registers the built-in [`EmptyController`] as the last-resort fallback.
    pub fn with_default_empty_controller(self) -> Self {
        self.with_empty_controller(DEFAULT_APP, || EmptyController)
    }

    /// Registers a model class; the name should contain `Model`.
    pub fn with_model<F, T>(mut self, class: &str, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Any + Send,
    {
        let path = self.layout.model_path(class);
        self.components.insert(path, boxed_component(factory));
        self
    }

    /// Registers a tool class.
    pub fn with_tool<F, T>(mut self, class: &str, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
        T: Any + Send,
    {
        let path = self.layout.tool_path(class);
        self.components.insert(path, boxed_component(factory));
        self
    }

    /// Registers a user library run when listed in `AUTO_LOAD_USER_FILE`.
    pub fn with_library<F>(mut self, file: &str, init: F) -> Self
    where
        F: Fn(&mut AppContext) -> Result<(), Error> + Send + Sync + 'static,
    {
        let path = self.layout.library_path(file);
        self.libraries.insert(path, Box::new(init));
        self
    }

    /// Looks up a class by name, classifying it with [`ClassKind::classify`].
    pub fn resolve(&self, app: &str, name: &str) -> Result<Resolved<'_>, Error> {
        match ClassKind::classify(name) {
            ClassKind::Controller => self
                .resolve_controller(app, name)
                .map(Resolved::Controller),
            ClassKind::Model => {
                let path = self.layout.model_path(name);
                match self.components.get(&path) {
                    Some(factory) => Ok(Resolved::Component { path, factory }),
                    None => Err(Error::ModelNotFound { path }),
                }
            }
            ClassKind::Tool => {
                let path = self.layout.tool_path(name);
                match self.components.get(&path) {
                    Some(factory) => Ok(Resolved::Component { path, factory }),
                    None => Err(Error::ToolNotFound { path }),
                }
            }
        }
    }

    /// Finds a controller, falling back to the app's empty controller and then
    /// the default app's. The error names the last path tried.
    pub fn resolve_controller(
        &self,
        app: &str,
        class: &str,
    ) -> Result<ControllerResolution<'_>, Error> {
        let candidates = [
            self.layout.controller_path(app, class),
            self.layout.controller_path(app, EMPTY_CONTROLLER),
            self.layout.controller_path(DEFAULT_APP, EMPTY_CONTROLLER),
        ];

        let mut last = None;
        for (attempt, path) in candidates.into_iter().enumerate() {
            if let Some(factory) = self.controllers.get(&path) {
                tracing::debug!(class, path = %path.display(), attempt, "Controller resolved");
                return Ok(ControllerResolution {
                    path,
                    exact: attempt == 0,
                    factory,
                });
            }
            last = Some(path);
        }

        Err(Error::ControllerNotFound {
            path: last.unwrap_or_default(),
        })
    }

    /// Runs a registered user library against the context.
    pub fn run_library(&self, file: &str, ctx: &mut AppContext) -> Result<(), Error> {
        let path = self.layout.library_path(file);
        let init = self
            .libraries
            .get(&path)
            .ok_or(Error::LibraryNotFound { path })?;
        init(ctx)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("layout", &self.layout)
            .field("controllers", &self.controllers.keys().collect::<Vec<_>>())
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("libraries", &self.libraries.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn boxed_component<F, T>(factory: F) -> ComponentFactory
where
    F: Fn() -> T + Send + Sync + 'static,
    T: Any + Send,
{
    Box::new(move || Box::new(factory()) as Box<dyn Any + Send>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ActionContext;

    struct UserController;

    impl Controller for UserController {
        fn supports(&self, action: &str) -> bool {
            action == "index"
        }

        fn call(&mut self, _action: &str, _cx: &mut ActionContext<'_>) -> Result<(), Error> {
            Ok(())
        }
    }

    struct UserModel {
        table: &'static str,
    }

    #[test]
    fn test_exact_controller_wins_over_fallbacks() {
        let registry = Registry::new(Layout::default())
            .with_controller("Home", "UserController", || UserController)
            .with_empty_controller("Home", || EmptyController)
            .with_default_empty_controller();

        let found = registry.resolve_controller("Home", "UserController").unwrap();
        assert!(found.is_exact());
        assert_eq!(
            found.path(),
            Path::new("Application/Home/Controller/UserController")
        );
    }

    #[test]
    fn test_app_empty_controller_before_default() {
        let registry = Registry::new(Layout::default())
            .with_empty_controller("Home", || EmptyController)
            .with_default_empty_controller();

        let found = registry.resolve_controller("Home", "GhostController").unwrap();
        assert!(!found.is_exact());
        assert_eq!(
            found.path(),
            Path::new("Application/Home/Controller/EmptyController")
        );
    }

    #[test]
    fn test_default_empty_controller_last() {
        let registry = Registry::new(Layout::default()).with_default_empty_controller();

        let found = registry.resolve_controller("Home", "GhostController").unwrap();
        assert!(!found.is_exact());
        assert_eq!(
            found.path(),
            Path::new("Application/Index/Controller/EmptyController")
        );
    }

    #[test]
    fn test_missing_controller_names_last_path() {
        let registry = Registry::new(Layout::default());

        match registry.resolve_controller("Home", "GhostController") {
            Err(Error::ControllerNotFound { path }) => assert_eq!(
                path,
                Path::new("Application/Index/Controller/EmptyController")
            ),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected controller lookup to fail"),
        }
    }

    #[test]
    fn test_resolve_model_and_tool() {
        let registry = Registry::new(Layout::default())
            .with_model("UserModel", || UserModel { table: "users" })
            .with_tool("Page", || 20usize);

        match registry.resolve("Home", "UserModel").unwrap() {
            Resolved::Component { path, factory } => {
                assert_eq!(path, Path::new("Application/Common/Model/UserModel"));
                let model = factory().downcast::<UserModel>().unwrap();
                assert_eq!(model.table, "users");
            }
            Resolved::Controller(_) => panic!("expected a model"),
        }

        assert!(matches!(
            registry.resolve("Home", "Page"),
            Ok(Resolved::Component { .. })
        ));
    }

    #[test]
    fn test_missing_model_and_tool_are_errors() {
        let registry = Registry::new(Layout::default());

        assert!(matches!(
            registry.resolve("Home", "OrderModel"),
            Err(Error::ModelNotFound { .. })
        ));
        assert!(matches!(
            registry.resolve("Home", "Captcha"),
            Err(Error::ToolNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_library() {
        let registry = Registry::new(Layout::default());
        let mut ctx = crate::context::AppContext::builder()
            .with_settings(
                crate::config::Config::builder()
                    .with_framework_defaults()
                    .build()
                    .unwrap(),
            )
            .with_target(crate::router::RequestTarget::new("Home", "Index", "index"))
            .with_urls(crate::urls::Urls::derive("example.com", "/index.php", "Home"))
            .build()
            .unwrap();

        match registry.run_library("functions", &mut ctx) {
            Err(Error::LibraryNotFound { path }) => {
                assert_eq!(path, Path::new("Application/Common/Lib/functions"))
            }
            other => panic!("expected missing library, got {other:?}"),
        }
    }
}
