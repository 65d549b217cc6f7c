//! Controller capability interface and the per-action context.

use std::any::Any;

use crate::context::AppContext;
use crate::diagnostics::{Diagnostic, ErrorHandler, ErrorKind};
use crate::registry::{Registry, Resolved};
use crate::Error;

/// A group of related request actions.
///
/// The dispatcher asks [`supports`](Self::supports) before calling an action.
/// Unsupported actions go to [`empty_action`](Self::empty_action), which fails
/// with [`Error::MissingAction`] unless the controller overrides it.
///
/// ```
/// use dragon_mvc::{ActionContext, Controller, Error};
///
/// struct ArticleController;
///
/// impl Controller for ArticleController {
///     fn supports(&self, action: &str) -> bool {
///         matches!(action, "index" | "show")
///     }
///
///     fn call(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Result<(), Error> {
///         match action {
///             "index" => cx.echo("all articles"),
///             _ => cx.echo("one article"),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Controller {
    fn supports(&self, action: &str) -> bool;

    fn call(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Result<(), Error>;

    fn empty_action(&mut self, action: &str, cx: &mut ActionContext<'_>) -> Result<(), Error> {
        Err(Error::MissingAction {
            controller: cx.target_class(),
            action: action.to_string(),
        })
    }
}

/// Fallback controller used when the requested one is not registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyController;

impl Controller for EmptyController {
    fn supports(&self, action: &str) -> bool {
        action == "index"
    }

    fn call(&mut self, _action: &str, cx: &mut ActionContext<'_>) -> Result<(), Error> {
        let target = cx.app().target();
        let page = format!(
            "404 Not Found: {}/{}/{}",
            target.app(),
            target.controller(),
            target.action()
        );
        cx.echo(&page);
        Ok(())
    }
}

/// What an action sees while it runs.
pub struct ActionContext<'a> {
    app: &'a mut AppContext,
    registry: &'a Registry,
    handler: ErrorHandler,
    body: String,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(app: &'a mut AppContext, registry: &'a Registry, handler: ErrorHandler) -> Self {
        Self {
            app,
            registry,
            handler,
            body: String::new(),
        }
    }

    pub fn app(&self) -> &AppContext {
        &*self.app
    }

    pub fn app_mut(&mut self) -> &mut AppContext {
        &mut *self.app
    }

    /// Class name of the requested controller.
    pub fn target_class(&self) -> String {
        self.app.target().controller_class()
    }

    /// Appends to the response body.
    pub fn echo(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// Instantiates a registered model or tool by class name.
    ///
    /// Names containing `Model` resolve under the model directory, anything
    /// else under the tool directory. Fails if the entry builds a type other
    /// than `T`.
    pub fn load<T: Any>(&self, name: &str) -> Result<T, Error> {
        match self.registry.resolve(self.app.target().app(), name)? {
            Resolved::Component { path, factory } => {
                factory().downcast::<T>().map(|boxed| *boxed).map_err(|_| Error::ClassMismatch {
                    name: name.to_string(),
                    path,
                })
            }
            Resolved::Controller(resolution) => Err(Error::ClassMismatch {
                name: name.to_string(),
                path: resolution.path().to_path_buf(),
            }),
        }
    }

    /// Raises a diagnostic located at the caller.
    ///
    /// Fatal kinds return [`Error::Fatal`]; advisory kinds append the notice
    /// view to the body in debug mode and are otherwise ignored.
    #[track_caller]
    pub fn trigger(&mut self, kind: ErrorKind, message: impl Into<String>) -> Result<(), Error> {
        let report = Diagnostic::here(kind, message);
        if let Some(notice) = self.handler.on_error(report)? {
            self.body.push_str(&notice.to_string());
        }
        Ok(())
    }

    pub(crate) fn into_body(self) -> String {
        self.body
    }
}
