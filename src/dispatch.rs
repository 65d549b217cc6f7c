//! Controller and action dispatch.
//!
//! A dispatch moves through [`DispatchState`] in one direction:
//!
//! ```text
//! NotDispatched -> ControllerResolved -> ActionResolved -> Invoked
//!        \                 \                   \
//!         +-----------------+-------------------+--> Halted
//! ```
//!
//! An unregistered controller is not fatal as long as an empty controller is
//! registered: its `index` action runs instead.

use std::path::PathBuf;

use crate::context::AppContext;
use crate::controller::{ActionContext, Controller};
use crate::diagnostics::{self, ErrorHandler};
use crate::registry::{Registry, Resolved};
use crate::Error;

const DEFAULT_ACTION: &str = "index";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    NotDispatched,
    ControllerResolved,
    ActionResolved,
    Invoked,
    Halted,
}

/// Which method handled the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The requested action.
    Action(String),
    /// The controller's empty action, called for an unsupported action.
    EmptyAction(String),
    /// The empty controller's `index`, called for an unregistered controller.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub body: String,
    /// Registry path of the controller that was instantiated.
    pub controller: PathBuf,
    pub invocation: Invocation,
}

/// Dispatches one request. Use a fresh dispatcher per request.
#[derive(Debug)]
pub struct Dispatcher<'r> {
    registry: &'r Registry,
    handler: ErrorHandler,
    state: DispatchState,
}

impl<'r> Dispatcher<'r> {
    pub fn new(registry: &'r Registry, handler: ErrorHandler) -> Self {
        Self {
            registry,
            handler,
            state: DispatchState::NotDispatched,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Instantiates the target controller and invokes one action on it.
    ///
    /// Panics in the controller factory or the action are reported as
    /// [`Error::Fatal`].
    pub fn dispatch(&mut self, ctx: &mut AppContext) -> Result<Response, Error> {
        // A panic left over from an earlier request must not be replayed here.
        let _ = diagnostics::take_last_fatal();
        let result = self.run(ctx);
        if let Err(e) = &result {
            tracing::error!(error = %e, "Dispatch halted");
            self.state = DispatchState::Halted;
        }
        result
    }

    fn run(&mut self, ctx: &mut AppContext) -> Result<Response, Error> {
        let target = ctx.target().clone();
        let class = target.controller_class();

        let resolution = match self.registry.resolve(target.app(), &class)? {
            Resolved::Controller(resolution) => resolution,
            Resolved::Component { path, .. } => {
                return Err(Error::ClassMismatch { name: class, path });
            }
        };
        let controller_path = resolution.path().to_path_buf();
        let mut controller = self.handler.catch_fatal(|| Ok(resolution.instantiate()))?;
        self.state = DispatchState::ControllerResolved;

        let invocation = if !resolution.is_exact() {
            tracing::info!(
                app = %target.app(),
                controller = %class,
                fallback = %controller_path.display(),
                "Controller not registered, using empty controller"
            );
            Invocation::Fallback
        } else if controller.supports(target.action()) {
            Invocation::Action(target.action().to_string())
        } else {
            Invocation::EmptyAction(target.action().to_string())
        };
        self.state = DispatchState::ActionResolved;

        tracing::debug!(
            app = %target.app(),
            controller = %class,
            invocation = ?invocation,
            "Invoking action"
        );

        let mut cx = ActionContext::new(ctx, self.registry, self.handler);
        self.invoke(controller.as_mut(), &invocation, &mut cx)?;
        self.state = DispatchState::Invoked;

        Ok(Response {
            body: cx.into_body(),
            controller: controller_path,
            invocation,
        })
    }

    fn invoke(
        &self,
        controller: &mut dyn Controller,
        invocation: &Invocation,
        cx: &mut ActionContext<'_>,
    ) -> Result<(), Error> {
        self.handler.catch_fatal(|| match invocation {
            Invocation::Action(action) => controller.call(action, cx),
            Invocation::EmptyAction(action) => controller.empty_action(action, cx),
            Invocation::Fallback => {
                if controller.supports(DEFAULT_ACTION) {
                    controller.call(DEFAULT_ACTION, cx)
                } else {
                    Err(Error::MissingAction {
                        controller: cx.target_class(),
                        action: DEFAULT_ACTION.to_string(),
                    })
                }
            }
        })
    }
}
