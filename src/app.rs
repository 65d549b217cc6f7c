//! Request bootstrap.

use crate::config::{Config, Layer};
use crate::context::AppContext;
use crate::diagnostics::{install_fatal_hook, take_last_fatal, ErrorHandler};
use crate::dispatch::{Dispatcher, Response};
use crate::layout::Layout;
use crate::registry::Registry;
use crate::router::{Request, Router};
use crate::urls::Urls;
use crate::Error;

/// Front controller: bootstraps a request and dispatches it.
///
/// For each request, [`run`](Self::run) in order:
/// 1. merges the framework defaults and the shared config layer,
/// 2. routes the request, then merges the app's optional user layer,
/// 3. installs the fatal-error hook,
/// 4. derives the request URLs and builds the [`AppContext`],
/// 5. runs the user libraries listed in `AUTO_LOAD_USER_FILE`,
/// 6. dispatches to the controller.
///
/// Any failure stops the sequence and is returned as the request's error. A
/// panic in a user library, a controller factory or an action comes back as
/// [`Error::Fatal`].
#[derive(Debug)]
pub struct Application {
    registry: Registry,
}

impl Application {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn layout(&self) -> &Layout {
        self.registry.layout()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn run<R>(&self, request: &Request, router: &R) -> Result<Response, Error>
    where
        R: Router + ?Sized,
    {
        let layout = self.layout();

        let mut settings = Config::builder()
            .with_framework_defaults()
            .with_file(layout.shared_config(), true)
            .build()?;
        let target = router.route(request, &settings)?;
        settings.load_layer(&Layer::file(layout.user_config(target.app()), false))?;

        install_fatal_hook();
        let _ = take_last_fatal();

        let urls = Urls::derive(&request.host, &request.script_name, target.app());
        let mut ctx = AppContext::builder()
            .with_settings(settings)
            .with_target(target)
            .with_urls(urls)
            .with_session_id(request.session_id.clone())
            .build()?;
        let handler = ErrorHandler::new(ctx.debug());

        tracing::info!(
            app = %ctx.target().app(),
            controller = %ctx.target().controller(),
            action = %ctx.target().action(),
            root = %ctx.urls().root(),
            time_zone = %ctx.time_zone(),
            debug = ctx.debug(),
            "Request bootstrapped"
        );

        handler.catch_fatal(|| self.import_user_files(&mut ctx))?;

        Dispatcher::new(&self.registry, handler).dispatch(&mut ctx)
    }

    /// Runs each listed user library once, in list order.
    fn import_user_files(&self, ctx: &mut AppContext) -> Result<(), Error> {
        let files = ctx.core().user_files.clone();
        for file in &files {
            if !ctx.mark_library_loaded(file) {
                continue;
            }
            tracing::debug!(file = %file, "Loading user library");
            self.registry.run_library(file, ctx)?;
        }
        Ok(())
    }
}

/// Reports a fatal error and terminates the process.
pub fn halt(err: &Error) -> ! {
    tracing::error!(error = %err, "Halting");
    eprintln!("{err}");
    std::process::exit(1)
}
