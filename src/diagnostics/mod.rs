//! Fatal and advisory error reporting.
//!
//! Every diagnostic, whether raised by an action or recovered from a panic,
//! goes through [`ErrorHandler::on_error`]. Fatal kinds become
//! [`Error::Fatal`]; advisory kinds render a [`Notice`] under debug and are
//! dropped otherwise.

mod fatal;
mod kind;

use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};

use crate::Error;

pub use fatal::{install_fatal_hook, take_last_fatal};
pub(crate) use fatal::from_payload;
pub use kind::{ErrorKind, Severity};

/// An error raised at a known source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl Diagnostic {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            file: file.into(),
            line,
        }
    }

    /// Creates a diagnostic located at the caller.
    #[track_caller]
    pub fn here(kind: ErrorKind, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::new(kind, message, location.file(), location.line())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} line {}", self.message, self.file, self.line)
    }
}

/// The notice view shown for an advisory diagnostic in debug mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice(Diagnostic);

impl Notice {
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.0
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        write!(
            f,
            "<div class=\"notice\"><b>{}</b>: {} in <i>{}</i> on line <i>{}</i></div>",
            d.kind,
            escape(&d.message),
            escape(&d.file),
            d.line
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Routes diagnostics to the fatal or advisory path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorHandler {
    debug: bool,
}

impl ErrorHandler {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Handles one diagnostic.
    ///
    /// Fatal kinds always return [`Error::Fatal`]. Advisory kinds never fail:
    /// they yield a [`Notice`] to render when debug is on, and nothing otherwise.
    pub fn on_error(&self, report: Diagnostic) -> Result<Option<Notice>, Error> {
        match report.kind.severity() {
            Severity::Fatal => {
                tracing::error!(kind = %report.kind, diagnostic = %report, "Fatal error");
                Err(Error::Fatal(report))
            }
            Severity::Advisory if self.debug => {
                tracing::warn!(kind = %report.kind, diagnostic = %report, "Advisory error");
                Ok(Some(Notice(report)))
            }
            Severity::Advisory => {
                tracing::trace!(kind = %report.kind, "Advisory error dropped");
                Ok(None)
            }
        }
    }

    /// Replays the last panic recorded on this thread through [`on_error`](Self::on_error).
    ///
    /// Does nothing when no panic was recorded.
    pub fn on_fatal_shutdown(&self) -> Result<(), Error> {
        match take_last_fatal() {
            Some(report) => self.on_error(report).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Runs `f`, reporting a panic inside it as [`Error::Fatal`].
    ///
    /// The panic recorded by the hook is replayed through
    /// [`on_fatal_shutdown`](Self::on_fatal_shutdown); without a hook the
    /// unwind payload is reported instead.
    pub fn catch_fatal<T, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce() -> Result<T, Error>,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => result,
            Err(payload) => {
                self.on_fatal_shutdown()?;
                let report = from_payload(payload.as_ref());
                self.on_error(report.clone())?;
                Err(Error::Fatal(report))
            }
        }
    }
}
