//! Panic capture for the fatal-shutdown path.
//!
//! A panic never reaches [`ErrorHandler::on_error`](super::ErrorHandler::on_error)
//! directly. The hook installed here records where it happened so the
//! dispatcher can replay it through the same handler once the unwind is caught.

use std::any::Any;
use std::cell::RefCell;
use std::panic;
use std::sync::Once;

use super::{Diagnostic, ErrorKind};

thread_local! {
    static LAST_FATAL: RefCell<Option<Diagnostic>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Installs the process-wide panic hook. Later calls are no-ops.
///
/// The previously installed hook still runs after the panic is recorded.
pub fn install_fatal_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let (file, line) = info
                .location()
                .map(|loc| (loc.file().to_string(), loc.line()))
                .unwrap_or_else(|| ("<unknown>".to_string(), 0));
            let report = Diagnostic::new(ErrorKind::Error, payload_message(info.payload()), file, line);
            tracing::error!(
                message = %report.message,
                file = %report.file,
                line = report.line,
                "Panic recorded"
            );
            LAST_FATAL.with(|last| *last.borrow_mut() = Some(report));
            previous(info);
        }));
    });
}

/// Takes the last panic recorded on this thread, if any.
pub fn take_last_fatal() -> Option<Diagnostic> {
    LAST_FATAL.with(|last| last.borrow_mut().take())
}

/// Builds a report straight from an unwind payload when no hook recorded one.
pub(crate) fn from_payload(payload: &(dyn Any + Send)) -> Diagnostic {
    Diagnostic::new(ErrorKind::Error, payload_message(payload), "<unknown>", 0)
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_records_panic_location() {
        install_fatal_hook();
        let _ = take_last_fatal();

        let result = panic::catch_unwind(|| panic!("index out of range"));
        assert!(result.is_err());

        let report = take_last_fatal().expect("panic should be recorded");
        assert_eq!(report.kind, ErrorKind::Error);
        assert_eq!(report.message, "index out of range");
        assert!(report.file.ends_with("fatal.rs"));
        assert!(report.line > 0);

        assert!(take_last_fatal().is_none());
    }

    #[test]
    fn test_from_payload_formats_message() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("bad state"));
        let report = from_payload(payload.as_ref());

        assert_eq!(report.message, "bad state");
        assert_eq!(report.line, 0);
    }
}
