use std::fmt;

/// Error levels a diagnostic can be raised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    Error,
    Warning,
    Parse,
    Notice,
    CoreError,
    CoreWarning,
    CompileError,
    CompileWarning,
    UserError,
    UserWarning,
    UserNotice,
    Strict,
    Deprecated,
    UserDeprecated,
}

/// Whether a diagnostic stops the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Advisory,
}

impl ErrorKind {
    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::Error
            | ErrorKind::Parse
            | ErrorKind::CoreError
            | ErrorKind::CompileError
            | ErrorKind::UserError => Severity::Fatal,
            _ => Severity::Advisory,
        }
    }

    pub fn is_fatal(self) -> bool {
        self.severity() == Severity::Fatal
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::Warning => "Warning",
            ErrorKind::Parse => "Parse error",
            ErrorKind::Notice => "Notice",
            ErrorKind::CoreError => "Core error",
            ErrorKind::CoreWarning => "Core warning",
            ErrorKind::CompileError => "Compile error",
            ErrorKind::CompileWarning => "Compile warning",
            ErrorKind::UserError => "User error",
            ErrorKind::UserWarning => "User warning",
            ErrorKind::UserNotice => "User notice",
            ErrorKind::Strict => "Strict standards",
            ErrorKind::Deprecated => "Deprecated",
            ErrorKind::UserDeprecated => "User deprecated",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_kinds() {
        for kind in [
            ErrorKind::Error,
            ErrorKind::Parse,
            ErrorKind::CoreError,
            ErrorKind::CompileError,
            ErrorKind::UserError,
        ] {
            assert_eq!(kind.severity(), Severity::Fatal, "{kind}");
        }
    }

    #[test]
    fn test_advisory_kinds() {
        for kind in [
            ErrorKind::Warning,
            ErrorKind::Notice,
            ErrorKind::Strict,
            ErrorKind::UserWarning,
            ErrorKind::UserNotice,
            ErrorKind::Deprecated,
            ErrorKind::CoreWarning,
        ] {
            assert_eq!(kind.severity(), Severity::Advisory, "{kind}");
        }
    }
}
