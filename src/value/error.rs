use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Contract violation that the upstream cast layer should have caught.
    /// Fatal to the call.
    Argument,
    /// Out-of-bounds element access. Always fatal.
    Index,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::Argument => "ARGUMENT",
            ErrorCode::Index => "INDEX",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub message: String,
    pub code: ErrorCode,
}

impl RuntimeError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: ErrorCode::Argument,
        }
    }

    pub(crate) fn index(index: usize, len: usize) -> Self {
        Self {
            message: format!("index {} out of bounds for length {}", index, len),
            code: ErrorCode::Index,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Non-fatal diagnostics accumulated on the session. DomainError never
/// surfaces as an error value: the affected element becomes the missing
/// sentinel and at most one warning per call records the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    RecycleLength,
    IntegerOverflow,
    NaIntroduced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub(crate) fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// Stable diagnostic texts. These are the only externally observable
// "formats" the core produces.
pub(crate) const MSG_RECYCLE_FRINGE: &str =
    "longer object length is not a multiple of shorter object length";
pub(crate) const MSG_INTEGER_OVERFLOW: &str = "NAs produced by integer overflow";
pub(crate) const MSG_INVALID_CODE_POINT: &str = "invalid code point: NA introduced";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display_names_are_stable() {
        assert_eq!(ErrorCode::Argument.to_string(), "ARGUMENT");
        assert_eq!(ErrorCode::Index.to_string(), "INDEX");
    }

    #[test]
    fn index_error_mentions_bounds() {
        let err = RuntimeError::index(7, 3);
        assert_eq!(err.code, ErrorCode::Index);
        assert!(err.message.contains('7'));
        assert!(err.message.contains('3'));
    }

    #[test]
    fn warning_displays_message_only() {
        let w = Warning::new(WarningKind::RecycleLength, MSG_RECYCLE_FRINGE);
        assert_eq!(w.to_string(), MSG_RECYCLE_FRINGE);
    }
}
