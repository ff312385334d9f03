//! This module implements `DatatypeError`, the error type shared by every
//! operation of this crate.

use alloc::borrow::Cow;
use core::fmt;

/// The kind of a `DatatypeError`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed lexical input.
    #[default]
    Syntax,
    /// A field outside of its legal range, or a moment whose fields cannot
    /// coexist.
    InvalidField,
    /// An operation whose result is not meaningful.
    IllegalState,
    /// A value exceeded an implementation limit.
    Unsupported,
    /// An internal invariant did not hold.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Syntax => "SyntaxError",
            Self::InvalidField => "InvalidField",
            Self::IllegalState => "IllegalState",
            Self::Unsupported => "UnsupportedOperation",
            Self::Assert => "ImplementationError",
        })
    }
}

/// The error type returned by the parsers, setters and arithmetic of this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatatypeError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl DatatypeError {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Create a syntax error.
    #[must_use]
    pub fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field() -> Self {
        Self::new(ErrorKind::InvalidField)
    }

    /// Create an illegal state error.
    #[must_use]
    pub fn illegal_state() -> Self {
        Self::new(ErrorKind::IllegalState)
    }

    /// Create an unsupported operation error.
    #[must_use]
    pub fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported)
    }

    /// Create an assertion error.
    #[must_use]
    pub(crate) fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Add a message to the error.
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Extracts the error message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for DatatypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let msg = self.msg.trim();
        if !msg.is_empty() {
            write!(f, ": {msg}")?;
        }

        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DatatypeError {}
