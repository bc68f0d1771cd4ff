use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Numeric error codes of the kernel call surface
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    Ok = 0,
    Parse = -1,
    Type = -2,
    Ambiguity = -3,
    Memory = -4,
    Overflow = -5,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Ok),
            -1 => Some(ErrorCode::Parse),
            -2 => Some(ErrorCode::Type),
            -3 => Some(ErrorCode::Ambiguity),
            -4 => Some(ErrorCode::Memory),
            -5 => Some(ErrorCode::Overflow),
            _ => None,
        }
    }

    /// Returns a human-readable name for the code
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::Ok => "ok",
            ErrorCode::Parse => "parse",
            ErrorCode::Type => "type",
            ErrorCode::Ambiguity => "ambiguity",
            ErrorCode::Memory => "memory",
            ErrorCode::Overflow => "overflow",
        }
    }
}

/// Detailed error information with the byte offset it refers to
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetails {
    pub message: String,
    pub offset: usize,
    pub suggestion: Option<String>,
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        write!(f, " at byte {}", self.offset)
    }
}

/// Error types for the AISP kernel, one per non-OK error code
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AispError {
    /// Malformed or unbalanced source, or an unknown document handle
    #[error("Parse error: {0}")]
    Parse(Box<ErrorDetails>),

    /// Irreconcilable binding conflict
    #[error("Type error: {0}")]
    Type(Box<ErrorDetails>),

    /// Ambiguity above a caller-supplied ceiling
    #[error("Ambiguity error: {0}")]
    Ambiguity(Box<ErrorDetails>),

    /// Fixed pool exhausted or kernel storage missing
    #[error("Memory error: {0}")]
    Memory(Box<ErrorDetails>),

    /// A document size, term count or depth limit was exceeded
    #[error("Overflow error: {0}")]
    Overflow(Box<ErrorDetails>),
}

fn details(
    message: impl Into<String>,
    offset: usize,
    suggestion: Option<String>,
) -> Box<ErrorDetails> {
    Box::new(ErrorDetails {
        message: message.into(),
        offset,
        suggestion,
    })
}

impl AispError {
    pub fn parse(message: impl Into<String>, offset: usize) -> Self {
        Self::Parse(details(message, offset, None))
    }

    pub fn parse_with_suggestion(
        message: impl Into<String>,
        offset: usize,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Parse(details(message, offset, Some(suggestion.into())))
    }

    pub fn type_conflict(message: impl Into<String>, offset: usize) -> Self {
        Self::Type(details(message, offset, None))
    }

    pub fn type_conflict_with_suggestion(
        message: impl Into<String>,
        offset: usize,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Type(details(message, offset, Some(suggestion.into())))
    }

    pub fn ambiguity(message: impl Into<String>, offset: usize) -> Self {
        Self::Ambiguity(details(message, offset, None))
    }

    pub fn memory(message: impl Into<String>, offset: usize) -> Self {
        Self::Memory(details(message, offset, None))
    }

    pub fn overflow(message: impl Into<String>, offset: usize) -> Self {
        Self::Overflow(details(message, offset, None))
    }

    pub fn overflow_with_suggestion(
        message: impl Into<String>,
        offset: usize,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Overflow(details(message, offset, Some(suggestion.into())))
    }

    pub fn details(&self) -> &ErrorDetails {
        match self {
            AispError::Parse(details)
            | AispError::Type(details)
            | AispError::Ambiguity(details)
            | AispError::Memory(details)
            | AispError::Overflow(details) => details,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AispError::Parse(_) => ErrorCode::Parse,
            AispError::Type(_) => ErrorCode::Type,
            AispError::Ambiguity(_) => ErrorCode::Ambiguity,
            AispError::Memory(_) => ErrorCode::Memory,
            AispError::Overflow(_) => ErrorCode::Overflow,
        }
    }

    pub fn offset(&self) -> usize {
        self.details().offset
    }

    pub fn message(&self) -> &str {
        &self.details().message
    }
}

/// Last-error record of a registry
///
/// Overwritten by every failing operation, cleared at the start of every
/// parse. Reads "no error" before the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorState {
    code: ErrorCode,
    offset: usize,
}

impl Default for ErrorState {
    fn default() -> Self {
        Self {
            code: ErrorCode::Ok,
            offset: 0,
        }
    }
}

impl ErrorState {
    pub fn record(&mut self, error: &AispError) {
        self.code = error.code();
        self.offset = error.offset();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_error(&self) -> bool {
        self.code != ErrorCode::Ok
    }
}
