//! Error types for the codec.
//!
//! Failures carry a granular [`ErrorKind`] plus, for wire-level faults, the
//! byte offset at which parsing stopped. [`ErrorKind::category`] collapses
//! the granular kinds into the coarse classes callers dispatch on.

use std::fmt;

use bstr::ByteSlice;
use thiserror::Error;

/// The error type shared by both codec directions.
///
/// Neither direction ever returns partial output: on error the caller gets
/// this value and nothing else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct CodecError {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Byte offset of the fault, when the failure is tied to wire input.
    pub position: Option<usize>,
    /// Preview of the input around the fault position, for debugging.
    pub input_preview: Option<String>,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(pos) = self.position {
            write!(f, " at byte {}", pos)?;
        }
        if let Some(ref preview) = self.input_preview {
            write!(f, "\n{}", preview)?;
        }
        Ok(())
    }
}

/// Specific kinds of codec errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input ended in the middle of a value.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Expected a specific delimiter byte but found something else.
    #[error("expected '{expected}', found '{found}'")]
    UnexpectedChar {
        /// The byte that was expected.
        expected: char,
        /// The byte that was found.
        found: char,
    },

    /// A byte in tag position that is not part of the serialize grammar.
    #[error("unknown type tag '{0}'")]
    UnknownTag(char),

    /// A `b:` payload other than `0` or `1`.
    #[error("invalid boolean literal: {0}")]
    InvalidBool(String),

    /// An `i:` payload that is not a decimal integer.
    #[error("invalid integer literal: {0}")]
    InvalidInt(String),

    /// A `d:` payload that is not a float literal.
    #[error("invalid float literal: {0}")]
    InvalidFloat(String),

    /// A string/array/object length prefix that is not a decimal count.
    #[error("invalid length prefix: {0}")]
    InvalidLength(String),

    /// A string length prefix pointing past the end of the input.
    #[error("string length mismatch: declared {declared}, only {available} bytes left")]
    StringLengthMismatch {
        /// The declared byte length.
        declared: usize,
        /// How many bytes of input were actually available.
        available: usize,
    },

    /// String content that is not valid UTF-8.
    #[error("invalid UTF-8 in string content")]
    InvalidUtf8,

    /// Bytes left over after a complete top-level value.
    #[error("{0} trailing bytes after top-level value")]
    TrailingBytes(usize),

    /// An `i:` literal outside the signed 64-bit range.
    #[error("integer literal out of 64-bit range: {0}")]
    IntegerOverflow(String),

    /// Two pairs in one array or object with the same key.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A recognized grammar feature this codec deliberately rejects,
    /// such as back-references or non-scalar keys.
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// Nesting deeper than the configured bound.
    #[error("maximum nesting depth ({0}) exceeded")]
    MaxDepthExceeded(usize),

    /// The encoder's input failed to parse as JSON text.
    #[error("invalid JSON input: {0}")]
    InvalidJson(String),

    /// A JSON number that fits neither i64 nor a finite f64.
    #[error("number not representable as 64-bit integer or double: {0}")]
    UnrepresentableNumber(String),
}

/// Coarse error classes, one per failure mode of the codec contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Wire bytes do not match the tag/length/delimiter grammar.
    MalformedInput,
    /// A grammar feature intentionally out of scope.
    UnsupportedConstruct,
    /// An aggregate with two identical keys.
    DuplicateKey,
    /// An integer literal outside the signed 64-bit range.
    IntegerOverflow,
    /// Ill-formed JSON text on the encode side.
    InvalidJson,
    /// A JSON number with no lossless 64-bit representation.
    UnrepresentableNumber,
    /// A defensive bound (nesting depth) was hit.
    ResourceLimit,
}

impl ErrorKind {
    /// The coarse class this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::UnexpectedEof
            | ErrorKind::UnexpectedChar { .. }
            | ErrorKind::UnknownTag(_)
            | ErrorKind::InvalidBool(_)
            | ErrorKind::InvalidInt(_)
            | ErrorKind::InvalidFloat(_)
            | ErrorKind::InvalidLength(_)
            | ErrorKind::StringLengthMismatch { .. }
            | ErrorKind::InvalidUtf8
            | ErrorKind::TrailingBytes(_) => ErrorCategory::MalformedInput,
            ErrorKind::UnsupportedConstruct(_) => ErrorCategory::UnsupportedConstruct,
            ErrorKind::DuplicateKey(_) => ErrorCategory::DuplicateKey,
            ErrorKind::IntegerOverflow(_) => ErrorCategory::IntegerOverflow,
            ErrorKind::MaxDepthExceeded(_) => ErrorCategory::ResourceLimit,
            ErrorKind::InvalidJson(_) => ErrorCategory::InvalidJson,
            ErrorKind::UnrepresentableNumber(_) => ErrorCategory::UnrepresentableNumber,
        }
    }
}

impl CodecError {
    /// Create a new error at the given byte offset.
    #[inline]
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        Self {
            kind,
            position: Some(position),
            input_preview: None,
        }
    }

    /// Create a new error with no meaningful byte offset (encode side).
    #[inline]
    pub fn without_position(kind: ErrorKind) -> Self {
        Self {
            kind,
            position: None,
            input_preview: None,
        }
    }

    /// The coarse class of this error.
    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Attach a preview of the input around the fault position.
    ///
    /// Shows up to 20 bytes on either side with a caret under the fault.
    #[cold]
    pub fn with_input_preview(mut self, data: &[u8], error_pos: usize) -> Self {
        let start = error_pos.saturating_sub(20);
        let end = (error_pos + 20).min(data.len());

        if start < end {
            let preview = data[start..end].to_str_lossy();
            let relative_pos = error_pos.saturating_sub(start);
            let mut rendered = String::with_capacity(preview.len() + relative_pos + 2);
            rendered.push_str(&preview);
            rendered.push('\n');
            rendered.push_str(&" ".repeat(relative_pos));
            rendered.push('^');
            self.input_preview = Some(rendered);
        }
        self
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::without_position(ErrorKind::InvalidJson(err.to_string()))
    }
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
