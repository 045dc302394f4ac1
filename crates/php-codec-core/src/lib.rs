//! Bidirectional codec between PHP's `serialize()` byte format and JSON text.
//!
//! The decoder parses serialize bytes with a strict recursive-descent parser
//! and renders the result as JSON text; the encoder parses JSON text and
//! emits spec-compliant serialize bytes. Both directions meet in one value
//! model, [`PhpValue`], and are otherwise independent.
//!
//! # Features
//!
//! - **Strict parsing** - Length prefixes are UTF-8 byte counts and must
//!   match exactly; the whole input must be one value
//! - **Order-preserving** - PHP arrays are ordered maps; pair order
//!   survives both directions and keys are never re-sorted
//! - **Typed failures** - Every error carries a kind, a coarse
//!   [`ErrorCategory`] and, for wire faults, a byte offset
//! - **Zero-copy values** - The parser borrows string content from its
//!   input
//!
//! # Quick Start
//!
//! ```rust
//! use php_codec_core::{decode, encode};
//!
//! let json = decode(br#"a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#).unwrap();
//! assert_eq!(json, r#"{"name":"Alice","age":30}"#);
//!
//! let bytes = encode(r#"["a","b"]"#).unwrap();
//! assert_eq!(bytes, br#"a:2:{i:0;s:1:"a";i:1;s:1:"b";}"#);
//! ```
//!
//! # Value Mapping
//!
//! | Wire tag | Value | JSON |
//! |----------|-------|------|
//! | `N;` | `PhpValue::Null` | `null` |
//! | `b:0;` / `b:1;` | `PhpValue::Bool` | `true` / `false` |
//! | `i:...;` | `PhpValue::Int` | number |
//! | `d:...;` | `PhpValue::Float` | number |
//! | `s:<len>:"...";` | `PhpValue::Str` | string |
//! | `a:<n>:{...}` | `PhpValue::Array` | array if keys are `0..n-1`, else object |
//! | `O:<len>:"...":<n>:{...}` | `PhpValue::Object` | object (class name dropped) |
//!
//! Back-references (`R:`/`r:`), custom-serialized objects (`C:`) and enums
//! (`E:`) are rejected as unsupported constructs. Decoding an object and
//! re-encoding its JSON yields an array: JSON has nowhere to carry a class
//! name, so that direction is lossy by design.
//!
//! ```rust
//! use php_codec_core::{decode, ErrorCategory};
//!
//! let err = decode(b"R:1;").unwrap_err();
//! assert_eq!(err.category(), ErrorCategory::UnsupportedConstruct);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::inline_always)]

pub mod error;
pub mod json;
pub mod parser;
pub mod serializer;
pub mod types;

pub use error::{CodecError, ErrorCategory, ErrorKind, Result};
pub use json::{from_json, from_json_str, to_json, to_json_string};
pub use parser::{from_bytes, from_bytes_with_config, Parser, ParserConfig};
pub use serializer::to_bytes;
pub use types::{PhpKey, PhpValue};

/// Decode PHP serialize bytes into JSON text.
///
/// Fails with a typed [`CodecError`] rather than returning partial output.
///
/// # Example
///
/// ```rust
/// let json = php_codec_core::decode(b"s:4:\"test\";").unwrap();
/// assert_eq!(json, "\"test\"");
/// ```
pub fn decode(data: &[u8]) -> Result<String> {
    let value = parser::from_bytes(data)?;
    json::to_json_string(&value)
}

/// Encode JSON text into PHP serialize bytes.
///
/// JSON arrays become integer-keyed PHP arrays, JSON objects become
/// string-keyed PHP arrays in the object's own key order.
///
/// # Example
///
/// ```rust
/// let bytes = php_codec_core::encode("[1,2]").unwrap();
/// assert_eq!(bytes, b"a:2:{i:0;i:1;i:1;i:2;}");
/// ```
pub fn encode(text: &str) -> Result<Vec<u8>> {
    let value = json::from_json_str(text)?;
    Ok(serializer::to_bytes(&value))
}
