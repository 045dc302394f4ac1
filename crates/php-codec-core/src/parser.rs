//! Recursive-descent parser for PHP serialize bytes.
//!
//! The grammar is byte-oriented: every string carries an explicit UTF-8
//! *byte* count, so the parser works on `&[u8]` and never confuses byte
//! offsets with character counts. Parsing is strict: the length prefixes
//! must match the actual byte spans, the whole input must be consumed, and
//! no recovery is attempted.
//!
//! # Tracing Support
//!
//! Enable the `tracing` feature for parsing instrumentation:
//!
//! ```toml
//! php-codec-core = { version = "0.1", features = ["tracing"] }
//! ```

use std::borrow::Cow;
use std::collections::HashSet;
use std::num::IntErrorKind;

use memchr::memchr;

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

use crate::error::{CodecError, ErrorKind, Result};
use crate::types::{PhpKey, PhpValue};

/// Maximum nesting depth to prevent stack overflow on adversarial input.
const MAX_DEPTH: usize = 512;

/// Parser configuration options.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum nesting depth for arrays and objects.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

/// A zero-copy parser for PHP serialize bytes.
pub struct Parser<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current position in the input.
    pos: usize,
    /// Parser configuration.
    config: ParserConfig,
    /// Current nesting depth.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_config(data, ParserConfig::default())
    }

    /// Create a new parser with custom configuration.
    pub fn with_config(data: &'a [u8], config: ParserConfig) -> Self {
        Self {
            data,
            pos: 0,
            config,
            depth: 0,
        }
    }

    /// Parse the input as a single complete value.
    ///
    /// Trailing bytes after the top-level value are an error: the wire
    /// representation of one value is exactly one production of the grammar.
    pub fn parse(&mut self) -> Result<PhpValue<'a>> {
        #[cfg(feature = "tracing")]
        debug!(data_len = self.data.len(), "parsing PHP serialize input");

        let value = self.parse_value()?;

        if self.pos != self.data.len() {
            #[cfg(feature = "tracing")]
            warn!(pos = self.pos, "input continues past top-level value");
            return Err(CodecError::new(
                ErrorKind::TrailingBytes(self.data.len() - self.pos),
                self.pos,
            )
            .with_input_preview(self.data, self.pos));
        }

        #[cfg(feature = "tracing")]
        debug!(value_type = value.type_name(), "parse completed");

        Ok(value)
    }

    /// Parse a single value at the current position.
    fn parse_value(&mut self) -> Result<PhpValue<'a>> {
        let tag = self.peek_byte()?;

        #[cfg(feature = "tracing")]
        trace!(tag = %char::from(tag), pos = self.pos, "parsing value");

        match tag {
            b'N' => self.parse_null(),
            b'b' => self.parse_bool(),
            b'i' => Ok(PhpValue::Int(self.parse_int_literal()?)),
            b'd' => self.parse_float(),
            b's' => Ok(PhpValue::Str(self.parse_string()?)),
            b'a' => self.parse_array(),
            b'O' => self.parse_object(),
            // Recognized serialize constructs this codec refuses to model.
            b'R' | b'r' => Err(CodecError::new(
                ErrorKind::UnsupportedConstruct("back-reference".into()),
                self.pos,
            )),
            b'C' => Err(CodecError::new(
                ErrorKind::UnsupportedConstruct("custom-serialized object".into()),
                self.pos,
            )),
            b'E' => Err(CodecError::new(
                ErrorKind::UnsupportedConstruct("enum".into()),
                self.pos,
            )),
            _ => Err(
                CodecError::new(ErrorKind::UnknownTag(tag as char), self.pos)
                    .with_input_preview(self.data, self.pos),
            ),
        }
    }

    /// Parse a null value: `N;`
    fn parse_null(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'N')?;
        self.expect_byte(b';')?;
        Ok(PhpValue::Null)
    }

    /// Parse a boolean value: `b:0;` or `b:1;`
    fn parse_bool(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'b')?;
        self.expect_byte(b':')?;
        let value_byte = self.read_byte()?;
        self.expect_byte(b';')?;

        match value_byte {
            b'0' => Ok(PhpValue::Bool(false)),
            b'1' => Ok(PhpValue::Bool(true)),
            _ => Err(CodecError::new(
                ErrorKind::InvalidBool((value_byte as char).to_string()),
                self.pos - 2,
            )),
        }
    }

    /// Parse an integer literal: `i:<digits>;` -> i64.
    ///
    /// Shared by value and key positions. A literal that is numeric but
    /// does not fit a signed 64-bit integer is an overflow error, distinct
    /// from a literal that is not numeric at all.
    fn parse_int_literal(&mut self) -> Result<i64> {
        self.expect_byte(b'i')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let digits = self.read_until(b';')?;
        let text = std::str::from_utf8(digits)
            .map_err(|_| CodecError::new(ErrorKind::InvalidInt(lossy(digits)), start))?;

        let value: i64 = text.parse().map_err(|e: std::num::ParseIntError| {
            let kind = match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    ErrorKind::IntegerOverflow(text.to_string())
                }
                _ => ErrorKind::InvalidInt(text.to_string()),
            };
            CodecError::new(kind, start)
        })?;

        self.expect_byte(b';')?;
        Ok(value)
    }

    /// Parse a float value: `d:<literal>;`
    ///
    /// PHP spells the non-finite values `NAN`, `INF` and `-INF`.
    fn parse_float(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'd')?;
        self.expect_byte(b':')?;

        let start = self.pos;
        let literal = self.read_until(b';')?;
        let text = std::str::from_utf8(literal)
            .map_err(|_| CodecError::new(ErrorKind::InvalidFloat(lossy(literal)), start))?;

        let value: f64 = match text {
            "NAN" => f64::NAN,
            "INF" => f64::INFINITY,
            "-INF" => f64::NEG_INFINITY,
            _ => text
                .parse()
                .map_err(|_| CodecError::new(ErrorKind::InvalidFloat(text.to_string()), start))?,
        };

        self.expect_byte(b';')?;
        Ok(PhpValue::Float(value))
    }

    /// Parse a string value: `s:<byte-len>:"<bytes>";`
    ///
    /// `byte-len` counts encoded UTF-8 bytes, never characters, and must
    /// delimit exactly the content between the quotes. The content itself
    /// must be valid UTF-8.
    fn parse_string(&mut self) -> Result<Cow<'a, str>> {
        self.expect_byte(b's')?;
        self.expect_byte(b':')?;

        let len = self.parse_length()?;
        self.expect_byte(b':')?;
        self.expect_byte(b'"')?;

        let start = self.pos;
        let available = self.data.len() - self.pos;
        if len > available {
            return Err(CodecError::new(
                ErrorKind::StringLengthMismatch {
                    declared: len,
                    available,
                },
                start,
            ));
        }

        let raw = &self.data[start..start + len];
        let text = std::str::from_utf8(raw)
            .map_err(|_| CodecError::new(ErrorKind::InvalidUtf8, start))?;
        self.pos += len;

        self.expect_byte(b'"')?;
        self.expect_byte(b';')?;
        Ok(Cow::Borrowed(text))
    }

    /// Parse an array value: `a:<count>:{<key><value>...}`
    fn parse_array(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'a')?;
        self.expect_byte(b':')?;

        let count = self.parse_length()?;
        self.expect_byte(b':')?;
        self.expect_byte(b'{')?;

        let pairs = self.parse_pairs(count)?;
        self.expect_byte(b'}')?;

        Ok(PhpValue::Array(pairs))
    }

    /// Parse an object value: `O:<namelen>:"<name>":<count>:{<prop>...}`
    fn parse_object(&mut self) -> Result<PhpValue<'a>> {
        self.expect_byte(b'O')?;
        self.expect_byte(b':')?;

        let name_len = self.parse_length()?;
        self.expect_byte(b':')?;
        self.expect_byte(b'"')?;

        let name_start = self.pos;
        if name_len > self.data.len() - self.pos {
            return Err(CodecError::new(ErrorKind::UnexpectedEof, self.pos));
        }
        let class_name = std::str::from_utf8(&self.data[name_start..name_start + name_len])
            .map_err(|_| CodecError::new(ErrorKind::InvalidUtf8, name_start))?;
        self.pos += name_len;

        self.expect_byte(b'"')?;
        self.expect_byte(b':')?;

        let count = self.parse_length()?;
        self.expect_byte(b':')?;
        self.expect_byte(b'{')?;

        let properties = self.parse_pairs(count)?;
        self.expect_byte(b'}')?;

        Ok(PhpValue::Object {
            class_name: Cow::Borrowed(class_name),
            properties,
        })
    }

    /// Parse `count` key/value pairs, checking depth and key uniqueness.
    ///
    /// Shared by arrays and objects: both are ordered pair sequences on the
    /// wire, and both reject duplicate keys.
    fn parse_pairs(&mut self, count: usize) -> Result<Vec<(PhpKey<'a>, PhpValue<'a>)>> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            #[cfg(feature = "tracing")]
            warn!(depth = self.depth, "nesting depth bound hit");
            return Err(CodecError::new(
                ErrorKind::MaxDepthExceeded(self.config.max_depth),
                self.pos,
            ));
        }

        // Cap the initial allocations: `count` is attacker-controlled.
        let mut pairs = Vec::with_capacity(count.min(1024));
        let mut seen: HashSet<PhpKey<'a>> = HashSet::with_capacity(count.min(1024));

        for _ in 0..count {
            let key_pos = self.pos;
            let key = self.parse_key()?;
            if !seen.insert(key.clone()) {
                return Err(CodecError::new(
                    ErrorKind::DuplicateKey(key.to_string()),
                    key_pos,
                ));
            }
            let value = self.parse_value()?;
            pairs.push((key, value));
        }

        self.depth -= 1;
        Ok(pairs)
    }

    /// Parse a key: only `i:` and `s:` productions are legal here.
    fn parse_key(&mut self) -> Result<PhpKey<'a>> {
        match self.peek_byte()? {
            b'i' => Ok(PhpKey::Int(self.parse_int_literal()?)),
            b's' => Ok(PhpKey::Str(self.parse_string()?)),
            tag => Err(CodecError::new(
                ErrorKind::UnsupportedConstruct(format!("key with tag '{}'", tag as char)),
                self.pos,
            )),
        }
    }

    /// Parse a decimal length/count prefix ending at the next `:`.
    fn parse_length(&mut self) -> Result<usize> {
        let start = self.pos;
        let digits = self.read_until(b':')?;
        let text = std::str::from_utf8(digits)
            .map_err(|_| CodecError::new(ErrorKind::InvalidLength(lossy(digits)), start))?;
        text.parse()
            .map_err(|_| CodecError::new(ErrorKind::InvalidLength(text.to_string()), start))
    }

    // Helper methods - marked #[inline] for the hot paths.

    /// Peek at the current byte without consuming it.
    #[inline(always)]
    fn peek_byte(&self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(|| CodecError::new(ErrorKind::UnexpectedEof, self.pos))
    }

    /// Read and consume the current byte.
    #[inline(always)]
    fn read_byte(&mut self) -> Result<u8> {
        let byte = self.peek_byte()?;
        self.pos += 1;
        Ok(byte)
    }

    /// Expect a specific byte, returning an error if it doesn't match.
    #[inline]
    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        let byte = self.read_byte()?;
        if byte != expected {
            return Err(self.make_unexpected_char_error(expected, byte));
        }
        Ok(())
    }

    #[cold]
    #[inline(never)]
    fn make_unexpected_char_error(&self, expected: u8, found: u8) -> CodecError {
        CodecError::new(
            ErrorKind::UnexpectedChar {
                expected: expected as char,
                found: found as char,
            },
            self.pos - 1,
        )
        .with_input_preview(self.data, self.pos.saturating_sub(1))
    }

    /// Read bytes up to (not including) the delimiter.
    #[inline]
    fn read_until(&mut self, delimiter: u8) -> Result<&'a [u8]> {
        let start = self.pos;
        match memchr(delimiter, &self.data[start..]) {
            Some(offset) => {
                self.pos = start + offset;
                Ok(&self.data[start..start + offset])
            }
            None => Err(CodecError::new(ErrorKind::UnexpectedEof, self.data.len())
                .with_input_preview(self.data, self.data.len())),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Parse PHP serialize bytes into a value.
///
/// # Example
///
/// ```rust
/// use php_codec_core::from_bytes;
///
/// let value = from_bytes(b"i:42;").unwrap();
/// assert_eq!(value.as_int(), Some(42));
/// ```
#[inline]
pub fn from_bytes(data: &[u8]) -> Result<PhpValue<'_>> {
    let mut parser = Parser::new(data);
    parser.parse()
}

/// Parse PHP serialize bytes with custom configuration.
///
/// # Example
///
/// ```rust
/// use php_codec_core::{from_bytes_with_config, ParserConfig};
///
/// let config = ParserConfig { max_depth: 64 };
/// let value = from_bytes_with_config(b"a:0:{}", config).unwrap();
/// assert!(value.is_array());
/// ```
#[inline]
pub fn from_bytes_with_config(data: &[u8], config: ParserConfig) -> Result<PhpValue<'_>> {
    let mut parser = Parser::with_config(data, config);
    parser.parse()
}
