//! The value model shared by both codec directions.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

/// An array or object key.
///
/// The serialize grammar only admits integer and string keys; anything else
/// in key position is rejected during parsing, so illegal keys are
/// unrepresentable here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhpKey<'a> {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(Cow<'a, str>),
}

/// A decoded PHP value.
///
/// Arrays and objects are ordered sequences of `(key, value)` pairs: PHP
/// arrays are insertion-ordered maps, and that order is significant on the
/// wire. Whether a pair sequence renders as a JSON list or a JSON object is
/// decided at the JSON boundary, not here.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PhpValue<'a> {
    /// PHP null.
    #[default]
    Null,

    /// PHP boolean.
    Bool(bool),

    /// PHP integer.
    Int(i64),

    /// PHP float/double.
    Float(f64),

    /// PHP string. The wire length prefix counts UTF-8 bytes; the content
    /// itself must be valid UTF-8 text.
    /// Uses Cow so the parser can borrow from its input.
    Str(Cow<'a, str>),

    /// PHP array: ordered pairs with unique keys.
    Array(Vec<(PhpKey<'a>, PhpValue<'a>)>),

    /// PHP object, held structurally: a class name plus ordered property
    /// pairs. Never instantiated into anything with behavior.
    Object {
        /// The class name of the object.
        class_name: Cow<'a, str>,
        /// Property pairs in declaration order.
        properties: Vec<(PhpKey<'a>, PhpValue<'a>)>,
    },
}

impl<'a> PhpKey<'a> {
    /// Convert to a key that doesn't borrow from the input.
    pub fn into_owned(self) -> PhpKey<'static> {
        match self {
            PhpKey::Int(i) => PhpKey::Int(i),
            PhpKey::Str(s) => PhpKey::Str(Cow::Owned(s.into_owned())),
        }
    }
}

impl fmt::Display for PhpKey<'_> {
    /// PHP's key-to-string convention: integer digits, or the string
    /// content verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpKey::Int(i) => write!(f, "{}", i),
            PhpKey::Str(s) => f.write_str(s),
        }
    }
}

impl<'a> PhpValue<'a> {
    /// Check if the value is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PhpValue::Null)
    }

    /// Check if the value is an array.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, PhpValue::Array(_))
    }

    /// Check if the value is an object.
    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, PhpValue::Object { .. })
    }

    /// Get the value as a boolean.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PhpValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PhpValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float. Integers widen.
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PhpValue::Float(f) => Some(*f),
            PhpValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get the value as a string slice.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PhpValue::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Get the value as a slice of key/value pairs.
    #[inline]
    pub fn as_pairs(&self) -> Option<&[(PhpKey<'a>, PhpValue<'a>)]> {
        match self {
            PhpValue::Array(pairs) => Some(pairs.as_slice()),
            PhpValue::Object { properties, .. } => Some(properties.as_slice()),
            _ => None,
        }
    }

    /// View an array as a map keyed by the PHP key-to-string convention.
    ///
    /// Keys are unique after parsing, so no entry is shadowed.
    pub fn as_string_map(&self) -> Option<HashMap<String, &PhpValue<'a>>> {
        let pairs = self.as_pairs()?;
        let mut map = HashMap::with_capacity(pairs.len());
        for (k, v) in pairs {
            map.insert(k.to_string(), v);
        }
        Some(map)
    }

    /// Convert to a value that doesn't borrow from the input.
    pub fn into_owned(self) -> PhpValue<'static> {
        fn own_pairs(pairs: Vec<(PhpKey<'_>, PhpValue<'_>)>) -> Vec<(PhpKey<'static>, PhpValue<'static>)> {
            pairs
                .into_iter()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        }

        match self {
            PhpValue::Null => PhpValue::Null,
            PhpValue::Bool(b) => PhpValue::Bool(b),
            PhpValue::Int(i) => PhpValue::Int(i),
            PhpValue::Float(f) => PhpValue::Float(f),
            PhpValue::Str(s) => PhpValue::Str(Cow::Owned(s.into_owned())),
            PhpValue::Array(pairs) => PhpValue::Array(own_pairs(pairs)),
            PhpValue::Object {
                class_name,
                properties,
            } => PhpValue::Object {
                class_name: Cow::Owned(class_name.into_owned()),
                properties: own_pairs(properties),
            },
        }
    }

    /// Get a type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PhpValue::Null => "null",
            PhpValue::Bool(_) => "boolean",
            PhpValue::Int(_) => "integer",
            PhpValue::Float(_) => "float",
            PhpValue::Str(_) => "string",
            PhpValue::Array(_) => "array",
            PhpValue::Object { .. } => "object",
        }
    }
}

impl fmt::Display for PhpValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhpValue::Null => write!(f, "null"),
            PhpValue::Bool(b) => write!(f, "{}", b),
            PhpValue::Int(i) => write!(f, "{}", i),
            PhpValue::Float(fl) => write!(f, "{}", fl),
            PhpValue::Str(s) => write!(f, "\"{}\"", s),
            PhpValue::Array(pairs) => {
                write!(f, "[")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "]")
            }
            PhpValue::Object { class_name, .. } => write!(f, "{}{{...}}", class_name),
        }
    }
}
