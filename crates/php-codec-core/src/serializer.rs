//! Serializer from values back to PHP serialize bytes.
//!
//! The inverse of [`crate::parser`]: one emitter per grammar production.
//! Length prefixes count UTF-8 bytes, array counts are pair counts, and
//! pairs are written in stored order — the serializer never re-sorts keys,
//! so re-encoding a decoded value reproduces the original wire bytes for
//! everything except objects (whose class names survive here but not a trip
//! through JSON).

use crate::types::{PhpKey, PhpValue};

/// Serialize a value to PHP serialize bytes.
///
/// Infallible: the model only holds values the grammar can express, and the
/// output is UTF-8 text by construction.
///
/// # Example
///
/// ```rust
/// use php_codec_core::{to_bytes, PhpValue};
///
/// assert_eq!(to_bytes(&PhpValue::Int(42)), b"i:42;");
/// ```
pub fn to_bytes(value: &PhpValue) -> Vec<u8> {
    let mut out = String::new();
    write_value(&mut out, value);
    out.into_bytes()
}

fn write_value(out: &mut String, value: &PhpValue) {
    match value {
        PhpValue::Null => out.push_str("N;"),
        PhpValue::Bool(b) => out.push_str(if *b { "b:1;" } else { "b:0;" }),
        PhpValue::Int(i) => {
            out.push_str("i:");
            out.push_str(&i.to_string());
            out.push(';');
        }
        PhpValue::Float(f) => {
            out.push_str("d:");
            write_float(out, *f);
            out.push(';');
        }
        PhpValue::Str(s) => write_string(out, s),
        PhpValue::Array(pairs) => {
            out.push_str("a:");
            out.push_str(&pairs.len().to_string());
            out.push_str(":{");
            write_pairs(out, pairs);
            out.push('}');
        }
        PhpValue::Object {
            class_name,
            properties,
        } => {
            out.push_str("O:");
            out.push_str(&class_name.len().to_string());
            out.push_str(":\"");
            out.push_str(class_name);
            out.push_str("\":");
            out.push_str(&properties.len().to_string());
            out.push_str(":{");
            write_pairs(out, properties);
            out.push('}');
        }
    }
}

fn write_pairs(out: &mut String, pairs: &[(PhpKey<'_>, PhpValue<'_>)]) {
    for (key, value) in pairs {
        match key {
            PhpKey::Int(i) => {
                out.push_str("i:");
                out.push_str(&i.to_string());
                out.push(';');
            }
            PhpKey::Str(s) => write_string(out, s),
        }
        write_value(out, value);
    }
}

/// `s:<byte-len>:"<content>";` — the length is `str::len()`, a UTF-8 byte
/// count, never a character count.
fn write_string(out: &mut String, content: &str) {
    out.push_str("s:");
    out.push_str(&content.len().to_string());
    out.push_str(":\"");
    out.push_str(content);
    out.push_str("\";");
}

/// PHP spells non-finite doubles `NAN`, `INF` and `-INF`; finite values use
/// the shortest round-trip decimal form, matching `serialize_precision=-1`.
fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("NAN");
    } else if f.is_infinite() {
        out.push_str(if f.is_sign_positive() { "INF" } else { "-INF" });
    } else {
        out.push_str(&f.to_string());
    }
}
