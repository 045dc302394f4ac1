//! JSON bridging for both codec directions.
//!
//! PHP's single array type conflates lists and maps; the value model keeps
//! it as an ordered pair sequence and this module decides, per array, how
//! it shows up in JSON: a pair sequence keyed exactly `0..n-1` in order
//! renders as a JSON array, anything else as a JSON object with stringified
//! keys. Coming back, JSON arrays become `0..n-1`-keyed pairs and JSON
//! objects become string-keyed pairs in the object's own order — class
//! names cannot be expressed in plain JSON, so a PHP object decodes to a
//! plain JSON object and re-encodes as an array.

use std::borrow::Cow;

use serde_json::{json, Map, Number, Value as JsonValue};

use crate::error::{CodecError, ErrorKind, Result};
use crate::types::{PhpKey, PhpValue};

/// Convert a value to a JSON value.
///
/// # Mapping Rules
///
/// | PHP side | JSON side |
/// |----------|-----------|
/// | `null` | `null` |
/// | `bool` | `boolean` |
/// | `int` | `number` |
/// | `float` | `number` (`null` for NaN, `"Infinity"`/`"-Infinity"` strings) |
/// | `string` | `string` |
/// | `array`, keys `0..n-1` in order | `array` |
/// | `array`, any other keys | `object`, keys stringified |
/// | `object` | `object` of its properties, class name dropped |
pub fn to_json(value: &PhpValue) -> JsonValue {
    match value {
        PhpValue::Null => JsonValue::Null,
        PhpValue::Bool(b) => JsonValue::Bool(*b),
        PhpValue::Int(i) => json!(*i),
        PhpValue::Float(f) => {
            // Plain JSON has no non-finite numbers.
            if f.is_nan() {
                JsonValue::Null
            } else if f.is_infinite() {
                if f.is_sign_positive() {
                    json!("Infinity")
                } else {
                    json!("-Infinity")
                }
            } else {
                json!(*f)
            }
        }
        PhpValue::Str(s) => JsonValue::String(s.to_string()),
        PhpValue::Array(pairs) => {
            if is_dense(pairs) {
                JsonValue::Array(pairs.iter().map(|(_, v)| to_json(v)).collect())
            } else {
                pairs_to_object(pairs)
            }
        }
        PhpValue::Object { properties, .. } => pairs_to_object(properties),
    }
}

/// Keys exactly `0..n-1`, in that order.
fn is_dense(pairs: &[(PhpKey<'_>, PhpValue<'_>)]) -> bool {
    pairs
        .iter()
        .enumerate()
        .all(|(i, (k, _))| matches!(k, PhpKey::Int(n) if *n == i as i64))
}

fn pairs_to_object(pairs: &[(PhpKey<'_>, PhpValue<'_>)]) -> JsonValue {
    let mut map = Map::with_capacity(pairs.len());
    for (k, v) in pairs {
        map.insert(k.to_string(), to_json(v));
    }
    JsonValue::Object(map)
}

/// Convert a value to JSON text.
///
/// Key order follows pair order, and non-ASCII characters are emitted as
/// literal UTF-8, never `\uXXXX` escapes.
pub fn to_json_string(value: &PhpValue) -> Result<String> {
    serde_json::to_string(&to_json(value)).map_err(CodecError::from)
}

/// Parse JSON text into a value.
pub fn from_json_str(text: &str) -> Result<PhpValue<'static>> {
    let parsed: JsonValue = serde_json::from_str(text)?;
    from_json(&parsed)
}

/// Convert a JSON value into a value.
///
/// JSON arrays become arrays keyed `0..n-1`; JSON objects become arrays
/// with string keys in the object's own order. There is no JSON spelling
/// that produces a PHP object.
pub fn from_json(value: &JsonValue) -> Result<PhpValue<'static>> {
    Ok(match value {
        JsonValue::Null => PhpValue::Null,
        JsonValue::Bool(b) => PhpValue::Bool(*b),
        JsonValue::Number(n) => number_to_value(n)?,
        JsonValue::String(s) => PhpValue::Str(Cow::Owned(s.clone())),
        JsonValue::Array(items) => {
            let mut pairs = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                pairs.push((PhpKey::Int(i as i64), from_json(item)?));
            }
            PhpValue::Array(pairs)
        }
        JsonValue::Object(map) => {
            let mut pairs = Vec::with_capacity(map.len());
            for (k, v) in map {
                pairs.push((PhpKey::Str(Cow::Owned(k.clone())), from_json(v)?));
            }
            PhpValue::Array(pairs)
        }
    })
}

/// Integer-form numbers (no `.`/`e`/`E`) must fit i64; larger ones are
/// rejected rather than silently widened to float. Float-form numbers take
/// f64 precision, but only finite results are accepted.
fn number_to_value(n: &Number) -> Result<PhpValue<'static>> {
    if let Some(i) = n.as_i64() {
        return Ok(PhpValue::Int(i));
    }

    let repr = n.to_string();
    let float_form = repr.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
    if float_form {
        if let Some(f) = n.as_f64() {
            if f.is_finite() {
                return Ok(PhpValue::Float(f));
            }
        }
    }

    Err(CodecError::without_position(
        ErrorKind::UnrepresentableNumber(repr),
    ))
}

#[cfg(test)]
#[allow(clippy::approx_constant)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::parser::from_bytes;
    use crate::serializer::to_bytes;

    #[test]
    fn test_simple_types() {
        assert_eq!(to_json(&PhpValue::Null), JsonValue::Null);
        assert_eq!(to_json(&PhpValue::Bool(true)), JsonValue::Bool(true));
        assert_eq!(to_json(&PhpValue::Int(42)), json!(42));
        assert_eq!(to_json(&PhpValue::Float(3.14)), json!(3.14));
    }

    #[test]
    fn test_nonfinite_floats() {
        assert_eq!(to_json(&PhpValue::Float(f64::NAN)), JsonValue::Null);
        assert_eq!(to_json(&PhpValue::Float(f64::INFINITY)), json!("Infinity"));
        assert_eq!(
            to_json(&PhpValue::Float(f64::NEG_INFINITY)),
            json!("-Infinity")
        );
    }

    #[test]
    fn test_dense_array_renders_as_list() {
        let value = from_bytes(b"a:3:{i:0;s:1:\"a\";i:1;s:1:\"b\";i:2;s:1:\"c\";}").unwrap();
        assert_eq!(to_json(&value), json!(["a", "b", "c"]));
    }

    #[test]
    fn test_out_of_order_keys_render_as_object() {
        // Same keys, wrong order: not a dense sequence.
        let value = from_bytes(b"a:3:{i:0;s:1:\"a\";i:2;s:1:\"c\";i:1;s:1:\"b\";}").unwrap();
        assert_eq!(
            to_json_string(&value).unwrap(),
            r#"{"0":"a","2":"c","1":"b"}"#
        );
    }

    #[test]
    fn test_sparse_keys_render_as_object() {
        let value = from_bytes(b"a:2:{i:0;s:3:\"foo\";i:5;s:3:\"bar\";}").unwrap();
        assert_eq!(to_json(&value), json!({"0": "foo", "5": "bar"}));
    }

    #[test]
    fn test_rendering_policy_applies_at_every_depth() {
        let value =
            from_bytes(b"a:1:{s:5:\"inner\";a:2:{i:0;i:10;i:1;i:20;}}").unwrap();
        assert_eq!(to_json(&value), json!({"inner": [10, 20]}));
    }

    #[test]
    fn test_object_drops_class_name() {
        let value =
            from_bytes(br#"O:8:"stdClass":2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}"#).unwrap();
        assert_eq!(to_json(&value), json!({"name": "Alice", "age": 30}));
    }

    #[test]
    fn test_scalar_string_decodes_to_quoted_json() {
        assert_eq!(crate::decode(b"s:4:\"test\";").unwrap(), r#""test""#);
    }

    #[test]
    fn test_non_ascii_not_escaped() {
        assert_eq!(
            crate::decode("s:3:\"\u{2713}\";".as_bytes()).unwrap(),
            "\"\u{2713}\""
        );
    }

    #[test]
    fn test_nested_unicode_fixture() {
        // {'a': 1, 'b': 'ъъъ', 'c': None, 'd': '✓', 'e': {'f': {'g': '🔫', 'h': '喂'}}}
        // as produced by PHP serialize(): lengths are UTF-8 byte counts
        // (ъ=2, ✓=3, 🔫=4, 喂=3 bytes).
        let wire = "a:5:{s:1:\"a\";i:1;s:1:\"b\";s:6:\"ъъъ\";s:1:\"c\";N;s:1:\"d\";s:3:\"✓\";s:1:\"e\";a:1:{s:1:\"f\";a:2:{s:1:\"g\";s:4:\"🔫\";s:1:\"h\";s:3:\"喂\";}}}";
        assert_eq!(
            crate::decode(wire.as_bytes()).unwrap(),
            r#"{"a":1,"b":"ъъъ","c":null,"d":"✓","e":{"f":{"g":"🔫","h":"喂"}}}"#
        );
    }

    #[test]
    fn test_from_json_array_keys() {
        let value = from_json_str(r#"["x","y"]"#).unwrap();
        let pairs = value.as_pairs().unwrap();
        assert_eq!(pairs[0].0, PhpKey::Int(0));
        assert_eq!(pairs[1].0, PhpKey::Int(1));
    }

    #[test]
    fn test_from_json_object_preserves_key_order() {
        let value = from_json_str(r#"{"z":1,"a":2}"#).unwrap();
        let pairs = value.as_pairs().unwrap();
        assert_eq!(pairs[0].0, PhpKey::Str("z".into()));
        assert_eq!(pairs[1].0, PhpKey::Str("a".into()));
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(from_json_str("7").unwrap(), PhpValue::Int(7));
        assert_eq!(
            from_json_str("9223372036854775807").unwrap(),
            PhpValue::Int(i64::MAX)
        );
        assert_eq!(from_json_str("1.5").unwrap(), PhpValue::Float(1.5));
        assert_eq!(from_json_str("-3e2").unwrap(), PhpValue::Float(-300.0));
        // Float-form spelling of an integral value stays a float.
        assert_eq!(from_json_str("1.0").unwrap(), PhpValue::Float(1.0));
    }

    #[test]
    fn test_from_json_rejects_oversized_integers() {
        for text in ["9223372036854775808", "99999999999999999999", "-99999999999999999999"] {
            let err = from_json_str(text).unwrap_err();
            assert!(
                matches!(err.kind, ErrorKind::UnrepresentableNumber(_)),
                "{} should be unrepresentable",
                text
            );
            assert_eq!(err.category(), ErrorCategory::UnrepresentableNumber);
        }
    }

    #[test]
    fn test_from_json_rejects_overflowing_floats() {
        let err = from_json_str("1e999").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnrepresentableNumber(_)));
    }

    #[test]
    fn test_invalid_json_reports_as_such() {
        let err = from_json_str("{broken").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidJson(_)));
        assert_eq!(err.category(), ErrorCategory::InvalidJson);
    }

    #[test]
    fn test_encode_then_decode_is_identity() {
        // decode(encode(text)) parses to a value structurally equal to the
        // original for JSON without duplicate keys or out-of-range numbers.
        let texts = [
            "null",
            "true",
            "-12",
            "2.5",
            r#""hello""#,
            r#"["a",1,null,[true]]"#,
            r#"{"z":1,"a":{"nested":["x"]},"喂":"✓"}"#,
        ];
        for text in texts {
            let value = from_json_str(text).unwrap();
            let wire = to_bytes(&value);
            let round = from_bytes(&wire).unwrap();
            assert_eq!(
                serde_json::from_str::<JsonValue>(text).unwrap(),
                to_json(&round),
                "round trip of {}",
                text
            );
        }
    }

    #[test]
    fn test_encode_length_counts_bytes() {
        // U+2713 is one character but three UTF-8 bytes: the emitted
        // length must be 3.
        let out = crate::encode(r#"{"a": "✓"}"#).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a:1:{s:1:\"a\";s:3:\"✓\";}");
    }

    #[test]
    fn test_encode_unicode_fixture() {
        // json.dumps({'喂': 'test'}) -> phpserialize.dumps({'喂': 'test'})
        let out = crate::encode(r#"{"喂": "test"}"#).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a:1:{s:3:\"喂\";s:4:\"test\";}"
        );
    }
}
