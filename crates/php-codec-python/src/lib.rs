//! Python bindings for php-codec-core.

use pyo3::prelude::*;
use pyo3::types::PyBytes;

pyo3::create_exception!(php_codec, PhpCodecError, pyo3::exceptions::PyException);

/// Decode PHP serialized bytes to a JSON string.
///
/// Args:
///     data: Bytes containing PHP serialized data
///
/// Returns:
///     JSON text for the decoded value. PHP arrays with keys 0..n-1 become
///     JSON arrays, all other arrays become JSON objects with string keys,
///     and objects lose their class name.
///
/// Raises:
///     PhpCodecError: If the data cannot be parsed
///
/// Example:
///     >>> from php_codec import decode
///     >>> decode(b'a:2:{s:4:"name";s:5:"Alice";s:3:"age";i:30;}')
///     '{"name":"Alice","age":30}'
#[pyfunction]
fn decode(data: &[u8]) -> PyResult<String> {
    php_codec_core::decode(data).map_err(|e| PhpCodecError::new_err(e.to_string()))
}

/// Encode a JSON string to PHP serialized bytes.
///
/// Args:
///     text: JSON text
///
/// Returns:
///     PHP serialize bytes. JSON arrays become integer-keyed PHP arrays,
///     JSON objects become string-keyed PHP arrays in key order.
///
/// Raises:
///     PhpCodecError: If the text is not valid JSON or contains a number
///         with no 64-bit representation
///
/// Example:
///     >>> from php_codec import encode
///     >>> encode('{"a": 1}')
///     b'a:1:{s:1:"a";i:1;}'
#[pyfunction]
fn encode<'py>(py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyBytes>> {
    let bytes =
        php_codec_core::encode(text).map_err(|e| PhpCodecError::new_err(e.to_string()))?;
    Ok(PyBytes::new_bound(py, &bytes))
}

/// Check if data looks like PHP serialized format.
///
/// This is a quick tag sniff that doesn't fully validate the data; format
/// dispatch belongs to the caller.
///
/// Example:
///     >>> from php_codec import is_serialized
///     >>> is_serialized(b'a:1:{i:0;s:3:"foo";}')
///     True
///     >>> is_serialized(b'not serialized')
///     False
#[pyfunction]
fn is_serialized(data: &[u8]) -> bool {
    match data.first() {
        Some(first) => matches!(first, b'N' | b'b' | b'i' | b'd' | b's' | b'a' | b'O'),
        None => false,
    }
}

/// Get the version of the library.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// PHP serialize <-> JSON codec module for Python.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("PhpCodecError", m.py().get_type_bound::<PhpCodecError>())?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_function(wrap_pyfunction!(encode, m)?)?;
    m.add_function(wrap_pyfunction!(is_serialized, m)?)?;
    m.add_function(wrap_pyfunction!(version, m)?)?;
    Ok(())
}
