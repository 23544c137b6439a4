//! The stringifier (C5): one generic tree walk written against a [`Sink`]
//! trait, instantiated for three output encodings.
//!
//! Grounded on `original_source/src/stringify.c`, which achieves the same
//! "one algorithm, three targets" goal through textual inclusion — the file
//! is `#include`d three times from `json.c` with its buffer type and
//! `append_*` functions renamed by macro. This crate expresses the same
//! idea as a single generic function over a `Sink` trait instead.

use crate::value::string::JsonString;
use crate::value::Value;

/// Where stringified output goes. One method per primitive write the tree
/// walk needs; implementors decide how to encode it.
pub trait Sink {
    type Error;

    /// Append a run of plain ASCII bytes (structural punctuation, keywords,
    /// short escapes, number literals).
    fn append_ascii(&mut self, s: &str) -> Result<(), Self::Error>;

    /// Append one string code unit in `[0x20, 0xFF]`, already known not to
    /// need escaping.
    fn append_unit(&mut self, unit: u16) -> Result<(), Self::Error>;
}

/// Either the sink failed, or the value tree contained an [`crate::error::ErrorKind`]
/// payload — the grounding source's "message written, then abort" behavior.
/// `stringify`/`stringify_utf8` swallow the latter (the message is already in
/// the buffer); `stringify_file` only has an I/O error to report, so it does
/// the same.
enum Abort<E> {
    SinkFailed(E),
    ValueError,
}

impl<E> From<E> for Abort<E> {
    fn from(e: E) -> Self {
        Abort::SinkFailed(e)
    }
}

fn write_value<S: Sink>(sink: &mut S, value: &Value) -> Result<(), Abort<S::Error>> {
    match value {
        Value::Number(n) => {
            if n.is_finite() {
                sink.append_ascii(&crate::coerce::format_number(*n))?;
            } else {
                sink.append_ascii("null")?;
            }
            Ok(())
        }
        Value::Null => Ok(sink.append_ascii("null")?),
        Value::Boolean(b) => Ok(sink.append_ascii(if *b { "true" } else { "false" })?),
        Value::String(s) => write_string(sink, s),
        Value::Array(items) => {
            sink.append_ascii("[")?;
            let mut first = true;
            for item in items.as_slice() {
                if !first {
                    sink.append_ascii(",")?;
                }
                first = false;
                write_value(sink, item)?;
            }
            Ok(sink.append_ascii("]")?)
        }
        Value::Object(obj) => {
            sink.append_ascii("{")?;
            let mut first = true;
            for (key, val) in obj.iter() {
                if !first {
                    sink.append_ascii(",")?;
                }
                first = false;
                write_string(sink, key)?;
                sink.append_ascii(":")?;
                write_value(sink, val)?;
            }
            Ok(sink.append_ascii("}")?)
        }
        Value::Error(kind, message) => {
            sink.append_ascii(message).map_err(Abort::SinkFailed)?;
            let _ = kind;
            Err(Abort::ValueError)
        }
    }
}

fn write_string<S: Sink>(sink: &mut S, s: &JsonString) -> Result<(), Abort<S::Error>> {
    sink.append_ascii("\"")?;
    for unit in s.as_units() {
        match *unit {
            0x22 => sink.append_ascii("\\\"")?,
            0x5C => sink.append_ascii("\\\\")?,
            0x08 => sink.append_ascii("\\b")?,
            0x0C => sink.append_ascii("\\f")?,
            0x0A => sink.append_ascii("\\n")?,
            0x0D => sink.append_ascii("\\r")?,
            0x09 => sink.append_ascii("\\t")?,
            ch if ch > 0xFF => sink.append_ascii(&format!("\\u{:04x}", ch))?,
            ch => sink.append_unit(ch)?,
        }
    }
    Ok(sink.append_ascii("\"")?)
}

// -- StringSink: builds a JsonString (UTF-16) -------------------------------

struct StringSink {
    buf: crate::value::string::StringBuf,
}

impl Sink for StringSink {
    type Error = std::convert::Infallible;

    fn append_ascii(&mut self, s: &str) -> Result<(), Self::Error> {
        self.buf.push_str(s);
        Ok(())
    }

    fn append_unit(&mut self, unit: u16) -> Result<(), Self::Error> {
        self.buf.push_utf16(unit);
        Ok(())
    }
}

/// Serialize `value` to its JSON text. A nested error value's message is
/// written verbatim (not JSON-escaped) and serialization stops there, per
/// §4.5's short-circuit rule — the result is the partial text built so far.
pub fn stringify(value: &Value) -> String {
    let mut sink = StringSink {
        buf: crate::value::string::StringBuf::new(),
    };
    match write_value(&mut sink, value) {
        Ok(()) | Err(Abort::ValueError) => {}
        Err(Abort::SinkFailed(never)) => match never {},
    }
    sink.buf.take().to_string_lossy()
}

// -- Utf8Sink: builds a UTF-8 byte buffer -----------------------------------

struct Utf8Sink {
    buf: Vec<u8>,
}

impl Sink for Utf8Sink {
    type Error = std::convert::Infallible;

    fn append_ascii(&mut self, s: &str) -> Result<(), Self::Error> {
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }

    fn append_unit(&mut self, unit: u16) -> Result<(), Self::Error> {
        self.buf.extend_from_slice(encode_latin1_unit(unit).as_bytes());
        Ok(())
    }
}

/// Serialize `value` to UTF-8 bytes (code units above `0xFF` still escape to
/// `\uXXXX`; units in `0x80..=0xFF` are re-encoded as two-byte UTF-8, so the
/// output is valid UTF-8, not restricted to ASCII).
pub fn stringify_utf8(value: &Value) -> Vec<u8> {
    let mut sink = Utf8Sink { buf: Vec::new() };
    match write_value(&mut sink, value) {
        Ok(()) | Err(Abort::ValueError) => {}
        Err(Abort::SinkFailed(never)) => match never {},
    }
    sink.buf
}

// -- WriteSink: streams to any `io::Write` ----------------------------------

struct WriteSink<'a, W: std::io::Write> {
    writer: &'a mut W,
}

impl<'a, W: std::io::Write> Sink for WriteSink<'a, W> {
    type Error = std::io::Error;

    fn append_ascii(&mut self, s: &str) -> Result<(), Self::Error> {
        self.writer.write_all(s.as_bytes())
    }

    fn append_unit(&mut self, unit: u16) -> Result<(), Self::Error> {
        self.writer.write_all(encode_latin1_unit(unit).as_bytes())
    }
}

/// `write_string` only calls `append_unit` with units in `[0x20, 0xFF]`
/// (higher units already took the `\uXXXX` branch), so this is always a
/// valid Unicode scalar value needing at most two UTF-8 bytes.
fn encode_latin1_unit(unit: u16) -> String {
    let ch = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
    ch.to_string()
}

/// Serialize `value` as JSON text directly to `writer`, generalizing the
/// grounding source's `FILE*`-specific `jsonlogic_stringify_file` to any
/// `std::io::Write`.
pub fn stringify_file(writer: &mut impl std::io::Write, value: &Value) -> std::io::Result<()> {
    let mut sink = WriteSink { writer };
    match write_value(&mut sink, value) {
        Ok(()) | Err(Abort::ValueError) => Ok(()),
        Err(Abort::SinkFailed(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stringifies_scalars() {
        assert_eq!(stringify(&Value::null()), "null");
        assert_eq!(stringify(&Value::boolean(true)), "true");
        assert_eq!(stringify(&Value::number(3.5)), "3.5");
        assert_eq!(stringify(&Value::number(f64::NAN)), "null");
    }

    #[test]
    fn escapes_control_characters_and_high_units() {
        let s = Value::string_from_str("a\nb\"c\u{1f600}");
        assert_eq!(stringify(&s), "\"a\\nb\\\"c\\ud83d\\ude00\"");
    }

    #[test]
    fn arrays_and_objects_have_no_extra_spaces() {
        let v = Value::array(vec![Value::number(1.0), Value::number(2.0)]);
        assert_eq!(stringify(&v), "[1,2]");

        let v = Value::object(vec![("a".into(), Value::number(1.0))]);
        assert_eq!(stringify(&v), "{\"a\":1}");
    }

    #[test]
    fn error_value_writes_message_and_stops() {
        let v = Value::array(vec![
            Value::number(1.0),
            Value::error_default(crate::error::ErrorKind::IllegalArgument),
            Value::number(3.0),
        ]);
        // the '1' plus comma get written, then the error message, then the
        // walk aborts -- no closing ']', no trailing "3".
        assert_eq!(stringify(&v), "[1,illegal argument");
    }

    #[test]
    fn stringify_utf8_encodes_latin1_range_literally() {
        // 'é' is U+00E9, within [0x20, 0xFF], so it is emitted literally
        // (re-encoded to UTF-8) rather than escaped.
        let s = Value::string_from_str("café");
        let bytes = stringify_utf8(&s);
        assert_eq!(String::from_utf8(bytes).unwrap(), "\"café\"");
    }

    #[test]
    fn stringify_utf8_escapes_above_latin1() {
        let s = Value::string_from_str("\u{1f600}");
        let bytes = stringify_utf8(&s);
        assert_eq!(String::from_utf8(bytes).unwrap(), "\"\\ud83d\\ude00\"");
    }

    #[test]
    fn stringify_file_writes_to_a_vec() {
        let mut out = Vec::new();
        stringify_file(&mut out, &Value::number(7.0)).unwrap();
        assert_eq!(out, b"7");
    }
}
