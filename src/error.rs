//! Error kinds and the library-level error type.
//!
//! Two error shapes coexist in this crate, mirroring the rule language's own
//! distinction: in-band [`ErrorKind`] handles (what a rule evaluates *to*) and
//! the out-of-band [`Error`] type (what a fallible library call *returns*).

use std::fmt;

use thiserror::Error;

use crate::parse::LineInfo;

/// The closed set of error kinds a `Value::Error` handle may carry.
///
/// This mirrors the rule language's own error sentinel set. `Success`, the
/// grounding C source's internal-only zero discriminant, has no variant here:
/// `Result`/`Option` already give Rust a type-level way to express "no error".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    OutOfMemory = 1,
    IllegalOperation = 2,
    IllegalArgument = 3,
    InternalError = 4,
    StopIteration = 5,
    IOError = 6,
    SyntaxError = 7,
    UnicodeError = 8,
}

impl ErrorKind {
    /// The default human-readable message for this kind, used when a
    /// built-in raises it without a more specific message of its own.
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::IllegalOperation => "illegal operation",
            ErrorKind::IllegalArgument => "illegal argument",
            ErrorKind::InternalError => "internal error",
            ErrorKind::StopIteration => "stop iteration",
            ErrorKind::IOError => "I/O error",
            ErrorKind::SyntaxError => "syntax error",
            ErrorKind::UnicodeError => "unicode error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_message())
    }
}

/// A JSON syntax error raised by [`crate::parse::parse`], carrying the
/// position it was found at.
///
/// Grounded on `subset_julia_vm_parser/src/error.rs`'s `ParseError`: a
/// `thiserror`-derived enum with a `span`-style accessor and a
/// `format_with_context` pretty-printer, generalized here from the teacher's
/// `Span` (a start/end range) to this spec's single-point `LineInfo`, since
/// JSON grammar errors are always reported at one position, not a range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected character at {0:?}")]
    UnexpectedCharacter(LineInfo),

    #[error("unexpected end of input at {0:?}")]
    UnexpectedEof(LineInfo),

    #[error("invalid number literal at {0:?}")]
    InvalidNumber(LineInfo),

    #[error("invalid unicode escape at {0:?}")]
    InvalidUnicodeEscape(LineInfo),

    #[error("control character in string at {0:?}")]
    ControlCharacterInString(LineInfo),

    #[error("invalid utf-8 byte sequence at {0:?}")]
    UnicodeError(LineInfo),

    #[error("trailing data after value at {0:?}")]
    TrailingData(LineInfo),
}

impl ParseError {
    /// The position this error was raised at.
    pub fn line_info(&self) -> LineInfo {
        match *self {
            ParseError::UnexpectedCharacter(info)
            | ParseError::UnexpectedEof(info)
            | ParseError::InvalidNumber(info)
            | ParseError::InvalidUnicodeEscape(info)
            | ParseError::ControlCharacterInString(info)
            | ParseError::UnicodeError(info)
            | ParseError::TrailingData(info) => info,
        }
    }

    /// Render the source line the error occurred on together with a
    /// previous-line-of-context and a `^` marker under the offending column.
    ///
    /// Grounded directly on `ParseError::format_with_context` in the teacher
    /// parser crate.
    pub fn format_with_context(&self, source: &str) -> String {
        let info = self.line_info();
        let lines: Vec<&str> = source.lines().collect();
        let line_idx = info.lineno.saturating_sub(1);

        let mut out = String::new();
        if line_idx > 0 {
            if let Some(prev) = lines.get(line_idx - 1) {
                out.push_str(&format!("  {} | {}\n", line_idx, prev));
            }
        }

        let Some(line) = lines.get(line_idx) else {
            return out;
        };

        let col = info.column.saturating_sub(1);
        let spaces = " ".repeat(col);
        out.push_str(&format!("  {} | {}\n", info.lineno, line));
        out.push_str(&format!(
            "  {} | {}^",
            " ".repeat(info.lineno.to_string().len()),
            spaces
        ));
        out
    }
}

/// The library-level error type for operations whose failure is not itself a
/// rule-language value: parsing and writing to an `io::Write` sink.
///
/// `apply`/`apply_custom` never return this type — their failures are always
/// in-band `Value::Error` handles (see [`ErrorKind`]), per the grounding
/// source's uniform handle-based error model.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
