//! Byte-index / line / column tracking for parse diagnostics (§4.4).

use std::fmt;

/// `(byte_index, 1-based line, 1-based column)`, produced by the parser on
/// both success (current position) and failure (error position). Grounded
/// on `jsonlogic_get_lineinfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    pub index: usize,
    pub lineno: usize,
    pub column: usize,
}

impl fmt::Display for LineInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.lineno, self.column)
    }
}

/// Scan `bytes[..index]` counting newlines to recover `(line, column)`.
/// Grounded directly on `jsonlogic_get_lineinfo`: a linear scan rather than
/// an incrementally-maintained counter, since the parser only needs this at
/// error time (or once, at completion), not per byte.
pub fn line_info(bytes: &[u8], index: usize) -> LineInfo {
    let index = index.min(bytes.len());
    let mut lineno = 1usize;
    let mut line_start = 0usize;
    for (i, &b) in bytes[..index].iter().enumerate() {
        if b == b'\n' {
            lineno += 1;
            line_start = i + 1;
        }
    }
    LineInfo {
        index,
        lineno,
        column: 1 + (index - line_start),
    }
}
