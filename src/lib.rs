//! A rule-language evaluator over JSON values, supporting both the
//! JsonLogic and CertLogic dialects.
//!
//! ```
//! use jsonlogic::api::apply_json_str;
//!
//! let result = apply_json_str(r#"{"if": [{">": [2, 1]}, "yes", "no"]}"#, "null").unwrap();
//! assert_eq!(result, "\"yes\"");
//! ```

// Prevent accidental debug output in library code; callers decide how (or
// whether) to surface diagnostics.
#![deny(clippy::print_stderr)]

pub mod error;
pub mod value;

pub mod coerce;

mod eval;
mod ops;
mod parse;
mod registry;
mod stringify;

pub mod api;

pub use api::{
    apply_json_str, apply_json_str_custom, apply_json_str_with_extras, apply_json_value,
    certlogic_apply_json_str, certlogic_apply_json_value,
};
pub use error::{Error, ErrorKind, ParseError};
pub use eval::{apply, apply_custom, certlogic_apply, certlogic_apply_custom};
pub use ops::{
    with_cert_logic_builtins, with_cert_logic_extras, with_json_logic_builtins,
    with_json_logic_extras,
};
pub use parse::{parse, parse_str, LineInfo};
pub use registry::{Operation, OperationFn, Registry};
pub use stringify::{stringify, stringify_file, stringify_utf8};
pub use value::Value;
