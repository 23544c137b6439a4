//! Evaluate the same rule under both dialects and show where they disagree
//! -- useful when porting a rule between JsonLogic and CertLogic collections.
//!
//! ```text
//! cargo run --example dialect_diff -- '{"or": [true, false]}' null
//! ```

#![deny(clippy::expect_used, clippy::unwrap_used)]
// Demo binaries are CLI front-ends, not library code -- user-facing error
// messages belong on stderr.
#![allow(clippy::print_stderr)]

use std::env;
use std::process;

use jsonlogic::{apply_json_str, certlogic_apply_json_str};

fn main() {
    let mut args = env::args().skip(1);
    let (Some(rule), Some(data)) = (args.next(), args.next()) else {
        eprintln!("usage: dialect_diff <rule-json> <data-json>");
        process::exit(2);
    };

    let json_logic = apply_json_str(&rule, &data);
    let cert_logic = certlogic_apply_json_str(&rule, &data);

    println!("jsonlogic: {}", render(&json_logic));
    println!("certlogic: {}", render(&cert_logic));

    if json_logic.ok() != cert_logic.ok() {
        println!("(dialects disagree)");
    }
}

fn render(result: &Result<String, jsonlogic::Error>) -> String {
    match result {
        Ok(text) => text.clone(),
        Err(err) => format!("<error: {err}>"),
    }
}
