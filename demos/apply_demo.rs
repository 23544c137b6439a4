//! Evaluate a JsonLogic rule against a data value passed on the command
//! line, printing the result as JSON.
//!
//! ```text
//! cargo run --example apply_demo -- '{"var": "a"}' '{"a": 5}'
//! ```

#![deny(clippy::expect_used, clippy::unwrap_used)]
// Demo binaries are CLI front-ends, not library code -- user-facing error
// messages belong on stderr.
#![allow(clippy::print_stderr)]

use std::env;
use std::process;

use jsonlogic::apply_json_str;

fn main() {
    let mut args = env::args().skip(1);
    let (Some(rule), Some(data)) = (args.next(), args.next()) else {
        eprintln!("usage: apply_demo <rule-json> <data-json>");
        process::exit(2);
    };

    match apply_json_str(&rule, &data) {
        Ok(result) => println!("{result}"),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}
