// rowfont
// Copyright 2025 The rowfont Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Support code shared by the rowfont command-line tools.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use anyhow::{Error, Result};
use getopts::{Matches, Options};
use std::env;
use std::fmt::Display;
use std::path::Path;
use std::process;
use std::str::FromStr;

/// Errors caused by the user when invoking a binary (invalid options or arguments).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct UsageError {
    message: String,
}

impl UsageError {
    /// Creates a new usage error with `message`.
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self { message: message.into() }
    }
}

/// Flattens all causes of an error into a single string.
pub fn flatten_causes(err: &Error) -> String {
    err.chain().fold(String::new(), |flattened, cause| {
        let flattened = if flattened.is_empty() { flattened } else { flattened + ": " };
        flattened + &format!("{}", cause)
    })
}

/// Consumes and returns the program name from `env::Args`.
///
/// If the program name cannot be obtained, return `default_name` instead.
pub fn program_name(mut args: env::Args, default_name: &'static str) -> (String, env::Args) {
    let name = args
        .next()
        .and_then(|arg0| {
            Path::new(&arg0).file_stem().and_then(|basename| basename.to_str()).map(str::to_owned)
        })
        .unwrap_or_else(|| default_name.to_owned());
    (name, args)
}

/// Parses a codepoint given in decimal or as a `0x`-prefixed hexadecimal number.
pub fn parse_codepoint(s: &str) -> Result<u32, UsageError> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    };
    parsed.map_err(|_| UsageError::new(format!("Invalid codepoint '{}'", s)))
}

/// Parses a character given either literally or as a `0x`-prefixed hexadecimal codepoint.
pub fn parse_char_arg(s: &str) -> Result<u32, UsageError> {
    let mut chars = s.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(u32::from(ch));
    }
    if s.starts_with("0x") || s.starts_with("0X") {
        return parse_codepoint(s);
    }
    Err(UsageError::new(format!(
        "Invalid character '{}': must be a single character or a 0x-prefixed codepoint",
        s
    )))
}

/// Returns the value of the `--name` option parsed as a `T`, or none if the option is absent.
pub fn parse_flag<T>(matches: &Matches, name: &str) -> Result<Option<T>, UsageError>
where
    T: FromStr,
    T::Err: Display,
{
    match matches.opt_str(name) {
        Some(value) => match value.parse::<T>() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => Err(UsageError::new(format!("Invalid value for --{}: {}", name, e))),
        },
        None => Ok(None),
    }
}

/// Like `parse_flag` but fails if the `--name` option is absent.
pub fn required_flag<T>(matches: &Matches, name: &str) -> Result<T, UsageError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_flag(matches, name)?
        .ok_or_else(|| UsageError::new(format!("Missing required option --{}", name)))
}

/// Prints usage information for program `name` taking `free_args`.
pub fn help(name: &str, free_args: &str, opts: &Options) -> Result<i32> {
    let brief = format!("Usage: {} [options] {}", name, free_args);
    println!("{}", opts.usage(&brief));
    Ok(0)
}

/// Prints version information following the GNU Standards format.
pub fn version() -> Result<i32> {
    println!("rowfont {}", env!("CARGO_PKG_VERSION"));
    println!("Copyright 2025 The rowfont Authors");
    println!("License Apache Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0>");
    Ok(0)
}

/// Sets up logging to stderr, showing warnings and above unless `RUST_LOG` says otherwise.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

/// Runs `safe_main` and terminates the process with an exit code matching its outcome.
///
/// Usage errors exit with code 2 and any other error exits with code 1.
pub fn run_main(default_name: &'static str, safe_main: fn(&str, env::Args) -> Result<i32>) -> ! {
    init_logging();

    let (name, args) = program_name(env::args(), default_name);
    match safe_main(&name, args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            if let Some(e) = e.downcast_ref::<UsageError>() {
                eprintln!("Usage error: {}", e);
                eprintln!("Type {} --help for more information", name);
                process::exit(2);
            } else if let Some(e) = e.downcast_ref::<getopts::Fail>() {
                eprintln!("Usage error: {}", e);
                eprintln!("Type {} --help for more information", name);
                process::exit(2);
            } else {
                eprintln!("{}: {}", name, flatten_causes(&e));
                process::exit(1);
            }
        }
    }
}
