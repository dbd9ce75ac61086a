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

//! Parses a font table saved as a C header, validates it and shows its glyphs.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use anyhow::{anyhow, Context, Error, Result};
use getopts::Options;
use log::debug;
use rowfont_cli::{flatten_causes, help, parse_char_arg, run_main, version, UsageError};
use rowfont_core::parser;
use rowfont_core::serializer::{escape_codepoint, escape_source};
use rowfont_core::table::FontTable;
use rowfont_core::validate::{check, Check};
use rowfont_core::visual::{render_glyph, render_grid, BLOCKS};
use std::env;
use std::fs::File;
use std::io;

/// Characters shown when the user does not ask for anything specific.
const SAMPLE_CHARS: &[char] = &['A', 'g', '0', '5', '!', '@'];

/// Draws the packed `bytes` of a glyph from `table`.
fn print_glyph(table: &FontTable, bytes: &[u8]) {
    let spec = table.spec();
    for line in render_glyph(bytes, spec.cell_width(), spec.cell_height(), &BLOCKS) {
        println!("{}", line);
    }
}

/// Prints the descriptive fields of `table`.
fn print_info(table: &FontTable) {
    let spec = table.spec();
    let bytes_per_char = table.glyphs().first().map(|g| g.packed_bytes().len()).unwrap_or(0);
    let total = table.total_bytes();

    println!("Font Information:");
    println!("  Name:       {}", spec.name());
    if let Some(source) = table.source() {
        println!("  Font:       {}", escape_source(source));
    }
    println!("  Size:       {}x{} pixels", spec.cell_width(), spec.cell_height());
    println!("  Range:      0x{:02X}..0x{:02X}", spec.codepoint_start(), spec.codepoint_end());
    println!("  Characters: {}", table.glyphs().len());
    println!(
        "  Bytes/char: {} ({} rows × {} bytes/row)",
        bytes_per_char,
        spec.cell_height(),
        spec.bytes_per_row()
    );
    println!("  Total size: {} bytes ({:.2} KB)", total, total as f64 / 1024.0);
    println!();
}

/// Runs the validation checks on `table` in order, printing their results until the first
/// failure, and returns whether all passed.
fn print_validation(table: &FontTable) -> bool {
    println!("Validation:");
    for step in Check::ALL {
        match check(table, step) {
            Ok(()) => match step {
                Check::Count => {
                    println!("  ✓ Character count correct ({})", table.glyphs().len())
                }
                Check::Size => println!(
                    "  ✓ All characters have correct byte count ({})",
                    table.spec().bytes_per_char()
                ),
                Check::Sequence => println!("  ✓ Codepoint sequence is continuous"),
            },
            Err(e) => {
                println!();
                println!("  ✗ {}", e);
                return false;
            }
        }
    }
    println!();
    true
}

/// Version of `main` that returns errors to the caller for reporting.
fn safe_main(name: &str, args: env::Args) -> Result<i32> {
    let args: Vec<String> = args.collect();

    let mut opts = Options::new();
    opts.optflag("h", "help", "show command-line usage information and exit");
    opts.optopt("c", "char", "character to display, literally or as 0x-prefixed codepoint", "CHAR");
    opts.optflag("a", "all", "display all characters");
    opts.optflag("", "version", "show version information and exit");
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        return help(name, "<font-header>", &opts);
    }

    if matches.opt_present("version") {
        return version();
    }

    let path = match matches.free.as_slice() {
        [] => return Err(UsageError::new("Missing font header file").into()),
        [path] => path.clone(),
        [_, ..] => return Err(UsageError::new("Too many arguments").into()),
    };
    let show_char = match matches.opt_str("char") {
        Some(value) => Some((parse_char_arg(&value)?, value)),
        None => None,
    };

    let mut input = File::open(&path).with_context(|| format!("Cannot open {}", path))?;

    println!("{}", "=".repeat(60));
    println!("Font Header Test");
    println!("{}", "=".repeat(60));
    println!("File: {}", path);
    println!();

    let table = match parser::parse(&mut input as &mut dyn io::Read) {
        Ok(table) => table,
        Err(e) => {
            println!("ERROR: Failed to parse font file: {}", flatten_causes(&Error::from(e)));
            return Ok(1);
        }
    };

    debug!("Parsed {} glyphs from {}", table.glyphs().len(), path);

    print_info(&table);
    if !print_validation(&table) {
        return Ok(1);
    }

    let spec = table.spec();
    if let Some((codepoint, arg)) = show_char {
        let bytes = table
            .lookup(codepoint)
            .ok_or_else(|| anyhow!("Character '{}' not found in font", arg))?;
        println!("Character Preview: '{}' (0x{:02X})", escape_codepoint(codepoint), codepoint);
        println!("{}", "─".repeat(spec.cell_width()));
        print_glyph(&table, bytes);
        println!("{}", "─".repeat(spec.cell_width()));
    } else if matches.opt_present("all") {
        println!("All Characters:");
        println!("{}", "=".repeat(60));
        print!("{}", render_grid(&table, &BLOCKS));
    } else {
        println!("Sample Characters:");
        println!("{}", "=".repeat(60));
        for ch in SAMPLE_CHARS {
            let codepoint = u32::from(*ch);
            if let Some(bytes) = table.lookup(codepoint) {
                println!("\n'{}' (0x{:02X}):", escape_codepoint(codepoint), codepoint);
                print_glyph(&table, bytes);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60));
    println!("Test completed successfully!");
    println!("{}", "=".repeat(60));
    Ok(0)
}

fn main() {
    run_main("rowfont-check", safe_main)
}
