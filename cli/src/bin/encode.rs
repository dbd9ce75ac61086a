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

//! Rasterizes an outline font into a row-packed bitmap font table and saves it as a C header.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use anyhow::{Context, Result};
use getopts::{Matches, Options};
use log::debug;
use rowfont_cli::{
    help, parse_char_arg, parse_codepoint, parse_flag, required_flag, run_main, version,
    UsageError,
};
use rowfont_core::encoder::{
    encode, EncodeOptions, Encoding, Fallback, HorizontalPlacement, Placement, VerticalPlacement,
    DEFAULT_BASELINE_PERCENT,
};
use rowfont_core::serializer::{self, escape_codepoint};
use rowfont_core::spec::{FontSpec, DEFAULT_FIRST_CODEPOINT, DEFAULT_LAST_CODEPOINT};
use rowfont_core::visual::{render_glyph, ASCII};
use rowfont_ttf::FontdueRasterizer;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Parses the value of `--vertical`.
fn parse_vertical(value: Option<String>) -> Result<VerticalPlacement, UsageError> {
    match value.as_deref() {
        None | Some("ratio") => Ok(VerticalPlacement::CellRatio(DEFAULT_BASELINE_PERCENT)),
        Some("ascent") => Ok(VerticalPlacement::Ascent),
        Some(other) => Err(UsageError::new(format!(
            "Invalid value for --vertical: {} (must be ratio or ascent)",
            other
        ))),
    }
}

/// Parses the value of `--horizontal`.
fn parse_horizontal(value: Option<String>) -> Result<HorizontalPlacement, UsageError> {
    match value.as_deref() {
        None | Some("advance") => Ok(HorizontalPlacement::Advance),
        Some("ink") => Ok(HorizontalPlacement::Ink),
        Some(other) => Err(UsageError::new(format!(
            "Invalid value for --horizontal: {} (must be advance or ink)",
            other
        ))),
    }
}

/// Parses an optional codepoint flag, returning `default` if absent.
fn codepoint_flag(matches: &Matches, name: &str, default: u32) -> Result<u32, UsageError> {
    match matches.opt_str(name) {
        Some(value) => parse_codepoint(&value),
        None => Ok(default),
    }
}

/// Prints the settings of the conversion.
fn print_banner(
    font_path: &str,
    font_name: Option<&str>,
    output: &str,
    spec: &FontSpec,
    options: &EncodeOptions,
) {
    println!("{}", "=".repeat(60));
    println!("Bitmap Font Encoder");
    println!("{}", "=".repeat(60));
    println!("Input:  {}", font_path);
    if let Some(font_name) = font_name {
        println!("Font:   {}", font_name);
    }
    println!("Output: {}", output);
    println!("Size:   {}x{} pixels", spec.cell_width(), spec.cell_height());
    println!(
        "Range:  0x{:02X}..0x{:02X} ({} characters)",
        spec.codepoint_start(),
        spec.codepoint_end(),
        spec.glyph_count()
    );
    println!("Name:   {}", spec.name());
    if let Some(size) = options.point_size {
        println!("Point size: {} pixels per em", size);
    }
    if options.placement.baseline_offset != 0 {
        println!("Baseline offset: {}", options.placement.baseline_offset);
    }
    println!("{}", "=".repeat(60));
}

/// Prints the glyph of `codepoint` from `encoding` as ASCII art.
fn print_preview(encoding: &Encoding, codepoint: u32) {
    let spec = encoding.table.spec();
    match encoding.table.lookup(codepoint) {
        Some(bytes) => {
            println!("\nPreview of '{}' (0x{:02X}):", escape_codepoint(codepoint), codepoint);
            println!("{}", "=".repeat(spec.cell_width()));
            for line in render_glyph(bytes, spec.cell_width(), spec.cell_height(), &ASCII) {
                println!("{}", line);
            }
            println!("{}", "=".repeat(spec.cell_width()));
        }
        None => println!("WARNING: Character 0x{:02X} not in converted range", codepoint),
    }
}

/// Writes the table in `encoding` to a new file at `output`.
fn save(encoding: &Encoding, output: &str) -> io::Result<()> {
    let mut file = File::create(output)?;
    serializer::write(&encoding.table, &mut file)?;
    file.flush()
}

/// Version of `main` that returns errors to the caller for reporting.
fn safe_main(name: &str, args: env::Args) -> Result<i32> {
    let args: Vec<String> = args.collect();

    let mut opts = Options::new();
    opts.optflag("h", "help", "show command-line usage information and exit");
    opts.optopt("w", "width", "cell width in pixels (1-64)", "N");
    opts.optopt("t", "height", "cell height in pixels (1-64)", "N");
    opts.optopt("o", "output", "path to the C header to create", "PATH");
    opts.optopt("n", "name", "name of the table (default: rm690b0_font_<W>x<H>)", "NAME");
    opts.optopt("s", "size", "rasterization size in pixels per em (default: cell height)", "N");
    opts.optopt("", "start", "first codepoint, decimal or 0x-prefixed (default: 0x20)", "CP");
    opts.optopt("", "end", "last codepoint, decimal or 0x-prefixed (default: 0x7E)", "CP");
    opts.optopt("", "baseline", "rows to move the baseline down by (default: 0)", "N");
    opts.optopt("", "vertical", "baseline placement: ratio or ascent (default: ratio)", "MODE");
    opts.optopt("", "horizontal", "glyph centering: advance or ink (default: advance)", "MODE");
    opts.optopt("", "fallback", "codepoint to render in place of failed glyphs", "CP");
    opts.optopt("", "preview", "character to print as ASCII art after converting", "CHAR");
    opts.optflag("", "version", "show version information and exit");
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        return help(name, "<font-file>", &opts);
    }

    if matches.opt_present("version") {
        return version();
    }

    let font_path = match matches.free.as_slice() {
        [] => return Err(UsageError::new("Missing font file").into()),
        [path] => path.clone(),
        [_, ..] => return Err(UsageError::new("Too many arguments").into()),
    };

    let width: usize = required_flag(&matches, "width")?;
    let height: usize = required_flag(&matches, "height")?;
    let output: String = required_flag(&matches, "output")?;
    let start = codepoint_flag(&matches, "start", DEFAULT_FIRST_CODEPOINT)?;
    let end = codepoint_flag(&matches, "end", DEFAULT_LAST_CODEPOINT)?;
    let table_name =
        matches.opt_str("name").unwrap_or_else(|| FontSpec::default_name(width, height));

    let placement = Placement {
        vertical: parse_vertical(matches.opt_str("vertical"))?,
        horizontal: parse_horizontal(matches.opt_str("horizontal"))?,
        baseline_offset: parse_flag(&matches, "baseline")?.unwrap_or(0),
    };
    let fallback = match matches.opt_str("fallback") {
        Some(value) => Fallback::Copy(parse_codepoint(&value)?),
        None => Fallback::Blank,
    };
    let preview = match matches.opt_str("preview") {
        Some(value) => Some(parse_char_arg(&value)?),
        None => None,
    };

    let spec = FontSpec::new(width, height, start, end, table_name)?;
    let options = EncodeOptions {
        point_size: parse_flag(&matches, "size")?,
        placement,
        fallback,
        source: Path::new(&font_path).file_name().map(|n| n.to_string_lossy().into_owned()),
    };

    let rasterizer = FontdueRasterizer::from_path(Path::new(&font_path))
        .with_context(|| format!("Cannot load font {}", font_path))?;
    debug!("Encoding {} into {} with {:?}", font_path, output, options);

    print_banner(&font_path, rasterizer.name(), &output, &spec, &options);

    println!("\nConverting font...");
    let encoding = encode(&spec, &rasterizer, &options)?;
    println!("Converted {} characters", encoding.table.glyphs().len());
    if !encoding.failures.is_empty() {
        let codepoints: Vec<String> =
            encoding.failures.iter().map(|f| format!("0x{:02X}", f.codepoint)).collect();
        println!(
            "WARNING: {} characters could not be rasterized and were replaced: {}",
            codepoints.len(),
            codepoints.join(" ")
        );
    }

    if let Some(codepoint) = preview {
        print_preview(&encoding, codepoint);
    }

    println!("\nGenerating header file: {}", output);
    save(&encoding, &output).with_context(|| format!("Cannot write {}", output))?;

    let file_name = Path::new(&output)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| output.clone());
    println!("\nDone!");
    println!("Generated {} characters", spec.glyph_count());
    println!("Bytes per character: {}", spec.bytes_per_char());
    println!("Total size: {} bytes", encoding.table.total_bytes());
    println!("\nTo use in your code:");
    println!("  #include \"{}\"", file_name);
    println!(
        "  const uint8_t *glyph = {}_data[codepoint - 0x{:02X}];",
        spec.name(),
        spec.codepoint_start()
    );

    Ok(0)
}

fn main() {
    run_main("rowfont-encode", safe_main)
}
