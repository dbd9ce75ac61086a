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

//! Rendering of font tables as C headers.
//!
//! The header is the persisted form of a table.  Its preamble comments carry the metadata that the
//! parser needs to reconstruct the table without any outside knowledge, and its single array holds
//! one brace-enclosed group of bytes per glyph, each tagged with a comment naming its codepoint.

use crate::table::FontTable;
use std::fmt::Write as _;
use std::io;

/// Name recorded as the generator of the headers.
pub const GENERATOR: &str = "rowfont";

/// Number of bytes written per line within a glyph.
const BYTES_PER_LINE: usize = 16;

/// Formats `codepoint` for display within single quotes in a C comment.
pub fn escape_codepoint(codepoint: u32) -> String {
    match char::from_u32(codepoint) {
        Some('\\') => "\\\\".to_owned(),
        Some('\'') => "\\'".to_owned(),
        Some('"') => "\\\"".to_owned(),
        Some('\n') => "\\n".to_owned(),
        Some('\r') => "\\r".to_owned(),
        Some('\t') => "\\t".to_owned(),
        Some(ch) if (' '..='~').contains(&ch) => ch.to_string(),
        _ => format!("\\x{:02X}", codepoint),
    }
}

/// Formats the name of a source font for a single-line C comment.
///
/// Backslashes and control characters are escaped so that the parser can restore the original
/// name.  Everything else is written as is.
pub fn escape_source(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for ch in source.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch.is_control() => {
                let _ = write!(out, "\\x{:02X}", u32::from(ch));
            }
            ch => out.push(ch),
        }
    }
    out
}

/// Renders `table` as the contents of a C header.
pub fn serialize(table: &FontTable) -> String {
    let spec = table.spec();
    let start = spec.codepoint_start();
    let end = spec.codepoint_end();
    let name = spec.name();

    // Writing into a `String` cannot fail, so the results of `writeln!` are ignored.
    let mut out = String::new();
    out.push_str("#pragma once\n\n");
    out.push_str("#include <stdint.h>\n\n");
    if let Some(source) = table.source() {
        let _ = writeln!(out, "// Font: {}", escape_source(source));
    }
    let _ = writeln!(out, "// Size: {}x{} pixels", spec.cell_width(), spec.cell_height());
    let _ = writeln!(
        out,
        "// Characters: 0x{:02X}..0x{:02X} ('{}'..'{}')",
        start,
        end,
        escape_codepoint(start),
        escape_codepoint(end)
    );
    let _ = writeln!(
        out,
        "// Each character: {} bytes ({} rows x {} bytes per row)",
        spec.bytes_per_char(),
        spec.cell_height(),
        spec.bytes_per_row()
    );
    let _ = writeln!(
        out,
        "// Each row: {} byte(s) for {} pixels, MSB = leftmost pixel",
        spec.bytes_per_row(),
        spec.cell_width()
    );
    let _ = writeln!(
        out,
        "// Indexing: glyph = {}_data[codepoint - 0x{:02X}] for 0x{:02X} <= codepoint <= 0x{:02X}",
        name, start, start, end
    );
    out.push_str("//\n");
    let _ = writeln!(out, "// Generated by {}", GENERATOR);
    out.push('\n');

    let _ = writeln!(
        out,
        "static const uint8_t {}_data[{}][{}] = {{",
        name,
        table.glyphs().len(),
        spec.bytes_per_char()
    );
    for glyph in table.glyphs() {
        let _ = writeln!(
            out,
            "    // 0x{:02X} '{}'",
            glyph.codepoint(),
            escape_codepoint(glyph.codepoint())
        );
        out.push_str("    {");
        for (i, byte) in glyph.packed_bytes().iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if i % BYTES_PER_LINE == 0 {
                out.push_str("\n     ");
            } else {
                out.push(' ');
            }
            let _ = write!(out, "0x{:02X}", byte);
        }
        out.push_str("\n    },\n");
    }
    out.push_str("};\n");
    out
}

/// Writes `table` as a C header into `output`.
pub fn write(table: &FontTable, output: &mut dyn io::Write) -> io::Result<()> {
    output.write_all(serialize(table).as_bytes())?;
    output.flush()
}
