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

//! Immutable description of a font table: cell geometry, codepoint range and symbol name.

/// Largest cell dimension, in pixels, that a table can use.
pub const MAX_CELL_SIZE: usize = 64;

/// Largest codepoint representable in Unicode.
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// First codepoint of a table when none is requested: the space character.
pub const DEFAULT_FIRST_CODEPOINT: u32 = 0x20;

/// Last codepoint of a table when none is requested: the tilde character.
pub const DEFAULT_LAST_CODEPOINT: u32 = 0x7E;

/// Errors in the description of a table.  These are detected before any work starts.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A cell dimension is zero or too large.
    #[error("Cell {dimension} must be between 1 and 64 pixels but got {value}")]
    InvalidCellSize {
        /// Name of the offending dimension (`width` or `height`).
        dimension: &'static str,

        /// The rejected value.
        value: usize,
    },

    /// A codepoint lies beyond the Unicode range.
    #[error("Codepoint 0x{0:02X} is beyond the Unicode range")]
    CodepointOutOfRange(u32),

    /// The range is reversed.
    #[error("End codepoint 0x{end:02X} must be >= start codepoint 0x{start:02X}")]
    InvalidRange {
        /// First codepoint of the range.
        start: u32,

        /// Last codepoint of the range.
        end: u32,
    },

    /// The table name cannot be used as a C symbol.
    #[error("Invalid table name '{0}': must be a C identifier")]
    InvalidName(String),

    /// The rasterization point size is zero.
    #[error("Point size must be positive")]
    InvalidPointSize,
}

/// Number of bytes needed to store one row of `cell_width` pixels.
pub fn bytes_per_row(cell_width: usize) -> usize {
    (cell_width + 7) / 8
}

/// Returns true if `name` is a valid C identifier.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(ch) if ch == '_' || ch.is_ascii_alphabetic() => (),
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}

/// Descriptor of a font table.
///
/// A `FontSpec` can only be obtained through `FontSpec::new`, which means that every instance
/// satisfies the cell size, range and name constraints.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FontSpec {
    cell_width: usize,
    cell_height: usize,
    codepoint_start: u32,
    codepoint_end: u32,
    name: String,
}

impl FontSpec {
    /// Creates a new descriptor for a table of `cell_width`x`cell_height` glyphs covering the
    /// inclusive range `codepoint_start..=codepoint_end` and emitted under the `name` symbol.
    pub fn new<S: Into<String>>(
        cell_width: usize,
        cell_height: usize,
        codepoint_start: u32,
        codepoint_end: u32,
        name: S,
    ) -> Result<Self, ConfigError> {
        if cell_width == 0 || cell_width > MAX_CELL_SIZE {
            return Err(ConfigError::InvalidCellSize { dimension: "width", value: cell_width });
        }
        if cell_height == 0 || cell_height > MAX_CELL_SIZE {
            return Err(ConfigError::InvalidCellSize { dimension: "height", value: cell_height });
        }
        if codepoint_start > MAX_CODEPOINT {
            return Err(ConfigError::CodepointOutOfRange(codepoint_start));
        }
        if codepoint_end > MAX_CODEPOINT {
            return Err(ConfigError::CodepointOutOfRange(codepoint_end));
        }
        if codepoint_end < codepoint_start {
            return Err(ConfigError::InvalidRange { start: codepoint_start, end: codepoint_end });
        }
        let name = name.into();
        if !is_identifier(&name) {
            return Err(ConfigError::InvalidName(name));
        }
        Ok(Self { cell_width, cell_height, codepoint_start, codepoint_end, name })
    }

    /// Computes the name given to a table when the caller does not choose one.
    pub fn default_name(cell_width: usize, cell_height: usize) -> String {
        format!("rm690b0_font_{}x{}", cell_width, cell_height)
    }

    /// Width of a glyph cell, in pixels.
    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Height of a glyph cell, in pixels.
    pub fn cell_height(&self) -> usize {
        self.cell_height
    }

    /// First codepoint in the table.
    pub fn codepoint_start(&self) -> u32 {
        self.codepoint_start
    }

    /// Last codepoint in the table, inclusive.
    pub fn codepoint_end(&self) -> u32 {
        self.codepoint_end
    }

    /// Name of the table.  The emitted symbol is this name followed by `_data`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of bytes used by each row of a glyph.
    pub fn bytes_per_row(&self) -> usize {
        bytes_per_row(self.cell_width)
    }

    /// Number of bytes used by each glyph.
    pub fn bytes_per_char(&self) -> usize {
        self.cell_height * self.bytes_per_row()
    }

    /// Number of glyphs in a table with this range.
    pub fn glyph_count(&self) -> usize {
        (self.codepoint_end - self.codepoint_start) as usize + 1
    }

    /// Iterates over all codepoints of the range in table order.
    pub fn codepoints(&self) -> impl Iterator<Item = u32> {
        self.codepoint_start..=self.codepoint_end
    }

    /// Returns the table position of `codepoint`, or `None` if it is out of range.
    pub fn index_of(&self, codepoint: u32) -> Option<usize> {
        if (self.codepoint_start..=self.codepoint_end).contains(&codepoint) {
            Some((codepoint - self.codepoint_start) as usize)
        } else {
            None
        }
    }
}
