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

//! Densely-indexed tables of glyphs.

use crate::glyph::Glyph;
use crate::spec::FontSpec;

/// A font table: a descriptor plus the glyphs stored under it.
///
/// Tables produced by the encoder always satisfy the density invariants.  Tables produced by the
/// parser may not, which is what `validate::validate` is for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FontTable {
    spec: FontSpec,
    source: Option<String>,
    glyphs: Vec<Glyph>,
}

impl FontTable {
    /// Creates a new table described by `spec` holding `glyphs` in order.
    ///
    /// `source` identifies the font the glyphs were rasterized from, if known.  Surrounding
    /// whitespace is dropped, and a blank source is the same as no source.
    pub fn new(spec: FontSpec, source: Option<String>, glyphs: Vec<Glyph>) -> Self {
        let source = source.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        Self { spec, source, glyphs }
    }

    /// The descriptor of the table.
    pub fn spec(&self) -> &FontSpec {
        &self.spec
    }

    /// Identifier of the font the glyphs came from, if known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The glyphs in table order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Total number of packed bytes across all glyphs.
    pub fn total_bytes(&self) -> usize {
        self.glyphs.iter().map(|g| g.packed_bytes().len()).sum()
    }

    /// Returns the packed bitmap for `codepoint`, or `None` if the codepoint falls outside of the
    /// table's range.
    ///
    /// The glyph is located by position (`codepoint - codepoint_start`), which is only meaningful
    /// for tables that passed validation.
    pub fn lookup(&self, codepoint: u32) -> Option<&[u8]> {
        let index = self.spec.index_of(codepoint)?;
        self.glyphs.get(index).map(Glyph::packed_bytes)
    }

    /// Consumes the table and returns its parts.
    pub fn into_parts(self) -> (FontSpec, Option<String>, Vec<Glyph>) {
        (self.spec, self.source, self.glyphs)
    }
}
