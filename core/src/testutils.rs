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

//! Test utilities shared by the unit tests of this crate.

use crate::encoder::{CoverageGrid, RasterError, RasterRequest, Rasterizer};
use crate::glyph::Glyph;
use crate::spec::FontSpec;
use crate::table::FontTable;
use std::cell::RefCell;
use std::collections::HashMap;

/// Picture of an 8x8 `A`.
pub(crate) const GLYPH_A_8X8: [&str; 8] = [
    "...##...", //
    "..#..#..", //
    ".#....#.", //
    ".#....#.", //
    ".######.", //
    ".#....#.", //
    ".#....#.", //
    "........", //
];

/// Packed form of `GLYPH_A_8X8`.
pub(crate) const PACKED_A_8X8: [u8; 8] = [0x18, 0x24, 0x42, 0x42, 0x7E, 0x42, 0x42, 0x00];

/// Picture of an 8x8 `B`.
pub(crate) const GLYPH_B_8X8: [&str; 8] = [
    ".#####..", //
    ".#....#.", //
    ".#....#.", //
    ".#####..", //
    ".#....#.", //
    ".#....#.", //
    ".#####..", //
    "........", //
];

/// Packed form of `GLYPH_B_8X8`.
pub(crate) const PACKED_B_8X8: [u8; 8] = [0x7C, 0x42, 0x42, 0x7C, 0x42, 0x42, 0x7C, 0x00];

/// A glyph source that draws characters from ASCII pictures.
///
/// In a picture, `#` is full coverage, `o` is coverage just above the threshold, `+` is coverage
/// exactly at the threshold and anything else is background.  Pictures are clipped to the cell.
#[derive(Default)]
pub(crate) struct PatternRasterizer {
    /// Pictures for every known character.
    patterns: HashMap<char, Vec<&'static str>>,

    /// If set, the size of the grids to return regardless of the request.
    grid_size: Option<(usize, usize)>,

    /// Requests received so far.
    requests: RefCell<Vec<RasterRequest>>,
}

impl PatternRasterizer {
    /// Registers the picture of `ch`.
    pub(crate) fn with(mut self, ch: char, picture: &[&'static str]) -> Self {
        self.patterns.insert(ch, picture.to_vec());
        self
    }

    /// Makes the rasterizer return grids of `width`x`height` instead of the requested size.
    pub(crate) fn with_grid_size(mut self, width: usize, height: usize) -> Self {
        self.grid_size = Some((width, height));
        self
    }

    /// Returns the requests received so far.
    pub(crate) fn requests(&self) -> Vec<RasterRequest> {
        self.requests.borrow().clone()
    }
}

impl Rasterizer for PatternRasterizer {
    fn rasterize(&self, request: &RasterRequest) -> Result<CoverageGrid, RasterError> {
        self.requests.borrow_mut().push(request.clone());

        let picture =
            self.patterns.get(&request.ch).ok_or(RasterError::Missing(request.ch as u32))?;
        let (width, height) = self.grid_size.unwrap_or((request.cell_width, request.cell_height));
        let mut grid = CoverageGrid::new(width, height);
        for (y, line) in picture.iter().enumerate().take(height) {
            for (x, ch) in line.chars().enumerate().take(width) {
                let value = match ch {
                    '#' => 255,
                    'o' => 129,
                    '+' => 128,
                    _ => 0,
                };
                grid.set(x, y, value);
            }
        }
        Ok(grid)
    }
}

/// Builds a table with the 8x8 `A` and `B` glyphs.
pub(crate) fn ab_table() -> FontTable {
    let spec = FontSpec::new(8, 8, 0x41, 0x42, "ab_8x8").unwrap();
    FontTable::new(
        spec,
        Some("test.ttf".to_owned()),
        vec![
            Glyph::from_packed(0x41, PACKED_A_8X8.to_vec()),
            Glyph::from_packed(0x42, PACKED_B_8X8.to_vec()),
        ],
    )
}
