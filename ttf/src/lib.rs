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

//! Glyph source for the rowfont encoder backed by TrueType and OpenType fonts.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use fontdue::{Font, FontSettings};
use log::debug;
use rowfont_core::encoder::{CoverageGrid, RasterError, RasterRequest, Rasterizer};
use std::fs;
use std::io;
use std::path::Path;

/// Errors while loading a font.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The font file could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The font data could not be decoded.
    #[error("Invalid font data: {0}")]
    Invalid(String),
}

/// Rasterizer over an outline font decoded with `fontdue`.
pub struct FontdueRasterizer {
    font: Font,
}

impl FontdueRasterizer {
    /// Decodes the font file contents in `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| LoadError::Invalid(e.to_owned()))?;
        debug!("Loaded font {:?} with {} glyphs", font.name(), font.glyph_count());
        Ok(Self { font })
    }

    /// Reads and decodes the font file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Name of the font as recorded in its naming table, if any.
    pub fn name(&self) -> Option<&str> {
        self.font.name()
    }
}

impl Rasterizer for FontdueRasterizer {
    fn rasterize(&self, request: &RasterRequest) -> Result<CoverageGrid, RasterError> {
        // Index 0 is the .notdef glyph, which fonts return for characters they do not cover.
        if self.font.lookup_glyph_index(request.ch) == 0 {
            return Err(RasterError::Missing(u32::from(request.ch)));
        }

        let px = request.point_size as f32;
        let (metrics, bitmap) = self.font.rasterize(request.ch, px);
        let ascent = match self.font.horizontal_line_metrics(px) {
            Some(line) => line.ascent,
            None => px,
        };

        let placement = request.placement;
        let baseline = placement.baseline_row(request.cell_height, ascent);
        let left = placement.left_column(
            request.cell_width,
            metrics.advance_width,
            metrics.xmin,
            metrics.width,
        );
        // fontdue measures ymin upwards from the baseline to the bottom edge of the bitmap.
        let top = baseline - (metrics.ymin + metrics.height as i32);

        let mut grid = CoverageGrid::new(request.cell_width, request.cell_height);
        grid.blit(left, top, metrics.width, metrics.height, &bitmap);
        Ok(grid)
    }
}
