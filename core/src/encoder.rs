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

//! Conversion of rasterized glyphs into a packed font table.
//!
//! Turning outlines into pixel coverage is delegated to a `Rasterizer`.  This module decides
//! where glyphs go within their cells, thresholds the coverage into one bit per pixel, packs the
//! result and applies the failure policy: glyphs that cannot be rasterized are replaced by a
//! fallback so that the table stays dense, and the encode only fails if nothing at all could be
//! rendered.

use crate::glyph::Glyph;
use crate::spec::{ConfigError, FontSpec, MAX_CODEPOINT};
use crate::table::FontTable;
use log::{debug, info, warn};

/// Coverage samples strictly above this value become foreground pixels.
pub const THRESHOLD: u8 = 128;

/// Default position of the baseline, as a percentage of the cell height from the top.
pub const DEFAULT_BASELINE_PERCENT: u8 = 80;

/// A `width`x`height` grid of coverage samples, where 0 is background and 255 is fully inked.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoverageGrid {
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl CoverageGrid {
    /// Creates an empty (all background) grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, samples: vec![0; width * height] }
    }

    /// Width of the grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Gets the sample at `x`,`y`.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.samples[y * self.width + x]
    }

    /// Sets the sample at `x`,`y` to `value`.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        debug_assert!(x < self.width && y < self.height);
        self.samples[y * self.width + x] = value;
    }

    /// Copies a `width`x`height` row-major bitmap of `samples` into the grid with its top-left
    /// corner at `left`,`top`.  Anything falling outside of the grid is clipped.
    pub fn blit(&mut self, left: i32, top: i32, width: usize, height: usize, samples: &[u8]) {
        debug_assert_eq!(width * height, samples.len());
        for (sy, line) in samples.chunks(width.max(1)).take(height).enumerate() {
            let y = i64::from(top) + sy as i64;
            if y < 0 || y >= self.height as i64 {
                continue;
            }
            for (sx, value) in line.iter().enumerate() {
                let x = i64::from(left) + sx as i64;
                if x < 0 || x >= self.width as i64 {
                    continue;
                }
                self.set(x as usize, y as usize, *value);
            }
        }
    }

    /// Thresholds every sample and returns one row value per line, leftmost pixel in the most
    /// significant of the `width` bits.
    pub fn threshold_rows(&self) -> Vec<u64> {
        debug_assert!(self.width <= 64);
        (0..self.height)
            .map(|y| {
                let mut row = 0u64;
                for x in 0..self.width {
                    if self.get(x, y) > THRESHOLD {
                        row |= 1u64 << (self.width - 1 - x);
                    }
                }
                row
            })
            .collect()
    }
}

/// How to choose the baseline row of a glyph within its cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VerticalPlacement {
    /// Baseline at the given percentage of the cell height, counted from the top.
    CellRatio(u8),

    /// Baseline at the font's ascent, so that the tallest glyphs touch the top of the cell.
    Ascent,
}

/// How to choose the horizontal origin of a glyph within its cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HorizontalPlacement {
    /// Centers the glyph's advance width.
    Advance,

    /// Centers the glyph's inked bounding box.
    Ink,
}

/// Where a rasterizer must draw a glyph within its cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Placement {
    /// Rule to compute the baseline.
    pub vertical: VerticalPlacement,

    /// Rule to compute the horizontal origin.
    pub horizontal: HorizontalPlacement,

    /// Rows to add to the computed baseline.  Positive values move glyphs down.
    pub baseline_offset: i32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            vertical: VerticalPlacement::CellRatio(DEFAULT_BASELINE_PERCENT),
            horizontal: HorizontalPlacement::Advance,
            baseline_offset: 0,
        }
    }
}

impl Placement {
    /// Computes the row of the baseline, counted from the top of a `cell_height` cell, for a font
    /// whose ascent at the requested size is `ascent` pixels.
    pub fn baseline_row(&self, cell_height: usize, ascent: f32) -> i32 {
        let base = match self.vertical {
            VerticalPlacement::CellRatio(percent) => {
                (cell_height * usize::from(percent) / 100) as i32
            }
            VerticalPlacement::Ascent => ascent.ceil() as i32,
        };
        base + self.baseline_offset
    }

    /// Computes the column where the left edge of the inked bitmap lands within a `cell_width`
    /// cell.
    ///
    /// `advance` is the advance width of the glyph, `xmin` the offset of its inked bitmap from the
    /// pen position, and `ink_width` the width of that bitmap.
    pub fn left_column(&self, cell_width: usize, advance: f32, xmin: i32, ink_width: usize) -> i32 {
        match self.horizontal {
            HorizontalPlacement::Advance => {
                ((cell_width as f32 - advance) / 2.0).floor() as i32 + xmin
            }
            HorizontalPlacement::Ink => (cell_width as i32 - ink_width as i32).div_euclid(2),
        }
    }
}

/// Parameters to rasterize a single character.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterRequest {
    /// The character to draw.
    pub ch: char,

    /// Width of the grid to return.
    pub cell_width: usize,

    /// Height of the grid to return.
    pub cell_height: usize,

    /// Size of the font, in pixels per em.
    pub point_size: u32,

    /// Where to draw the glyph within the grid.
    pub placement: Placement,
}

/// Reasons for which a single codepoint cannot be rasterized.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RasterError {
    /// The codepoint is a surrogate and does not name a character.
    #[error("0x{0:02X} is not a Unicode scalar value")]
    NotAScalar(u32),

    /// The glyph source has no glyph for the codepoint.
    #[error("Glyph 0x{0:02X} is missing from the source font")]
    Missing(u32),

    /// The rasterizer returned a grid that does not match the cell.
    #[error("Rasterizer returned a {actual_width}x{actual_height} grid for a {width}x{height} cell")]
    BadGrid {
        /// Requested width.
        width: usize,

        /// Requested height.
        height: usize,

        /// Width of the returned grid.
        actual_width: usize,

        /// Height of the returned grid.
        actual_height: usize,
    },
}

/// Glyph source that turns characters into coverage grids.
pub trait Rasterizer {
    /// Draws the character described by `request` into a new grid of the requested cell size.
    fn rasterize(&self, request: &RasterRequest) -> Result<CoverageGrid, RasterError>;
}

/// What to store in place of a glyph that failed to rasterize.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Fallback {
    /// An all-background glyph.
    #[default]
    Blank,

    /// The rendering of another codepoint, which may be outside of the table's range.
    Copy(u32),
}

/// Tunables of the encoding process.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodeOptions {
    /// Rasterization size in pixels per em.  Defaults to the cell height.
    pub point_size: Option<u32>,

    /// Where glyphs go within their cells.
    pub placement: Placement,

    /// Replacement for glyphs that fail to rasterize.
    pub fallback: Fallback,

    /// Identifier of the source font, recorded in the table.
    pub source: Option<String>,
}

/// Fatal encoding errors.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// The encoding options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Not a single glyph of the range could be rasterized.
    #[error("All {0} glyphs failed to rasterize")]
    AllGlyphsFailed(usize),

    /// Some glyphs failed and the fallback for them could not be rasterized either.
    #[error("Cannot rasterize fallback glyph 0x{codepoint:02X}")]
    Fallback {
        /// Codepoint of the fallback glyph.
        codepoint: u32,

        /// Why the fallback could not be rasterized.
        #[source]
        source: RasterError,
    },
}

/// A codepoint that could not be rasterized and was replaced by the fallback.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlyphFailure {
    /// The codepoint that failed.
    pub codepoint: u32,

    /// Why it failed.
    pub error: RasterError,
}

/// Result of a successful encode.
#[derive(Debug)]
pub struct Encoding {
    /// The dense table of glyphs.
    pub table: FontTable,

    /// Codepoints that were replaced by the fallback, in table order.
    pub failures: Vec<GlyphFailure>,
}

/// Rasterizes and packs a single `codepoint`.
fn render(
    spec: &FontSpec,
    rasterizer: &dyn Rasterizer,
    codepoint: u32,
    point_size: u32,
    placement: Placement,
) -> Result<Glyph, RasterError> {
    let ch = char::from_u32(codepoint).ok_or(RasterError::NotAScalar(codepoint))?;
    let request = RasterRequest {
        ch,
        cell_width: spec.cell_width(),
        cell_height: spec.cell_height(),
        point_size,
        placement,
    };
    let grid = rasterizer.rasterize(&request)?;
    if grid.width() != spec.cell_width() || grid.height() != spec.cell_height() {
        return Err(RasterError::BadGrid {
            width: spec.cell_width(),
            height: spec.cell_height(),
            actual_width: grid.width(),
            actual_height: grid.height(),
        });
    }
    Ok(Glyph::from_rows(codepoint, &grid.threshold_rows(), spec.cell_width()))
}

/// Rasterizes every codepoint described by `spec` with `rasterizer` and packs the results into a
/// dense table.
pub fn encode(
    spec: &FontSpec,
    rasterizer: &dyn Rasterizer,
    options: &EncodeOptions,
) -> Result<Encoding, EncodeError> {
    let point_size = options.point_size.unwrap_or(spec.cell_height() as u32);
    if point_size == 0 {
        return Err(ConfigError::InvalidPointSize.into());
    }
    if let Fallback::Copy(codepoint) = options.fallback {
        if codepoint > MAX_CODEPOINT {
            return Err(ConfigError::CodepointOutOfRange(codepoint).into());
        }
    }

    let total = spec.glyph_count();
    info!(
        "Rasterizing {} glyphs into {}x{} cells at {} pixels per em",
        total,
        spec.cell_width(),
        spec.cell_height(),
        point_size
    );

    let mut rendered = Vec::with_capacity(total);
    let mut failures = vec![];
    for (i, codepoint) in spec.codepoints().enumerate() {
        match render(spec, rasterizer, codepoint, point_size, options.placement) {
            Ok(glyph) => rendered.push(Some(glyph)),
            Err(e) => {
                warn!("Cannot rasterize 0x{:02X}: {}", codepoint, e);
                failures.push(GlyphFailure { codepoint, error: e });
                rendered.push(None);
            }
        }
        if codepoint % 16 == 0 {
            debug!("Processed {}/{} characters", i + 1, total);
        }
    }

    if failures.len() == total {
        return Err(EncodeError::AllGlyphsFailed(total));
    }

    let fallback = match options.fallback {
        Fallback::Copy(codepoint) if !failures.is_empty() => {
            render(spec, rasterizer, codepoint, point_size, options.placement)
                .map_err(|source| EncodeError::Fallback { codepoint, source })?
        }
        _ => Glyph::blank(0, spec.bytes_per_char()),
    };

    let glyphs = rendered
        .into_iter()
        .zip(spec.codepoints())
        .map(|(glyph, codepoint)| glyph.unwrap_or_else(|| fallback.retagged(codepoint)))
        .collect();
    info!("Encoded {} glyphs ({} replaced by fallback)", total, failures.len());

    Ok(Encoding {
        table: FontTable::new(spec.clone(), options.source.clone(), glyphs),
        failures,
    })
}
