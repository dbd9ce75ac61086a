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

//! Text rendering of packed glyphs for human inspection.

use crate::glyph::{is_set, unpack_rows};
use crate::serializer::escape_codepoint;
use crate::table::FontTable;

/// Number of glyphs shown per group by `render_grid`.
const GRID_GROUP: usize = 16;

/// Maximum width of a group's separator line in `render_grid`.
const GRID_RULE_MAX: usize = 60;

/// Groups narrower than this many pixels are drawn side by side by `render_grid`.
const GRID_SIDE_BY_SIDE_MAX: usize = 70;

/// Characters used to draw pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Palette {
    /// Character for foreground pixels.
    pub on: char,

    /// Character for background pixels.
    pub off: char,
}

/// Plain ASCII palette.
pub const ASCII: Palette = Palette { on: '#', off: '.' };

/// Palette using Unicode blocks, which reads better on terminals that support it.
pub const BLOCKS: Palette = Palette { on: '█', off: '·' };

/// Draws the `packed` bitmap of a `cell_width`x`cell_height` glyph, one string per row.
///
/// This undoes the packing exactly: rows are reassembled from their bytes most significant byte
/// first and pixels are read from the most significant bit down.  Bytes missing from a short
/// bitmap are drawn as background.
pub fn render_glyph(
    packed: &[u8],
    cell_width: usize,
    cell_height: usize,
    palette: &Palette,
) -> Vec<String> {
    unpack_rows(packed, cell_width, cell_height)
        .into_iter()
        .map(|row| {
            (0..cell_width)
                .map(|x| if is_set(row, cell_width, x) { palette.on } else { palette.off })
                .collect()
        })
        .collect()
}

/// Draws every glyph of `table` in groups of 16 headed by their codepoints.
///
/// Groups that fit on a terminal are drawn side by side; wider ones are drawn one glyph after the
/// other with a caption.  The returned text is newline-terminated.
pub fn render_grid(table: &FontTable, palette: &Palette) -> String {
    let width = table.spec().cell_width();
    let height = table.spec().cell_height();

    let mut out = String::new();
    for group in table.glyphs().chunks(GRID_GROUP) {
        let codepoints: Vec<String> =
            group.iter().map(|g| format!("0x{:02X}", g.codepoint())).collect();
        out.push('\n');
        out.push_str(&codepoints.join(" "));
        out.push('\n');

        let pixels = width * group.len();
        let rule = std::cmp::min(GRID_RULE_MAX, pixels + group.len() - 1);
        out.push_str(&"─".repeat(rule));
        out.push('\n');

        if pixels < GRID_SIDE_BY_SIDE_MAX {
            let pictures: Vec<Vec<String>> = group
                .iter()
                .map(|g| render_glyph(g.packed_bytes(), width, height, palette))
                .collect();
            for y in 0..height {
                for picture in &pictures {
                    out.push_str(&picture[y]);
                    out.push(' ');
                }
                out.push('\n');
            }
        } else {
            for glyph in group {
                out.push_str(&format!(
                    "\n'{}' (0x{:02X}):\n",
                    escape_codepoint(glyph.codepoint()),
                    glyph.codepoint()
                ));
                for line in render_glyph(glyph.packed_bytes(), width, height, palette) {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
    }
    out
}
