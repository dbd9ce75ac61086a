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

//! Glyph bitmaps and their row-major, MSB-first byte packing.
//!
//! A row of a glyph is represented as an integer of `cell_width` significant bits where bit
//! `cell_width - 1 - x` holds the pixel at column `x`.  When packed, each row occupies
//! `bytes_per_row(cell_width)` bytes, most significant byte first, with the pixels aligned to
//! the most significant bit of the first byte and any unused low bits of the last byte set to 0.

use crate::spec::bytes_per_row;

/// Returns a mask covering the `cell_width` significant bits of a row value.
fn row_mask(cell_width: usize) -> u64 {
    debug_assert!(cell_width <= 64);
    if cell_width >= 64 {
        u64::MAX
    } else {
        (1u64 << cell_width) - 1
    }
}

/// Number of unused low bits in the last byte of a packed row.
fn padding_bits(cell_width: usize) -> usize {
    bytes_per_row(cell_width) * 8 - cell_width
}

/// Appends the packed representation of `row` to `out`.
///
/// Bits of `row` beyond `cell_width` are discarded.
pub fn pack_row(row: u64, cell_width: usize, out: &mut Vec<u8>) {
    let nbytes = bytes_per_row(cell_width);
    let aligned = (row & row_mask(cell_width)) << padding_bits(cell_width);
    for i in 0..nbytes {
        let shift = (nbytes - 1 - i) * 8;
        out.push(((aligned >> shift) & 0xff) as u8);
    }
}

/// Packs all `rows` of a glyph, top to bottom.
pub fn pack_rows(rows: &[u64], cell_width: usize) -> Vec<u8> {
    let mut packed = Vec::with_capacity(rows.len() * bytes_per_row(cell_width));
    for row in rows {
        pack_row(*row, cell_width, &mut packed);
    }
    packed
}

/// Reassembles the value of a row from its packed `bytes`.
///
/// `bytes` should hold `bytes_per_row(cell_width)` entries.  Missing trailing bytes are treated as
/// zero and extra bytes are ignored.
pub fn unpack_row(bytes: &[u8], cell_width: usize) -> u64 {
    let nbytes = bytes_per_row(cell_width);
    let mut aligned = 0u64;
    for i in 0..nbytes {
        let byte = bytes.get(i).copied().unwrap_or(0);
        aligned |= u64::from(byte) << ((nbytes - 1 - i) * 8);
    }
    aligned >> padding_bits(cell_width)
}

/// Reassembles the `cell_height` rows of a glyph from its `packed` bytes.
///
/// Rows not fully covered by `packed` have their missing pixels set to background.
pub fn unpack_rows(packed: &[u8], cell_width: usize, cell_height: usize) -> Vec<u64> {
    let nbytes = bytes_per_row(cell_width);
    (0..cell_height)
        .map(|y| {
            let start = std::cmp::min(y * nbytes, packed.len());
            let end = std::cmp::min(start + nbytes, packed.len());
            unpack_row(&packed[start..end], cell_width)
        })
        .collect()
}

/// Returns true if the pixel at column `x` is set in `row`.
pub fn is_set(row: u64, cell_width: usize, x: usize) -> bool {
    debug_assert!(x < cell_width);
    row & (1u64 << (cell_width - 1 - x)) != 0
}

/// A rasterized character in packed form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Glyph {
    codepoint: u32,
    packed: Vec<u8>,
}

impl Glyph {
    /// Creates a glyph for `codepoint` by packing its `rows` of `cell_width` pixels.
    pub fn from_rows(codepoint: u32, rows: &[u64], cell_width: usize) -> Self {
        Self { codepoint, packed: pack_rows(rows, cell_width) }
    }

    /// Creates a glyph for `codepoint` from already-packed bytes.
    ///
    /// The length of `packed` is not checked here: tables read from disk keep whatever they
    /// contain so that validation can report the problem.
    pub fn from_packed(codepoint: u32, packed: Vec<u8>) -> Self {
        Self { codepoint, packed }
    }

    /// Creates an all-background glyph of `bytes_per_char` bytes.
    pub fn blank(codepoint: u32, bytes_per_char: usize) -> Self {
        Self { codepoint, packed: vec![0; bytes_per_char] }
    }

    /// The codepoint this glyph represents.
    pub fn codepoint(&self) -> u32 {
        self.codepoint
    }

    /// The packed bitmap of this glyph.
    pub fn packed_bytes(&self) -> &[u8] {
        &self.packed
    }

    /// Decodes the bitmap of this glyph into `cell_height` row values.
    pub fn rows(&self, cell_width: usize, cell_height: usize) -> Vec<u64> {
        unpack_rows(&self.packed, cell_width, cell_height)
    }

    /// Returns a copy of this bitmap tagged as `codepoint`.
    pub fn retagged(&self, codepoint: u32) -> Self {
        Self { codepoint, packed: self.packed.clone() }
    }
}
