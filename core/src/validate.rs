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

//! Consistency checks for parsed font tables.

use crate::table::FontTable;

/// Individual validation steps, in the order in which `validate` runs them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Check {
    /// The number of glyphs matches the codepoint range.
    Count,

    /// Every glyph has exactly `bytes_per_char` bytes.
    Size,

    /// Glyph codepoints are contiguous starting at the first codepoint of the range.
    Sequence,
}

impl Check {
    /// All checks in execution order.
    pub const ALL: [Check; 3] = [Check::Count, Check::Size, Check::Sequence];
}

/// Violations of the table density invariants.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The table holds a different number of glyphs than its range covers.
    #[error("Character count mismatch: got {actual}, expected {expected}")]
    CountMismatch {
        /// Number of glyphs implied by the codepoint range.
        expected: usize,

        /// Number of glyphs present.
        actual: usize,
    },

    /// A glyph has the wrong number of bytes.
    #[error(
        "Character 0x{codepoint:02X} at index {index} has {actual} bytes, expected {expected}"
    )]
    SizeMismatch {
        /// Position of the glyph in the table.
        index: usize,

        /// Codepoint tag of the glyph.
        codepoint: u32,

        /// Number of bytes implied by the cell size.
        expected: usize,

        /// Number of bytes present.
        actual: usize,
    },

    /// A glyph is tagged with a codepoint other than the one its position implies.
    #[error("Codepoint sequence broken at index {index}: got 0x{actual:02X}, expected 0x{expected:02X}")]
    SequenceBreak {
        /// Position of the glyph in the table.
        index: usize,

        /// Codepoint implied by the position.
        expected: u32,

        /// Codepoint found in the tag.
        actual: u32,
    },
}

impl ValidationError {
    /// Returns the check that detected this error.
    pub fn check(&self) -> Check {
        match self {
            ValidationError::CountMismatch { .. } => Check::Count,
            ValidationError::SizeMismatch { .. } => Check::Size,
            ValidationError::SequenceBreak { .. } => Check::Sequence,
        }
    }
}

/// Runs a single validation `step` on `table`, reporting the first offending glyph if any.
pub fn check(table: &FontTable, step: Check) -> Result<(), ValidationError> {
    let spec = table.spec();
    match step {
        Check::Count => {
            let expected = spec.glyph_count();
            let actual = table.glyphs().len();
            if expected != actual {
                return Err(ValidationError::CountMismatch { expected, actual });
            }
        }

        Check::Size => {
            let expected = spec.bytes_per_char();
            for (index, glyph) in table.glyphs().iter().enumerate() {
                let actual = glyph.packed_bytes().len();
                if actual != expected {
                    return Err(ValidationError::SizeMismatch {
                        index,
                        codepoint: glyph.codepoint(),
                        expected,
                        actual,
                    });
                }
            }
        }

        Check::Sequence => {
            for (index, (glyph, expected)) in
                table.glyphs().iter().zip(spec.codepoints()).enumerate()
            {
                if glyph.codepoint() != expected {
                    return Err(ValidationError::SequenceBreak {
                        index,
                        expected,
                        actual: glyph.codepoint(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Runs all checks on `table` in order and returns the table if they all pass.
pub fn validate(table: FontTable) -> Result<FontTable, ValidationError> {
    for step in Check::ALL {
        check(&table, step)?;
    }
    Ok(table)
}
