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

//! Character-based reader over in-memory text with position tracking.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Representation of a position within the input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LineCol {
    /// Line number.
    pub line: usize,

    /// Column number.
    pub col: usize,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A character and the position where it was found.
#[derive(Debug)]
#[cfg_attr(test, derive(Eq, PartialEq))]
pub(crate) struct CharSpan {
    /// Character in this span.
    pub(crate) ch: char,

    /// Position where this character starts.
    pub(crate) pos: LineCol,
}

/// Iterator over the characters of a string that knows where each of them lives.
pub(crate) struct CharReader<'a> {
    /// The characters still to be returned.
    chars: Peekable<Chars<'a>>,

    /// Line and column number of the next character to be read.
    next_pos: LineCol,
}

impl<'a> CharReader<'a> {
    /// Constructs a new character reader over `input`.
    pub(crate) fn from(input: &'a str) -> Self {
        Self { chars: input.chars().peekable(), next_pos: LineCol { line: 1, col: 1 } }
    }

    /// Peeks into the next character without consuming it.
    pub(crate) fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Gets the position that the next character will carry.
    pub(crate) fn next_pos(&self) -> LineCol {
        self.next_pos
    }
}

impl<'a> Iterator for CharReader<'a> {
    type Item = CharSpan;

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.chars.next()?;
        let pos = self.next_pos;
        if ch == '\n' {
            self.next_pos.line += 1;
            self.next_pos.col = 1;
        } else {
            self.next_pos.col += 1;
        }
        Some(CharSpan { ch, pos })
    }
}
