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

//! Parser for font tables stored as C headers.
//!
//! The grammar accepted here is:
//!
//! ```text
//! header      := { DIRECTIVE | COMMENT } declaration
//! declaration := 'static' 'const' 'uint8_t' IDENT '[' INT ']' '[' INT ']' '=' '{' { entry } '}' ';'
//! entry       := COMMENT '{' [ INT { ',' INT } [ ',' ] ] '}' [ ',' ]
//! ```
//!
//! Comments before the declaration hold `Key: value` metadata, of which `Size` and `Characters`
//! are required and `Font` is optional.  The comment that precedes each entry is its tag and must
//! start with the entry's codepoint in hexadecimal.

use crate::glyph::Glyph;
use crate::lexer::{Lexer, Token, TokenSpan};
use crate::reader::LineCol;
use crate::spec::FontSpec;
use crate::table::FontTable;
use log::debug;
use std::convert::TryFrom;
use std::io;

/// Parser errors.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Required metadata is absent, cannot be parsed, or describes an impossible table.
    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    /// The table declaration has no entries.
    #[error("Table has no glyph entries")]
    EmptyTable,

    /// The table declaration is missing, malformed or truncated.
    #[error("{pos}: {message}")]
    Structural {
        /// Position of the offending token.
        pos: LineCol,

        /// Description of the problem.
        message: String,
    },

    /// I/O error while reading the input.
    #[error("read error")]
    Io(#[from] io::Error),
}

/// Result for parser return values.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Syntactic sugar to build a structural error.
fn structural<T, S: Into<String>>(pos: LineCol, message: S) -> Result<T> {
    Err(ParseError::Structural { pos, message: message.into() })
}

/// Describes a token for error messages.
fn describe(token: &Token) -> String {
    match token {
        Token::Eof => "end of input".to_owned(),
        Token::Bad(msg) => msg.clone(),
        Token::Directive(_) => "directive".to_owned(),
        Token::Comment(_) => "comment".to_owned(),
        Token::Integer(i) => format!("integer {}", i),
        Token::Word(w) => format!("identifier {}", w),
        Token::LeftBrace => "'{'".to_owned(),
        Token::RightBrace => "'}'".to_owned(),
        Token::LeftBracket => "'['".to_owned(),
        Token::RightBracket => "']'".to_owned(),
        Token::Equal => "'='".to_owned(),
        Token::Comma => "','".to_owned(),
        Token::Semicolon => "';'".to_owned(),
    }
}

/// Builds the error for an unexpected token in `span` when `expected` was wanted.
fn unexpected<T>(span: TokenSpan, expected: &str) -> Result<T> {
    match span.token {
        Token::Bad(msg) => structural(span.pos, msg),
        token => {
            structural(span.pos, format!("Expected {} but found {}", expected, describe(&token)))
        }
    }
}

/// Parses a `0x`-prefixed hexadecimal codepoint.
fn parse_hex(s: &str) -> Option<u32> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    u32::from_str_radix(digits, 16).ok()
}

/// Parses the value of the `Size` field, which looks like `8x16 pixels`.
fn parse_size(value: &str) -> Option<(usize, usize)> {
    let dims = value.strip_suffix("pixels").unwrap_or(value).trim();
    let (width, height) = dims.split_once('x')?;
    Some((width.parse().ok()?, height.parse().ok()?))
}

/// Parses the value of the `Characters` field, which looks like `0x20..0x7E (' '..'~')`.
fn parse_range(value: &str) -> Option<(u32, u32)> {
    let range = value.split_whitespace().next()?;
    let (start, end) = range.split_once("..")?;
    Some((parse_hex(start)?, parse_hex(end)?))
}

/// Parses the codepoint out of the tag of an entry, which looks like `0x41 'A'`.
fn parse_tag(text: &str) -> Option<u32> {
    parse_hex(text.split_whitespace().next()?)
}

/// Restores a source font name escaped by `serializer::escape_source`.
///
/// Backslashes not followed by a known escape are kept, so raw paths written by other tools
/// come back unchanged.
fn unescape_source(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let decoded = match tail.chars().next() {
            Some('\\') => Some(('\\', 1)),
            Some('n') => Some(('\n', 1)),
            Some('r') => Some(('\r', 1)),
            Some('t') => Some(('\t', 1)),
            Some('x') => tail
                .get(1..3)
                .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .map(|byte| (char::from(byte), 3)),
            _ => None,
        };
        match decoded {
            Some((ch, len)) => {
                out.push(ch);
                rest = &tail[len..];
            }
            None => {
                out.push('\\');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Metadata collected from the preamble comments.
#[derive(Default)]
struct Metadata {
    source: Option<String>,
    size: Option<(usize, usize)>,
    range: Option<(u32, u32)>,
}

impl Metadata {
    /// Processes the `text` of a preamble comment.
    fn observe(&mut self, text: &str) -> Result<()> {
        let (key, value) = match text.split_once(':') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => return Ok(()),
        };
        match key {
            "Font" if !value.is_empty() => self.source = Some(unescape_source(value)),
            "Size" => match parse_size(value) {
                Some(size) => self.size = Some(size),
                None => {
                    return Err(ParseError::MalformedMetadata(format!(
                        "Invalid Size field: {}",
                        value
                    )))
                }
            },
            "Characters" => match parse_range(value) {
                Some(range) => self.range = Some(range),
                None => {
                    return Err(ParseError::MalformedMetadata(format!(
                        "Invalid Characters field: {}",
                        value
                    )))
                }
            },
            _ => debug!("Ignoring metadata field {}", key),
        }
        Ok(())
    }
}

/// Parser state.
struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    /// Reads the next token and fails unless it is `exp`, which is described as `what`.
    fn expect(&mut self, exp: Token, what: &str) -> Result<()> {
        let span = self.lexer.read();
        if span.token == exp {
            Ok(())
        } else {
            unexpected(span, what)
        }
    }

    /// Reads the next token and fails unless it is the identifier `word`.
    fn expect_word(&mut self, word: &str) -> Result<()> {
        let span = self.lexer.read();
        match &span.token {
            Token::Word(w) if w == word => Ok(()),
            _ => unexpected(span, &format!("'{}'", word)),
        }
    }

    /// Reads a `[N]` array dimension.
    fn parse_dimension(&mut self) -> Result<u64> {
        self.expect(Token::LeftBracket, "'['")?;
        let span = self.lexer.read();
        let value = match span.token {
            Token::Integer(i) => i,
            _ => return unexpected(span, "array dimension"),
        };
        self.expect(Token::RightBracket, "']'")?;
        Ok(value)
    }

    /// Consumes the directives and comments that precede the declaration and extracts metadata
    /// from the latter.
    fn parse_preamble(&mut self) -> Result<Metadata> {
        let mut metadata = Metadata::default();
        loop {
            match self.lexer.peek().token {
                Token::Directive(_) | Token::Comment(_) => (),
                _ => break,
            }
            if let Token::Comment(text) = self.lexer.read().token {
                metadata.observe(&text)?;
            }
        }
        Ok(metadata)
    }

    /// Parses the declaration up to and including its opening brace and returns the table name.
    fn parse_declaration(&mut self) -> Result<String> {
        let span = self.lexer.read();
        match &span.token {
            Token::Word(w) if w == "static" => (),
            Token::Eof => return structural(span.pos, "Cannot find the table declaration"),
            _ => return unexpected(span, "table declaration"),
        }
        self.expect_word("const")?;
        self.expect_word("uint8_t")?;

        let span = self.lexer.read();
        let symbol = match span.token {
            Token::Word(w) => w,
            _ => return unexpected(span, "table name"),
        };

        // The declared dimensions are informational: the entries themselves are authoritative and
        // validation compares them against the metadata.
        let count = self.parse_dimension()?;
        let size = self.parse_dimension()?;
        debug!("Table {} declared as {}x{} bytes", symbol, count, size);

        self.expect(Token::Equal, "'='")?;
        self.expect(Token::LeftBrace, "'{'")?;

        match symbol.strip_suffix("_data") {
            Some(name) if !name.is_empty() => Ok(name.to_owned()),
            _ => Err(ParseError::MalformedMetadata(format!(
                "Table symbol {} does not end in _data",
                symbol
            ))),
        }
    }

    /// Parses the brace-enclosed bytes of an entry, plus its optional trailing comma.
    fn parse_bytes(&mut self) -> Result<Vec<u8>> {
        self.expect(Token::LeftBrace, "'{'")?;
        let mut bytes = vec![];
        loop {
            let span = self.lexer.read();
            match span.token {
                Token::RightBrace => break,
                Token::Integer(i) => match u8::try_from(i) {
                    Ok(byte) => bytes.push(byte),
                    Err(_) => {
                        return structural(
                            span.pos,
                            format!("Byte value 0x{:X} does not fit in 8 bits", i),
                        )
                    }
                },
                _ => return unexpected(span, "byte value or '}'"),
            }

            let span = self.lexer.read();
            match span.token {
                Token::Comma => (),
                Token::RightBrace => break,
                _ => return unexpected(span, "',' or '}'"),
            }
        }

        if self.lexer.peek().token == Token::Comma {
            self.lexer.read();
        }
        Ok(bytes)
    }

    /// Parses the entries of the table up to and including the closing `};`.
    fn parse_entries(&mut self) -> Result<Vec<Glyph>> {
        let mut glyphs = vec![];
        loop {
            let span = self.lexer.read();
            match span.token {
                Token::RightBrace => {
                    self.expect(Token::Semicolon, "';'")?;
                    break;
                }
                Token::Comment(text) => {
                    let codepoint = match parse_tag(&text) {
                        Some(codepoint) => codepoint,
                        None => {
                            return structural(span.pos, format!("Invalid codepoint tag: {}", text))
                        }
                    };
                    let bytes = self.parse_bytes()?;
                    glyphs.push(Glyph::from_packed(codepoint, bytes));
                }
                Token::LeftBrace => {
                    return structural(span.pos, "Glyph entry without a codepoint tag");
                }
                Token::Eof => {
                    return structural(span.pos, "Unexpected end of input within the table body");
                }
                _ => return unexpected(span, "codepoint tag or '}'"),
            }
        }
        Ok(glyphs)
    }

    /// Parses the whole header.
    fn parse(mut self) -> Result<FontTable> {
        let metadata = self.parse_preamble()?;
        let (width, height) = metadata
            .size
            .ok_or_else(|| ParseError::MalformedMetadata("Missing Size field".to_owned()))?;
        let (start, end) = metadata
            .range
            .ok_or_else(|| ParseError::MalformedMetadata("Missing Characters field".to_owned()))?;

        let name = self.parse_declaration()?;
        let spec = FontSpec::new(width, height, start, end, name)
            .map_err(|e| ParseError::MalformedMetadata(e.to_string()))?;

        let glyphs = self.parse_entries()?;
        if glyphs.is_empty() {
            return Err(ParseError::EmptyTable);
        }
        Ok(FontTable::new(spec, metadata.source, glyphs))
    }
}

/// Extracts a font table from the text of a C header.
pub fn parse_str(input: &str) -> Result<FontTable> {
    Parser { lexer: Lexer::from(input) }.parse()
}

/// Extracts a font table from a C header read from `input`.
pub fn parse(input: &mut dyn io::Read) -> Result<FontTable> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    parse_str(&text)
}
