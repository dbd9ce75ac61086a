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

//! Tokenizer for the C headers that hold font tables.
//!
//! This only recognizes the subset of C that the serializer emits: preprocessor directives, line
//! and block comments, identifiers, integer literals and the punctuation of an array initializer.
//! Comments are returned as tokens because they carry the table's metadata.

use crate::reader::{CharReader, LineCol};

/// Collection of valid tokens.
///
/// `Eof` indicates that there are no more tokens.  `Bad` indicates that a token was malformed and
/// contains the reason behind the problem; the stream remains valid after it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Token {
    Eof,
    Bad(String),

    Directive(String),
    Comment(String),
    Integer(u64),
    Word(String),

    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Equal,
    Comma,
    Semicolon,
}

/// A token and the position where it starts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TokenSpan {
    /// The token.
    pub(crate) token: Token,

    /// Position of the first character of the token.
    pub(crate) pos: LineCol,
}

/// Returns true if `ch` can continue an identifier or an integer literal.
fn is_word(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

/// Iterator over the tokens of a header.
pub(crate) struct Lexer<'a> {
    /// Characters to scan.
    input: CharReader<'a>,

    /// If not none, contains the token read by `peek`, which will be consumed by the next call to
    /// `read`.
    peeked: Option<TokenSpan>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `input`.
    pub(crate) fn from(input: &'a str) -> Self {
        Self { input: CharReader::from(input), peeked: None }
    }

    /// Consumes the rest of a word or integer whose first character is `first`.
    fn consume_word_chars(&mut self, first: char) -> String {
        let mut s = String::new();
        s.push(first);
        while let Some(ch) = self.input.peek() {
            if !is_word(ch) {
                break;
            }
            s.push(ch);
            self.input.next();
        }
        s
    }

    /// Consumes the integer at the current position, whose first digit is `first`.
    ///
    /// Literals prefixed by `0x` or `0X` are hexadecimal; all others are decimal.
    fn consume_integer(&mut self, first: char) -> Token {
        let s = self.consume_word_chars(first);
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse::<u64>(),
        };
        match parsed {
            Ok(i) => Token::Integer(i),
            Err(e) => Token::Bad(format!("Bad integer {}: {}", s, e)),
        }
    }

    /// Consumes the remainder of the line, including its terminator, and returns its trimmed text.
    fn consume_rest_of_line(&mut self) -> String {
        let mut s = String::new();
        for span in self.input.by_ref() {
            if span.ch == '\n' {
                break;
            }
            s.push(span.ch);
        }
        s.trim().to_owned()
    }

    /// Skips a block comment whose opening delimiter has already been consumed.  Returns false if
    /// the input ends before the comment is closed.
    fn skip_block_comment(&mut self) -> bool {
        let mut star = false;
        for span in self.input.by_ref() {
            if star && span.ch == '/' {
                return true;
            }
            star = span.ch == '*';
        }
        false
    }

    /// Reads the next token from the input, skipping whitespace and block comments.
    fn read_raw(&mut self) -> TokenSpan {
        loop {
            let span = match self.input.next() {
                Some(span) => span,
                None => return TokenSpan { token: Token::Eof, pos: self.input.next_pos() },
            };

            let token = match span.ch {
                ch if ch.is_whitespace() => continue,

                '#' => Token::Directive(self.consume_rest_of_line()),
                '/' => match self.input.peek() {
                    Some('/') => {
                        self.input.next();
                        Token::Comment(self.consume_rest_of_line())
                    }
                    Some('*') => {
                        self.input.next();
                        if self.skip_block_comment() {
                            continue;
                        }
                        Token::Bad("Unterminated block comment".to_owned())
                    }
                    _ => Token::Bad("Unexpected character: /".to_owned()),
                },

                '{' => Token::LeftBrace,
                '}' => Token::RightBrace,
                '[' => Token::LeftBracket,
                ']' => Token::RightBracket,
                '=' => Token::Equal,
                ',' => Token::Comma,
                ';' => Token::Semicolon,

                ch if ch.is_ascii_digit() => self.consume_integer(ch),
                ch if ch == '_' || ch.is_ascii_alphabetic() => {
                    Token::Word(self.consume_word_chars(ch))
                }
                ch => Token::Bad(format!("Unexpected character: {}", ch)),
            };
            return TokenSpan { token, pos: span.pos };
        }
    }

    /// Peeks the upcoming token.
    ///
    /// It is OK to call this function several times on the same token before extracting it from
    /// the lexer.
    pub(crate) fn peek(&mut self) -> &TokenSpan {
        if self.peeked.is_none() {
            let next = self.read_raw();
            self.peeked = Some(next);
        }
        self.peeked.as_ref().unwrap()
    }

    /// Reads the next token.
    pub(crate) fn read(&mut self) -> TokenSpan {
        match self.peeked.take() {
            Some(span) => span,
            None => self.read_raw(),
        }
    }
}
