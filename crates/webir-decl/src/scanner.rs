//! Tokenizer for TypeScript declaration files.
//!
//! Only what interface extraction needs is distinguished: identifiers,
//! string/number/template literals and punctuation. `=>` and `...` are
//! single tokens; every other punctuation character is its own token, so
//! `>>` closes two generic argument lists.
//!
//! Whitespace and comments are skipped. Each token records whether a line
//! break preceded it and carries the closest preceding `/** ... */` comment.

use crate::error::DeclError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    String,
    Number,
    Template,
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
    pub newline_before: bool,
    /// Raw text of the JSDoc comment directly preceding this token.
    pub doc: Option<&'a str>,
}

impl Token<'_> {
    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == text
    }

    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text == text
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, DeclError> {
    Scanner::new(source).run()
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    newline_before: bool,
    pending_doc: Option<&'a str>,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_part(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        let pos = if source.starts_with('\u{feff}') { 3 } else { 0 };
        Scanner {
            source,
            bytes: source.as_bytes(),
            pos,
            newline_before: false,
            pending_doc: None,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn run(mut self) -> Result<Vec<Token<'a>>, DeclError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let Some(b) = self.peek_at(0) else {
                break;
            };
            let start = self.pos;
            let kind = match b {
                b'"' | b'\'' => {
                    self.scan_string(b)?;
                    TokenKind::String
                }
                b'`' => {
                    self.scan_template()?;
                    TokenKind::Template
                }
                b'0'..=b'9' => {
                    self.scan_while(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_');
                    TokenKind::Number
                }
                _ if is_ident_start(b) => {
                    self.scan_while(is_ident_part);
                    TokenKind::Identifier
                }
                b'=' if self.peek_at(1) == Some(b'>') => {
                    self.pos += 2;
                    TokenKind::Punct
                }
                b'.' if self.peek_at(1) == Some(b'.') && self.peek_at(2) == Some(b'.') => {
                    self.pos += 3;
                    TokenKind::Punct
                }
                _ => {
                    self.pos += 1;
                    TokenKind::Punct
                }
            };
            tokens.push(Token {
                kind,
                text: &self.source[start..self.pos],
                start,
                end: self.pos,
                newline_before: std::mem::take(&mut self.newline_before),
                doc: self.pending_doc.take(),
            });
        }
        Ok(tokens)
    }

    fn scan_while(&mut self, pred: impl Fn(u8) -> bool) {
        while let Some(b) = self.peek_at(0) {
            if !pred(b) {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_trivia(&mut self) -> Result<(), DeclError> {
        while let Some(b) = self.peek_at(0) {
            match b {
                b'\n' => {
                    self.newline_before = true;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                b'/' if self.peek_at(1) == Some(b'/') => {
                    self.scan_while(|b| b != b'\n');
                }
                b'/' if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    let Some(close) = self.source[start + 2..].find("*/") else {
                        return Err(DeclError::Unterminated {
                            what: "block comment",
                            offset: start,
                        });
                    };
                    let end = start + 2 + close + 2;
                    let text = &self.source[start..end];
                    if text.contains('\n') {
                        self.newline_before = true;
                    }
                    if text.starts_with("/**") && text != "/**/" {
                        self.pending_doc = Some(text);
                    }
                    self.pos = end;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_string(&mut self, quote: u8) -> Result<(), DeclError> {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek_at(0) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => break,
                _ if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(DeclError::Unterminated {
            what: "string literal",
            offset: start,
        })
    }

    fn scan_template(&mut self) -> Result<(), DeclError> {
        let start = self.pos;
        self.pos += 1;
        while let Some(b) = self.peek_at(0) {
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(DeclError::Unterminated {
            what: "template literal",
            offset: start,
        })
    }
}
