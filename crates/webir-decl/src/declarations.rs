//! Interface declaration parser.
//!
//! Walks the token stream looking for `interface` declarations at any
//! nesting depth (top level, `declare global`, `declare namespace`) and
//! skips everything else. Inside an interface body only method and property
//! signatures are kept; index, call and construct signatures, accessors and
//! computed names are skipped.

use tracing::trace;

use crate::error::DeclError;
use crate::scanner::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    /// Direct parents from the `extends` clause, in declared order.
    pub extends: Vec<String>,
    pub members: Vec<RawMember>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMember {
    Method(RawMethod),
    Property(RawProperty),
}

impl RawMember {
    pub fn name(&self) -> &str {
        match self {
            RawMember::Method(m) => &m.name,
            RawMember::Property(p) => &p.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    pub name: String,
    pub params: Vec<RawParam>,
    pub return_type: String,
    pub this_type: Option<String>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParam {
    pub name: String,
    pub type_text: String,
    pub optional: bool,
    pub rest: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    pub name: String,
    pub type_text: String,
    pub optional: bool,
    pub readonly: bool,
    pub doc: Option<String>,
}

const MODIFIERS: &[&str] = &[
    "readonly",
    "declare",
    "public",
    "private",
    "protected",
    "static",
    "abstract",
];

/// Tokens after which a type continues on the next line.
const CONTINUES_AFTER: &[&str] = &[
    "|", "&", "=>", ":", ",", ".", "?", "keyof", "typeof", "extends", "infer", "readonly",
    "unique", "new", "is", "asserts",
];

/// Tokens that continue the previous line's type when they start a line.
const CONTINUES_BEFORE: &[&str] = &["|", "&", "=>", ".", "?", ":", "extends", "is"];

/// Parse every interface declaration in `source`, in source order.
///
/// Repeated declarations of one interface are returned separately; merging
/// them is the provider's job.
pub fn parse_declarations<'a>(
    source: &'a str,
    tokens: &[Token<'a>],
) -> Result<Vec<InterfaceDecl>, DeclError> {
    DeclParser {
        source,
        tokens,
        pos: 0,
    }
    .parse_all()
}

struct DeclParser<'s, 'a> {
    source: &'a str,
    tokens: &'s [Token<'a>],
    pos: usize,
}

enum TypeEnd {
    /// Member types end at `;`, `,`, `}` or a line break.
    Member,
    /// Parameter types end at `,`, `)` or `=`.
    Parameter,
}

impl<'s, 'a> DeclParser<'s, 'a> {
    fn parse_all(mut self) -> Result<Vec<InterfaceDecl>, DeclError> {
        let mut interfaces = Vec::new();
        while self.pos < self.tokens.len() {
            if self.at_interface_keyword() {
                interfaces.push(self.parse_interface()?);
            } else {
                self.pos += 1;
            }
        }
        Ok(interfaces)
    }

    fn peek(&self) -> Option<&'s Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&'s Token<'a>> {
        self.tokens.get(self.pos + n)
    }

    fn at_punct(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(text))
    }

    fn at_ident(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(text))
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.at_punct(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_interface_keyword(&self) -> bool {
        if !self.at_ident("interface") {
            return false;
        }
        if self.pos > 0 && self.tokens[self.pos - 1].is_punct(".") {
            return false;
        }
        let name_follows = self
            .peek_nth(1)
            .is_some_and(|t| t.kind == TokenKind::Identifier);
        let body_follows = self.peek_nth(2).is_some_and(|t| {
            t.is_punct("{") || t.is_punct("<") || t.is_ident("extends")
        });
        name_follows && body_follows
    }

    fn unexpected(&self, expected: &'static str) -> DeclError {
        match self.peek() {
            Some(token) => DeclError::Unexpected {
                expected,
                found: token.text.to_string(),
                offset: token.start,
            },
            None => DeclError::Unexpected {
                expected,
                found: "end of input".to_string(),
                offset: self.source.len(),
            },
        }
    }

    fn parse_interface(&mut self) -> Result<InterfaceDecl, DeclError> {
        // `interface`
        self.pos += 1;
        let name = self.peek().ok_or_else(|| self.unexpected("interface name"))?.text;
        self.pos += 1;
        if self.at_punct("<") {
            self.skip_balanced("<", ">", name)?;
        }

        let mut extends = Vec::new();
        if self.at_ident("extends") {
            self.pos += 1;
            loop {
                extends.push(self.parse_heritage_name(name)?);
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        if !self.eat_punct("{") {
            return Err(self.unexpected("`{` to open interface body"));
        }

        let mut members = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(DeclError::UnexpectedEof {
                        interface: name.to_string(),
                    });
                }
                Some(t) if t.is_punct("}") => {
                    self.pos += 1;
                    break;
                }
                Some(t) if t.is_punct(";") || t.is_punct(",") => self.pos += 1,
                Some(_) => {
                    if let Some(member) = self.parse_member(name)? {
                        members.push(member);
                    }
                }
            }
        }

        Ok(InterfaceDecl {
            name: name.to_string(),
            extends,
            members,
        })
    }

    /// `A`, `ns.A` or `A<T>`; type arguments are dropped.
    fn parse_heritage_name(&mut self, interface: &str) -> Result<String, DeclError> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(t) if t.kind == TokenKind::Identifier => {
                    name.push_str(t.text);
                    self.pos += 1;
                }
                _ => return Err(self.unexpected("parent interface name")),
            }
            if self.at_punct(".") {
                name.push('.');
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.at_punct("<") {
            self.skip_balanced("<", ">", interface)?;
        }
        Ok(name)
    }

    fn parse_member(&mut self, interface: &str) -> Result<Option<RawMember>, DeclError> {
        let doc = self.peek().and_then(|t| t.doc).and_then(clean_doc);

        let mut readonly = false;
        while let Some(t) = self.peek() {
            let is_modifier = t.kind == TokenKind::Identifier && MODIFIERS.contains(&t.text);
            if is_modifier && self.peek_nth(1).is_some_and(is_name_like) {
                readonly |= t.text == "readonly";
                self.pos += 1;
            } else {
                break;
            }
        }

        let Some(first) = self.peek() else {
            return Err(DeclError::UnexpectedEof {
                interface: interface.to_string(),
            });
        };

        let is_accessor = (first.is_ident("get") || first.is_ident("set"))
            && self.peek_nth(1).is_some_and(is_name_like);
        let is_construct = first.is_ident("new")
            && self
                .peek_nth(1)
                .is_some_and(|t| t.is_punct("(") || t.is_punct("<"));
        let is_unnamed = first.is_punct("[") || first.is_punct("(") || first.is_punct("<");
        if is_accessor || is_construct || is_unnamed || !is_name_like(first) {
            trace!(interface, at = first.start, token = first.text, "skipping member");
            self.skip_member(interface)?;
            return Ok(None);
        }

        let name = member_name(first);
        self.pos += 1;
        let optional = self.eat_punct("?");

        if self.at_punct("(") || self.at_punct("<") {
            if self.at_punct("<") {
                self.skip_balanced("<", ">", interface)?;
            }
            let (params, this_type) = self.parse_params(interface)?;
            let return_type = if self.eat_punct(":") {
                self.scan_type(TypeEnd::Member, interface)?
                    .unwrap_or_else(|| "void".to_string())
            } else {
                "void".to_string()
            };
            self.finish_member();
            return Ok(Some(RawMember::Method(RawMethod {
                name,
                params,
                return_type,
                this_type,
                doc,
            })));
        }

        let type_text = if self.eat_punct(":") {
            self.scan_type(TypeEnd::Member, interface)?
        } else {
            None
        };
        self.finish_member();
        Ok(Some(RawMember::Property(RawProperty {
            name,
            type_text: type_text.unwrap_or_else(|| "any".to_string()),
            optional,
            readonly,
            doc,
        })))
    }

    fn finish_member(&mut self) {
        if self.at_punct(";") || self.at_punct(",") {
            self.pos += 1;
        }
    }

    fn parse_params(
        &mut self,
        interface: &str,
    ) -> Result<(Vec<RawParam>, Option<String>), DeclError> {
        // `(`
        self.pos += 1;
        let mut params = Vec::new();
        let mut this_type = None;
        loop {
            if self.eat_punct(")") {
                break;
            }
            if self.peek().is_none() {
                return Err(DeclError::UnexpectedEof {
                    interface: interface.to_string(),
                });
            }

            let rest = self.eat_punct("...");
            while self
                .peek()
                .is_some_and(|t| t.kind == TokenKind::Identifier && MODIFIERS.contains(&t.text))
                && self
                    .peek_nth(1)
                    .is_some_and(|t| t.kind == TokenKind::Identifier)
            {
                self.pos += 1;
            }

            let name = match self.peek() {
                Some(t) if t.kind == TokenKind::Identifier => {
                    self.pos += 1;
                    t.text.to_string()
                }
                Some(t) if t.is_punct("{") => {
                    self.skip_balanced("{", "}", interface)?;
                    format!("param{}", params.len())
                }
                Some(t) if t.is_punct("[") => {
                    self.skip_balanced("[", "]", interface)?;
                    format!("param{}", params.len())
                }
                _ => return Err(self.unexpected("parameter name")),
            };
            let optional = self.eat_punct("?");
            let type_text = if self.eat_punct(":") {
                self.scan_type(TypeEnd::Parameter, interface)?
            } else {
                None
            };
            if self.eat_punct("=") {
                // Default values are not part of the signature.
                self.scan_type(TypeEnd::Parameter, interface)?;
            }
            let type_text = type_text.unwrap_or_else(|| "any".to_string());

            if name == "this" && params.is_empty() && this_type.is_none() && !rest {
                this_type = Some(type_text);
            } else {
                params.push(RawParam {
                    name,
                    type_text,
                    optional,
                    rest,
                });
            }

            if !self.eat_punct(",") && !self.at_punct(")") {
                return Err(self.unexpected("`,` or `)` in parameter list"));
            }
        }
        Ok((params, this_type))
    }

    /// Consume a type and return its whitespace-normalized source text.
    fn scan_type(&mut self, end: TypeEnd, interface: &str) -> Result<Option<String>, DeclError> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(t) = self.peek() {
            if depth == 0 {
                let stops = match end {
                    TypeEnd::Member => {
                        t.is_punct(";")
                            || t.is_punct(",")
                            || t.is_punct("}")
                            || (self.pos > start && self.breaks_line(t))
                    }
                    TypeEnd::Parameter => t.is_punct(",") || t.is_punct(")") || t.is_punct("="),
                };
                if stops {
                    break;
                }
            }
            if t.kind == TokenKind::Punct {
                match t.text {
                    "(" | "[" | "{" | "<" => depth += 1,
                    ")" | "]" | "}" | ">" => {
                        if depth == 0 {
                            return Err(self.unexpected("balanced type"));
                        }
                        depth -= 1;
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }
        if depth != 0 {
            return Err(DeclError::UnexpectedEof {
                interface: interface.to_string(),
            });
        }
        if self.pos == start {
            return Ok(None);
        }
        let text = &self.source[self.tokens[start].start..self.tokens[self.pos - 1].end];
        Ok(Some(collapse_whitespace(text)))
    }

    fn breaks_line(&self, token: &Token<'_>) -> bool {
        if !token.newline_before {
            return false;
        }
        let previous = &self.tokens[self.pos - 1];
        let continues = CONTINUES_AFTER.contains(&previous.text)
            || CONTINUES_BEFORE.contains(&token.text);
        !continues
    }

    fn skip_member(&mut self, interface: &str) -> Result<(), DeclError> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(t) = self.peek() {
            if depth == 0 {
                if t.is_punct(";") || t.is_punct(",") {
                    self.pos += 1;
                    return Ok(());
                }
                if t.is_punct("}") || (self.pos > start && self.breaks_line(t)) {
                    return Ok(());
                }
            }
            if t.kind == TokenKind::Punct {
                match t.text {
                    "(" | "[" | "{" | "<" => depth += 1,
                    ")" | "]" | "}" | ">" => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
            self.pos += 1;
        }
        Err(DeclError::UnexpectedEof {
            interface: interface.to_string(),
        })
    }

    fn skip_balanced(&mut self, open: &str, close: &str, interface: &str) -> Result<(), DeclError> {
        let mut depth = 0usize;
        while let Some(t) = self.peek() {
            self.pos += 1;
            if t.is_punct(open) {
                depth += 1;
            } else if t.is_punct(close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(DeclError::UnexpectedEof {
            interface: interface.to_string(),
        })
    }
}

fn is_name_like(token: &Token<'_>) -> bool {
    matches!(
        token.kind,
        TokenKind::Identifier | TokenKind::String | TokenKind::Number
    )
}

fn member_name(token: &Token<'_>) -> String {
    match token.kind {
        TokenKind::String => token.text[1..token.text.len() - 1].to_string(),
        _ => token.text.to_string(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Description part of a JSDoc comment: markers stripped, tags dropped.
pub(crate) fn clean_doc(raw: &str) -> Option<String> {
    let body = raw
        .strip_prefix("/**")
        .and_then(|s| s.strip_suffix("*/"))
        .unwrap_or(raw);
    let mut lines = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').map(str::trim_start).unwrap_or(line);
        if line.starts_with('@') {
            break;
        }
        lines.push(line.trim_end());
    }
    let text = lines.join("\n").trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}
