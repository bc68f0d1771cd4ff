//! Binding and declaration heads
//!
//! ```text
//! head   := Name params? (":" type)? op?
//! params := "(" Name ("," Name)* ")"
//! type   := domain | "𝒫" group? | Name
//! op     := "≜" | "≔"
//! ```
//!
//! A head never spans a line break. Scanning works on a clone of the token
//! iterator, so a failed scan consumes nothing.

use crate::document::Socket;
use crate::lexer::{Delimiter, GlyphClass, Token, TokenKind, Tokens};

pub(super) struct Head<'a> {
    pub params: Vec<Token<'a>>,
    /// Type token after `:`
    pub declared: Option<Token<'a>>,
    pub op: Option<Token<'a>>,
    /// Every token after the term name that belongs to the head
    pub consumed: Vec<Token<'a>>,
    /// Token stream positioned after the head
    pub rest: Tokens<'a>,
}

impl<'a> Head<'a> {
    /// Socket written after `:`
    pub fn socket(&self) -> Option<Socket> {
        self.declared.map(|token| declared_socket(&token))
    }
}

pub(super) fn declared_socket(token: &Token) -> Socket {
    match token.text {
        "ℕ" | "ℤ" | "ℝ" | "ℚ" => Socket::Quantity,
        "𝔹" => Socket::Truth,
        "𝕊" => Socket::Text,
        "𝒫" => Socket::Set,
        _ => Socket::Entity,
    }
}

fn is_type(token: &Token) -> bool {
    match token.kind {
        TokenKind::Name | TokenKind::Glyph(GlyphClass::Domain) => true,
        TokenKind::Glyph(GlyphClass::Set) => token.text == "𝒫",
        _ => false,
    }
}

/// Next token if it continues the current line
fn peek<'a>(cursor: &Tokens<'a>) -> Option<Token<'a>> {
    cursor
        .clone()
        .next()
        .filter(|token| !token.line_start && token.kind != TokenKind::Eof)
}

fn take<'a>(cursor: &mut Tokens<'a>, consumed: &mut Vec<Token<'a>>) -> Option<Token<'a>> {
    let token = peek(cursor)?;
    cursor.next();
    consumed.push(token);
    Some(token)
}

/// Scan the head that follows a term name at statement start
///
/// Returns `None` unless the head carries a binding operator or a type.
pub(super) fn scan<'a>(tokens: &Tokens<'a>) -> Option<Head<'a>> {
    let mut cursor = tokens.clone();
    let mut consumed = Vec::new();
    let mut params = Vec::new();

    if peek(&cursor)?.kind == TokenKind::Open(Delimiter::Paren) {
        take(&mut cursor, &mut consumed)?;
        loop {
            let param = take(&mut cursor, &mut consumed)?;
            if param.kind != TokenKind::Name {
                return None;
            }
            params.push(param);

            let next = take(&mut cursor, &mut consumed)?;
            match next.kind {
                TokenKind::Glyph(GlyphClass::Separator) if next.text == "," => continue,
                TokenKind::Close(Delimiter::Paren) => break,
                _ => return None,
            }
        }
    }

    let mut declared = None;
    if peek(&cursor).is_some_and(|t| t.is_glyph(GlyphClass::Declare)) {
        take(&mut cursor, &mut consumed)?;
        let ty = take(&mut cursor, &mut consumed)?;
        if !is_type(&ty) {
            return None;
        }
        if ty.text == "𝒫" {
            skip_group(&mut cursor, &mut consumed)?;
        }
        declared = Some(ty);
    }

    let mut op = None;
    if peek(&cursor).is_some_and(|t| t.is_binding_op()) {
        op = take(&mut cursor, &mut consumed);
    }

    if op.is_none() && declared.is_none() {
        return None;
    }

    Some(Head {
        params,
        declared,
        op,
        consumed,
        rest: cursor,
    })
}

/// Skip an optional parenthesized element type such as `𝒫(ℕ)`
fn skip_group<'a>(cursor: &mut Tokens<'a>, consumed: &mut Vec<Token<'a>>) -> Option<()> {
    if peek(cursor).map(|t| t.kind) != Some(TokenKind::Open(Delimiter::Paren)) {
        return Some(());
    }

    let mut open = Vec::new();
    loop {
        let token = take(cursor, consumed)?;
        match token.kind {
            TokenKind::Open(delimiter) => open.push(delimiter),
            TokenKind::Close(delimiter) => {
                if open.pop() != Some(delimiter) {
                    return None;
                }
                if open.is_empty() {
                    return Some(());
                }
            }
            _ => {}
        }
    }
}
