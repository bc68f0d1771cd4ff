//! Lexical analysis of AISP source buffers
//!
//! The lexer enforces the document size limit and UTF-8 validity, then
//! segments the text with the pest grammar in `aisp.pest`. Tokens are handed
//! out through [`Tokens`], a cheap cloneable iterator, so the parser can look
//! ahead by cloning instead of buffering.

use crate::ast::Span;
use crate::error::AispError;
use crate::resource_limits::ResourceLimits;
use crate::AispResult;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

mod token;

pub use token::{Delimiter, GlyphClass, Token, TokenKind};

#[derive(Parser)]
#[grammar = "src/lexer/aisp.pest"]
struct AispGrammar;

/// Validated source buffer ready for tokenization
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    /// Check size and encoding of a raw buffer
    ///
    /// Oversized buffers fail with an overflow at the limit offset; invalid
    /// UTF-8 fails with a parse error at the first invalid byte.
    pub fn new(bytes: &'a [u8], limits: &ResourceLimits) -> AispResult<Self> {
        let limit = limits.max_document_bytes;
        if bytes.len() > limit {
            return Err(AispError::overflow_with_suggestion(
                format!("Document is {} bytes, limit is {}", bytes.len(), limit),
                limit,
                "Split the document into smaller documents",
            ));
        }

        let source = std::str::from_utf8(bytes).map_err(|e| {
            AispError::parse("Invalid UTF-8 sequence in source", e.valid_up_to())
        })?;

        Ok(Self { source })
    }

    pub fn for_source(source: &'a str, limits: &ResourceLimits) -> AispResult<Self> {
        Self::new(source.as_bytes(), limits)
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Segment the source into tokens
    ///
    /// Fails with a parse error at the first byte no token can start at.
    #[tracing::instrument(level = "trace", skip_all, fields(source_len = self.source.len()))]
    pub fn tokens(&self) -> AispResult<Tokens<'a>> {
        let mut pairs = AispGrammar::parse(Rule::stream, self.source)
            .map_err(|e| unrecognized(self.source, e))?;
        let stream = pairs
            .next()
            .ok_or_else(|| AispError::parse("Empty token stream", 0))?;

        Ok(Tokens {
            source: self.source,
            pairs: stream.into_inner(),
            last_end: 0,
            started: false,
            finished: false,
        })
    }

    /// Collect every token, ending with `Eof`
    pub fn tokenize(&self) -> AispResult<Vec<Token<'a>>> {
        Ok(self.tokens()?.collect())
    }
}

fn unrecognized(source: &str, error: pest::error::Error<Rule>) -> AispError {
    let offset = match error.location {
        InputLocation::Pos(pos) => pos,
        InputLocation::Span((start, _)) => start,
    };

    match source.get(offset..).and_then(|rest| rest.chars().next()) {
        Some(ch) => AispError::parse_with_suggestion(
            format!("Unrecognized character {:?}", ch),
            offset,
            "Use a glyph from the AISP symbol table or a term name",
        ),
        None => AispError::parse("Unexpected end of input", offset),
    }
}

/// Token iterator over a lexed source buffer
///
/// Yields exactly one `Eof` token at the end of input and then stops.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    source: &'a str,
    pairs: Pairs<'a, Rule>,
    last_end: usize,
    started: bool,
    finished: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.finished {
            return None;
        }

        let Some(pair) = self.pairs.next() else {
            self.finished = true;
            let end = self.source.len();
            return Some(Token {
                kind: TokenKind::Eof,
                text: "",
                span: Span::new(end, end),
                line_start: !self.started || self.gap_has_newline(end),
            });
        };

        let span = Span::from_pest_span(pair.as_span());
        let kind = kind_of(&pair);
        if kind == TokenKind::Eof {
            self.finished = true;
        }

        let line_start = !self.started || self.gap_has_newline(span.start);
        self.started = true;
        self.last_end = span.end;

        Some(Token {
            kind,
            text: pair.as_str(),
            span,
            line_start,
        })
    }
}

impl<'a> Tokens<'a> {
    fn gap_has_newline(&self, until: usize) -> bool {
        self.source
            .get(self.last_end..until)
            .is_some_and(|gap| gap.contains('\n'))
    }
}

fn kind_of(pair: &Pair<Rule>) -> TokenKind {
    let text = pair.as_str();
    match pair.as_rule() {
        Rule::open => TokenKind::Open(Delimiter::of(text)),
        Rule::close => TokenKind::Close(Delimiter::of(text)),
        Rule::numeral => TokenKind::Numeral,
        Rule::name => TokenKind::Name,
        Rule::define => TokenKind::Glyph(GlyphClass::Define),
        Rule::assign => TokenKind::Glyph(GlyphClass::Assign),
        Rule::logic => TokenKind::Glyph(GlyphClass::Logic),
        Rule::relation => TokenKind::Glyph(GlyphClass::Relation),
        Rule::declare => TokenKind::Glyph(GlyphClass::Declare),
        Rule::quantifier => TokenKind::Glyph(GlyphClass::Quantifier),
        Rule::lambda => TokenKind::Glyph(GlyphClass::Lambda),
        Rule::set => TokenKind::Glyph(GlyphClass::Set),
        Rule::domain => TokenKind::Glyph(GlyphClass::Domain),
        Rule::truth => TokenKind::Glyph(GlyphClass::Truth),
        Rule::header => TokenKind::Glyph(GlyphClass::Header),
        Rule::tier => TokenKind::Glyph(GlyphClass::Tier),
        Rule::block => TokenKind::Glyph(GlyphClass::Block),
        Rule::arithmetic => TokenKind::Glyph(GlyphClass::Arithmetic),
        Rule::separator => TokenKind::Glyph(GlyphClass::Separator),
        Rule::punctuation => TokenKind::Glyph(GlyphClass::Punctuation),
        // EOI, plus rules that never appear inside a stream
        _ => TokenKind::Eof,
    }
}
