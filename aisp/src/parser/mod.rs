//! Parser: token stream to [`Document`]
//!
//! The parser is a single pass over the token stream driven by a stack of
//! open contexts. Each frame tracks whether the next token starts a
//! statement and, while a binding's value is being read, the value builder
//! for that binding. Every limit is checked the moment it is crossed, so the
//! first error wins and no partial document escapes.

use crate::ast::{BindingId, ContextId, Span, TermId};
use crate::document::{
    Binding, BindingOp, BlockTag, Cached, Context, Document, Header, Item, Stats, Status, Term,
    Value, ValueShape,
};
use crate::error::AispError;
use crate::lexer::{Delimiter, GlyphClass, Lexer, Token, TokenKind, Tokens};
use crate::resource_limits::{ResourceLimits, AISP_POOL_CAPACITY};
use crate::AispResult;
use std::collections::HashMap;
use tracing::debug;

mod head;
mod value;

use head::Head;
use value::ValueBuilder;

/// Parse a raw source buffer into an unvalidated document
///
/// Limits above the kernel's hard maxima are clamped.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse(source: &[u8], limits: &ResourceLimits) -> AispResult<Document> {
    let limits = limits.clamped();
    let lexer = Lexer::new(source, &limits)?;
    let tokens = lexer.tokens()?;
    let document = DocumentParser::new(lexer.source(), tokens, limits).run()?;

    debug!(
        terms = document.terms.len(),
        contexts = document.contexts.len(),
        bindings = document.bindings.len(),
        tokens = document.stats.tokens,
        "parsed document"
    );
    Ok(document)
}

pub fn parse_str(source: &str, limits: &ResourceLimits) -> AispResult<Document> {
    parse(source.as_bytes(), limits)
}

struct Frame {
    context: ContextId,
    /// Offset of the opening delimiter; 0 for the root
    open_offset: usize,
    statement_start: bool,
    /// The next token is the block glyph that tags this context
    tag_pending: bool,
    value: Option<ValueBuilder>,
}

struct DocumentParser<'a> {
    source: &'a str,
    tokens: Tokens<'a>,
    limits: ResourceLimits,
    frames: Vec<Frame>,
    contexts: Vec<Context>,
    terms: Vec<Term>,
    term_index: HashMap<String, TermId>,
    bindings: Vec<Binding>,
    stats: Stats,
    header: Option<Header>,
}

impl<'a> DocumentParser<'a> {
    fn new(source: &'a str, tokens: Tokens<'a>, limits: ResourceLimits) -> Self {
        let root = Context {
            parent: None,
            delimiter: None,
            depth: 0,
            span: Span::new(0, source.len()),
            items: Vec::new(),
            tag: None,
        };

        Self {
            source,
            tokens,
            limits,
            frames: vec![Frame {
                context: ContextId::ROOT,
                open_offset: 0,
                statement_start: true,
                tag_pending: false,
                value: None,
            }],
            contexts: vec![root],
            terms: Vec::with_capacity(limits.max_terms),
            term_index: HashMap::with_capacity(limits.max_terms),
            bindings: Vec::new(),
            stats: Stats::default(),
            header: None,
        }
    }

    fn run(mut self) -> AispResult<Document> {
        loop {
            let token = self.next_token();
            if token.kind == TokenKind::Eof {
                self.end_of_input()?;
                break;
            }

            self.count(&token);
            if token.line_start {
                self.end_statement();
            }
            let tagging = std::mem::take(&mut self.top_mut().tag_pending);
            if tagging && token.is_glyph(GlyphClass::Block) {
                continue;
            }

            match token.kind {
                TokenKind::Open(delimiter) => self.open(token, delimiter)?,
                TokenKind::Close(delimiter) => self.close(token, delimiter)?,
                TokenKind::Glyph(GlyphClass::Separator) => self.end_statement(),
                TokenKind::Glyph(GlyphClass::Header) => {
                    self.header(token);
                    self.operand(token)?;
                }
                TokenKind::Name if self.top().statement_start => self.statement(token)?,
                _ => self.operand(token)?,
            }
        }

        Ok(self.into_document())
    }

    fn next_token(&mut self) -> Token<'a> {
        self.tokens.next().unwrap_or(Token {
            kind: TokenKind::Eof,
            text: "",
            span: Span::new(self.source.len(), self.source.len()),
            line_start: false,
        })
    }

    fn count(&mut self, token: &Token) {
        self.stats.tokens += 1;
        if token.is_symbolic() {
            self.stats.symbolic += 1;
        }
    }

    fn top(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Close the value being read at the current level and start a statement
    fn end_statement(&mut self) {
        self.finish_value();
        self.top_mut().statement_start = true;
    }

    fn finish_value(&mut self) {
        if let Some(builder) = self.top_mut().value.take() {
            self.bindings[builder.binding().index()].value = builder.finish();
        }
    }

    fn open(&mut self, token: Token<'a>, delimiter: Delimiter) -> AispResult<()> {
        let depth = self.frames.len();
        if depth > self.limits.max_depth {
            return Err(AispError::overflow_with_suggestion(
                format!(
                    "Context nesting depth {} exceeds limit of {}",
                    depth, self.limits.max_depth
                ),
                token.span.start,
                "Flatten nested contexts",
            ));
        }

        let tag = match delimiter {
            Delimiter::Block => self
                .tokens
                .clone()
                .next()
                .filter(|next| next.is_glyph(GlyphClass::Block))
                .and_then(|next| BlockTag::from_glyph(next.text)),
            _ => None,
        };

        let parent = self.top().context;
        let id = self.alloc_context(
            Context {
                parent: Some(parent),
                delimiter: Some(delimiter),
                depth,
                span: token.span,
                items: Vec::new(),
                tag,
            },
            token.span.start,
        )?;
        self.contexts[parent.index()].items.push(Item::Context(id));

        let frame = self.top_mut();
        frame.statement_start = false;
        if let Some(value) = frame.value.as_mut() {
            value.push_group(delimiter, token.span);
        }

        self.stats.max_depth = self.stats.max_depth.max(depth);
        self.frames.push(Frame {
            context: id,
            open_offset: token.span.start,
            statement_start: true,
            tag_pending: tag.is_some(),
            value: None,
        });
        Ok(())
    }

    fn close(&mut self, token: Token<'a>, delimiter: Delimiter) -> AispResult<()> {
        if self.frames.len() == 1 {
            return Err(AispError::parse_with_suggestion(
                format!("Unmatched closing delimiter '{}'", token.text),
                token.span.start,
                "Remove it or add the matching opening delimiter",
            ));
        }

        let context = self.top().context;
        let expected = self.contexts[context.index()].delimiter;
        if expected != Some(delimiter) {
            let expected = expected.map_or("", Delimiter::close);
            return Err(AispError::parse_with_suggestion(
                format!(
                    "Mismatched closing delimiter '{}', expected '{}'",
                    token.text, expected
                ),
                token.span.start,
                format!("Close the context with '{}'", expected),
            ));
        }

        self.finish_value();
        self.frames.pop();
        let span = &mut self.contexts[context.index()].span;
        *span = span.join(token.span);

        let parent = self.top_mut();
        parent.statement_start = false;
        if let Some(value) = parent.value.as_mut() {
            value.extend(token.span);
        }
        Ok(())
    }

    fn end_of_input(&mut self) -> AispResult<()> {
        self.finish_value();
        if self.frames.len() > 1 {
            let open = self.top().open_offset;
            return Err(AispError::parse_with_suggestion(
                "Unclosed context at end of input",
                open,
                "Add the matching closing delimiter",
            ));
        }
        Ok(())
    }

    /// Capture `𝔸version.name@date` when it is the first header
    fn header(&mut self, token: Token<'a>) {
        if self.header.is_some() {
            return;
        }

        let end = self
            .tokens
            .clone()
            .take_while(|next| !next.line_start && next.kind != TokenKind::Eof)
            .last()
            .map(|last| last.span.end);

        if let Some(end) = end {
            let start = token.span.end;
            let text = &self.source[start..end];
            self.header = Some(Header::from_text(text, Span::new(token.span.start, end)));
        }
    }

    /// A term name at statement start: either a head or an ordinary operand
    fn statement(&mut self, name: Token<'a>) -> AispResult<()> {
        match head::scan(&self.tokens) {
            Some(head) => self.head(name, head),
            None => self.operand(name),
        }
    }

    fn head(&mut self, name: Token<'a>, head: Head<'a>) -> AispResult<()> {
        let term = self.intern(&name)?;
        for token in &head.consumed {
            self.count(token);
            if token.kind == TokenKind::Name {
                self.intern(token)?;
            }
        }
        self.tokens = head.rest.clone();
        self.top_mut().statement_start = false;

        let declared = head.socket();
        let entry = &mut self.terms[term.index()];
        match (entry.socket, declared) {
            (None, Some(socket)) => {
                entry.socket = Some(socket);
                entry.declared_at = Some(name.span.start);
            }
            // Binding heads that disagree are left to the checker as CRASH
            (Some(first), Some(socket)) if first != socket && head.op.is_none() => {
                return Err(AispError::type_conflict_with_suggestion(
                    format!(
                        "Term '{}' declared as {}, first declared as {}",
                        entry.name, socket, first
                    ),
                    name.span.start,
                    "Declare each term with a single socket",
                ));
            }
            _ => {}
        }

        let Some(op) = head.op else {
            return Ok(());
        };
        self.stats.head_glyphs += [head.declared, Some(op)]
            .iter()
            .flatten()
            .filter(|token| token.is_symbolic())
            .count();

        let arity = head.params.len() as u16;
        match entry.arity {
            None => entry.arity = Some(arity),
            Some(first) if first != arity => {
                return Err(AispError::type_conflict_with_suggestion(
                    format!(
                        "Term '{}' bound with {} parameters, first bound with {}",
                        entry.name, arity, first
                    ),
                    name.span.start,
                    "Bind the term with the same parameters everywhere",
                ));
            }
            Some(_) => {}
        }

        let context = self.top().context;
        let binding = self.alloc_binding(
            Binding {
                term,
                context,
                op: if op.is_glyph(GlyphClass::Define) {
                    BindingOp::Define
                } else {
                    BindingOp::Assign
                },
                declared,
                arity,
                value: Value {
                    shape: ValueShape::Absent,
                    span: Span::new(op.span.end, op.span.end),
                    literal: None,
                },
                offset: name.span.start,
                compatibility: None,
            },
            name.span.start,
        )?;
        self.contexts[context.index()].items.push(Item::Binding(binding));
        self.top_mut().value = Some(ValueBuilder::new(binding, op.span.end));
        Ok(())
    }

    fn operand(&mut self, token: Token<'a>) -> AispResult<()> {
        let term = match token.kind {
            TokenKind::Name => Some(self.intern(&token)?),
            _ => None,
        };

        let frame = self.top_mut();
        frame.statement_start = false;
        if let Some(value) = frame.value.as_mut() {
            value.push(&token, term);
        }
        Ok(())
    }

    fn intern(&mut self, token: &Token) -> AispResult<TermId> {
        self.stats.references += 1;
        if let Some(&id) = self.term_index.get(token.text) {
            self.terms[id.index()].references += 1;
            return Ok(id);
        }

        if self.terms.len() >= self.limits.max_terms {
            return Err(AispError::overflow_with_suggestion(
                format!(
                    "Term '{}' exceeds the limit of {} unique terms",
                    token.text, self.limits.max_terms
                ),
                token.span.start,
                "Reuse existing term names",
            ));
        }

        let id = TermId::new(self.terms.len());
        self.terms.push(Term {
            name: token.text.to_string(),
            socket: None,
            declared_at: None,
            arity: None,
            references: 1,
            first_offset: token.span.start,
        });
        self.term_index.insert(token.text.to_string(), id);
        Ok(id)
    }

    fn alloc_context(&mut self, context: Context, offset: usize) -> AispResult<ContextId> {
        if self.contexts.len() >= AISP_POOL_CAPACITY {
            return Err(AispError::memory("Context pool exhausted", offset));
        }
        let id = ContextId::new(self.contexts.len());
        self.contexts.push(context);
        Ok(id)
    }

    fn alloc_binding(&mut self, binding: Binding, offset: usize) -> AispResult<BindingId> {
        if self.bindings.len() >= AISP_POOL_CAPACITY {
            return Err(AispError::memory("Binding pool exhausted", offset));
        }
        let id = BindingId::new(self.bindings.len());
        self.bindings.push(binding);
        Ok(id)
    }

    fn into_document(self) -> Document {
        Document {
            source_len: self.source.len(),
            header: self.header,
            contexts: self.contexts,
            terms: self.terms,
            term_index: self.term_index,
            bindings: self.bindings,
            stats: self.stats,
            status: Status::Unvalidated,
            verdict: Cached::Pending,
            density: Cached::Pending,
            ambiguity: Cached::Pending,
            tier: Cached::Pending,
        }
    }
}
