//! Document data model
//!
//! A [`Document`] is a Document-local arena: contexts, terms and bindings
//! live in flat vectors and refer to each other by index. Metric and
//! verdict caches are explicit [`Cached`] tags so repeated queries never
//! recompute.

use crate::ast::{BindingId, ContextId, Span, TermId};
use crate::checker::Verdict;
use crate::lexer::Delimiter;
use crate::tier::Tier;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Expected role of a term when bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Socket {
    Quantity,
    Truth,
    Text,
    Set,
    Tuple,
    Relation,
    Entity,
}

impl Socket {
    /// Whether a value of this shape can be implicitly wrapped into `target`
    pub fn coerces_to(self, target: Socket) -> bool {
        use Socket::*;
        matches!(
            (self, target),
            (Quantity, Relation | Tuple)
                | (Truth, Quantity | Relation | Tuple)
                | (Text, Entity | Tuple)
                | (Entity, Text | Set | Tuple | Relation)
                | (Tuple, Set)
                | (Set, Relation)
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Socket::Quantity => "quantity",
            Socket::Truth => "truth",
            Socket::Text => "text",
            Socket::Set => "set",
            Socket::Tuple => "tuple",
            Socket::Relation => "relation",
            Socket::Entity => "entity",
        }
    }
}

impl fmt::Display for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-binding classification, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Compatibility {
    /// Logic conflict with an established binding
    Crash = 0,
    /// No compatible socket for the bound shape
    Null = 1,
    /// Coercible type mismatch
    Adapt = 2,
    /// Full compatibility
    Zero = 3,
}

impl Compatibility {
    pub const ALL: [Compatibility; 4] = [
        Compatibility::Crash,
        Compatibility::Null,
        Compatibility::Adapt,
        Compatibility::Zero,
    ];

    /// Aggregate two classifications; the worse one dominates
    pub fn combine(self, other: Compatibility) -> Compatibility {
        self.min(other)
    }

    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Compatibility::Crash => "⊥",
            Compatibility::Null => "∅",
            Compatibility::Adapt => "λ",
            Compatibility::Zero => "⊤",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Compatibility::Crash => "CRASH",
            Compatibility::Null => "NULL",
            Compatibility::Adapt => "ADAPT",
            Compatibility::Zero => "ZERO",
        }
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Memoization tag for a lazily computed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cached<T> {
    Pending,
    Computed(T),
}

impl<T: Copy> Cached<T> {
    pub fn get(&self) -> Option<T> {
        match self {
            Cached::Pending => None,
            Cached::Computed(value) => Some(*value),
        }
    }

    /// Freeze `value` unless a value is already frozen; returns the frozen one
    pub fn fill(&mut self, value: T) -> T {
        match self {
            Cached::Computed(existing) => *existing,
            Cached::Pending => {
                *self = Cached::Computed(value);
                value
            }
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Cached::Computed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Status {
    Unvalidated,
    Valid,
    /// Validation found a CRASH binding at `offset`
    Invalid { offset: usize },
}

impl Status {
    pub fn name(self) -> &'static str {
        match self {
            Status::Unvalidated => "unvalidated",
            Status::Valid => "valid",
            Status::Invalid { .. } => "invalid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingOp {
    /// `≜`
    Define,
    /// `≔`
    Assign,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Truth(bool),
}

/// Shape of a bound value as seen by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Nothing follows the binding operator
    Absent,
    Known(Socket),
    /// A lone term name, resolved at check time
    Reference(TermId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Value {
    pub shape: ValueShape,
    pub span: Span,
    pub literal: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub term: TermId,
    pub context: ContextId,
    pub op: BindingOp,
    /// Socket written on the binding head, if any
    pub declared: Option<Socket>,
    pub arity: u16,
    pub value: Value,
    /// Byte offset of the head's term name
    pub offset: usize,
    pub compatibility: Option<Compatibility>,
}

/// An interned term name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub name: String,
    pub socket: Option<Socket>,
    pub declared_at: Option<usize>,
    pub arity: Option<u16>,
    pub references: u32,
    pub first_offset: usize,
}

/// Tags of `⟦…⟧` blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockTag {
    Meta,
    Types,
    Rules,
    Functions,
    Errors,
    Evidence,
    Category,
    Theorems,
}

impl BlockTag {
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        match glyph {
            "Ω" => Some(BlockTag::Meta),
            "Σ" => Some(BlockTag::Types),
            "Γ" => Some(BlockTag::Rules),
            "Λ" => Some(BlockTag::Functions),
            "Χ" => Some(BlockTag::Errors),
            "Ε" => Some(BlockTag::Evidence),
            "ℭ" => Some(BlockTag::Category),
            "Θ" => Some(BlockTag::Theorems),
            _ => None,
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            BlockTag::Meta
                | BlockTag::Types
                | BlockTag::Rules
                | BlockTag::Functions
                | BlockTag::Evidence
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Binding(BindingId),
    Context(ContextId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    pub parent: Option<ContextId>,
    /// `None` for the document root
    pub delimiter: Option<Delimiter>,
    pub depth: usize,
    pub span: Span,
    pub items: Vec<Item>,
    pub tag: Option<BlockTag>,
}

/// Document header `𝔸version.name@date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub version: String,
    pub name: String,
    pub date: Option<String>,
    #[serde(skip)]
    pub span: Span,
}

impl Header {
    /// Split the text following `𝔸`, e.g. `5.1.name@2026-01-25`
    pub fn from_text(text: &str, span: Span) -> Self {
        let (body, date) = match text.split_once('@') {
            Some((body, date)) => (body, Some(date.trim().to_string())),
            None => (text, None),
        };
        let version_len = body
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(body.len());
        let (version, name) = body.split_at(version_len);

        Header {
            version: version.trim_end_matches('.').to_string(),
            name: name.trim().to_string(),
            date,
            span,
        }
    }
}

/// Structural statistics gathered while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Tokens excluding end of input
    pub tokens: usize,
    /// Glyph and delimiter tokens with a non-ASCII lexeme
    pub symbolic: usize,
    /// Non-ASCII type and operator glyphs of binding heads
    pub head_glyphs: usize,
    /// Name tokens, every one of which references an interned term
    pub references: usize,
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) source_len: usize,
    pub(crate) header: Option<Header>,
    pub(crate) contexts: Vec<Context>,
    pub(crate) terms: Vec<Term>,
    pub(crate) term_index: HashMap<String, TermId>,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) stats: Stats,
    pub(crate) status: Status,
    pub(crate) verdict: Cached<Verdict>,
    pub(crate) density: Cached<f32>,
    pub(crate) ambiguity: Cached<f32>,
    pub(crate) tier: Cached<Tier>,
}

impl Document {
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn root(&self) -> &Context {
        &self.contexts[ContextId::ROOT.index()]
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn context(&self, id: ContextId) -> Option<&Context> {
        self.contexts.get(id.index())
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.index())
    }

    pub fn term_named(&self, name: &str) -> Option<&Term> {
        self.term_index.get(name).and_then(|id| self.term(*id))
    }

    pub fn term_id(&self, name: &str) -> Option<TermId> {
        self.term_index.get(name).copied()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.index())
    }

    /// Bindings of one term, in document order
    pub fn bindings_of(&self, term: TermId) -> impl Iterator<Item = &Binding> + '_ {
        self.bindings.iter().filter(move |b| b.term == term)
    }

    pub fn block_tags(&self) -> impl Iterator<Item = BlockTag> + '_ {
        self.contexts.iter().filter_map(|c| c.tag)
    }

    /// Block completeness φ in 0..=100
    ///
    /// 16 points per distinct required block, 4 per distinct optional block
    /// with the optional share capped at 20.
    pub fn completeness(&self) -> u8 {
        let mut tags: Vec<BlockTag> = self.block_tags().collect();
        tags.sort_by_key(|tag| *tag as u8);
        tags.dedup();

        let required = tags.iter().filter(|tag| tag.is_required()).count();
        let optional = tags.len() - required;
        let score = required * 16 + (optional * 4).min(20);
        score.min(100) as u8
    }

    /// Verdict if the document has already been classified
    pub fn cached_verdict(&self) -> Option<Verdict> {
        self.verdict.get()
    }

    pub fn cached_density(&self) -> Option<f32> {
        self.density.get()
    }

    pub fn cached_ambiguity(&self) -> Option<f32> {
        self.ambiguity.get()
    }
}
