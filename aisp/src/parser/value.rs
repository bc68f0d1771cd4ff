use crate::ast::{BindingId, Span, TermId};
use crate::document::{Literal, Socket, Value, ValueShape};
use crate::lexer::{Delimiter, GlyphClass, Token, TokenKind};

const RELATION_FORMING: [&str; 10] = ["⇒", "⇔", "→", "↔", "↦", "∘", "->", "=>", "<->", "<=>"];

/// Operator strength, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Strength {
    Quantity,
    Set,
    Truth,
    Relation,
}

impl Strength {
    fn socket(self) -> Socket {
        match self {
            Strength::Quantity => Socket::Quantity,
            Strength::Set => Socket::Set,
            Strength::Truth => Socket::Truth,
            Strength::Relation => Socket::Relation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Atom {
    Numeral(Option<f64>),
    Truth(bool),
    Name(TermId),
    Group(Delimiter),
    /// Domain glyph, `∅` or `𝒫`
    Collection,
    Other,
}

enum Role {
    Atom(Atom),
    Operator(Strength),
    Ignored,
}

fn role(token: &Token, term: Option<TermId>) -> Role {
    match token.kind {
        TokenKind::Numeral => Role::Atom(Atom::Numeral(token.text.parse().ok())),
        TokenKind::Name => Role::Atom(term.map_or(Atom::Other, Atom::Name)),
        TokenKind::Open(delimiter) => Role::Atom(Atom::Group(delimiter)),
        TokenKind::Close(_) | TokenKind::Eof => Role::Ignored,
        TokenKind::Glyph(class) => match class {
            GlyphClass::Logic if RELATION_FORMING.contains(&token.text) => {
                Role::Operator(Strength::Relation)
            }
            GlyphClass::Quantifier | GlyphClass::Lambda => Role::Operator(Strength::Relation),
            GlyphClass::Logic | GlyphClass::Relation => Role::Operator(Strength::Truth),
            GlyphClass::Set => match token.text {
                "∅" | "𝒫" => Role::Atom(Atom::Collection),
                "∩" | "∪" | "∖" => Role::Operator(Strength::Set),
                _ => Role::Operator(Strength::Truth),
            },
            GlyphClass::Domain => Role::Atom(Atom::Collection),
            GlyphClass::Truth => Role::Atom(Atom::Truth(token.text == "⊤")),
            GlyphClass::Arithmetic => Role::Operator(Strength::Quantity),
            GlyphClass::Declare | GlyphClass::Separator | GlyphClass::Punctuation => Role::Ignored,
            GlyphClass::Define
            | GlyphClass::Assign
            | GlyphClass::Header
            | GlyphClass::Tier
            | GlyphClass::Block => Role::Atom(Atom::Other),
        },
    }
}

/// Accumulates the top-level tokens of one binding's value
#[derive(Debug, Clone)]
pub(super) struct ValueBuilder {
    binding: BindingId,
    first: Option<Atom>,
    atoms: usize,
    strongest: Option<Strength>,
    span: Option<Span>,
    /// End of the binding operator, used as the span of an absent value
    anchor: usize,
}

impl ValueBuilder {
    pub(super) fn new(binding: BindingId, anchor: usize) -> Self {
        Self {
            binding,
            first: None,
            atoms: 0,
            strongest: None,
            span: None,
            anchor,
        }
    }

    pub(super) fn binding(&self) -> BindingId {
        self.binding
    }

    /// Add a token seen at the value's own nesting level
    pub(super) fn push(&mut self, token: &Token, term: Option<TermId>) {
        match role(token, term) {
            Role::Atom(atom) => self.push_atom(atom),
            Role::Operator(strength) => {
                self.strongest = Some(self.strongest.map_or(strength, |s| s.max(strength)));
            }
            Role::Ignored => {}
        }
        self.extend(token.span);
    }

    /// A child context opened inside the value counts as a single atom
    pub(super) fn push_group(&mut self, delimiter: Delimiter, span: Span) {
        self.push_atom(Atom::Group(delimiter));
        self.extend(span);
    }

    pub(super) fn extend(&mut self, span: Span) {
        self.span = Some(self.span.map_or(span, |s| s.join(span)));
    }

    fn push_atom(&mut self, atom: Atom) {
        if self.first.is_none() {
            self.first = Some(atom);
        }
        self.atoms += 1;
    }

    pub(super) fn finish(&self) -> Value {
        Value {
            shape: self.shape(),
            span: self
                .span
                .unwrap_or_else(|| Span::new(self.anchor, self.anchor)),
            literal: self.literal(),
        }
    }

    fn shape(&self) -> ValueShape {
        let Some(first) = self.first else {
            return ValueShape::Absent;
        };
        if let Some(strength) = self.strongest {
            return ValueShape::Known(strength.socket());
        }

        match first {
            Atom::Numeral(_) => ValueShape::Known(Socket::Quantity),
            Atom::Truth(_) => ValueShape::Known(Socket::Truth),
            Atom::Group(Delimiter::Brace) | Atom::Collection => ValueShape::Known(Socket::Set),
            Atom::Group(Delimiter::Angle | Delimiter::Bracket) => ValueShape::Known(Socket::Tuple),
            Atom::Name(term) if self.atoms == 1 => ValueShape::Reference(term),
            Atom::Group(_) | Atom::Name(_) | Atom::Other => ValueShape::Known(Socket::Entity),
        }
    }

    fn literal(&self) -> Option<Literal> {
        if self.atoms != 1 || self.strongest.is_some() {
            return None;
        }
        match self.first? {
            Atom::Numeral(number) => number.map(Literal::Number),
            Atom::Truth(truth) => Some(Literal::Truth(truth)),
            _ => None,
        }
    }
}
