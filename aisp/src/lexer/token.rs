use crate::ast::Span;
use std::fmt;

/// Paired delimiter families
///
/// `⟦ ⟧` opens a block, `⟨ ⟩` a tuple or record, `{ }` a set literal; parens
/// and brackets group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Block,
    Angle,
    Brace,
    Paren,
    Bracket,
}

impl Delimiter {
    /// Family of an opening or closing delimiter lexeme
    pub fn of(text: &str) -> Self {
        match text {
            "⟦" | "⟧" => Delimiter::Block,
            "⟨" | "⟩" => Delimiter::Angle,
            "{" | "}" => Delimiter::Brace,
            "(" | ")" => Delimiter::Paren,
            _ => Delimiter::Bracket,
        }
    }

    pub fn open(self) -> &'static str {
        match self {
            Delimiter::Block => "⟦",
            Delimiter::Angle => "⟨",
            Delimiter::Brace => "{",
            Delimiter::Paren => "(",
            Delimiter::Bracket => "[",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            Delimiter::Block => "⟧",
            Delimiter::Angle => "⟩",
            Delimiter::Brace => "}",
            Delimiter::Paren => ")",
            Delimiter::Bracket => "]",
        }
    }
}

/// Symbol table classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    /// `≜`, `::=`
    Define,
    /// `≔`, `:=`
    Assign,
    /// Implication, equivalence, connectives, composition, turnstiles
    Logic,
    /// Comparisons
    Relation,
    /// `:`
    Declare,
    Quantifier,
    Lambda,
    /// Membership, inclusion, set operators, `∅`, `𝒫`
    Set,
    /// `ℕ ℤ ℝ ℚ 𝔹 𝕊`
    Domain,
    /// `⊤`, `⊥`
    Truth,
    /// `𝔸`
    Header,
    /// Tier marks `⊘ ◊⁻ ◊ ◊⁺ ◊⁺⁺`
    Tier,
    /// Block tags `Ω Σ Γ Λ Χ Ε Θ ℭ Δ`
    Block,
    Arithmetic,
    /// `;`, `,`
    Separator,
    Punctuation,
}

impl GlyphClass {
    pub fn name(self) -> &'static str {
        match self {
            GlyphClass::Define => "define",
            GlyphClass::Assign => "assign",
            GlyphClass::Logic => "logic",
            GlyphClass::Relation => "relation",
            GlyphClass::Declare => "declare",
            GlyphClass::Quantifier => "quantifier",
            GlyphClass::Lambda => "lambda",
            GlyphClass::Set => "set",
            GlyphClass::Domain => "domain",
            GlyphClass::Truth => "truth",
            GlyphClass::Header => "header",
            GlyphClass::Tier => "tier",
            GlyphClass::Block => "block",
            GlyphClass::Arithmetic => "arithmetic",
            GlyphClass::Separator => "separator",
            GlyphClass::Punctuation => "punctuation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Term name
    Name,
    /// Decimal numeral
    Numeral,
    Glyph(GlyphClass),
    Open(Delimiter),
    Close(Delimiter),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Name => write!(f, "name"),
            TokenKind::Numeral => write!(f, "numeral"),
            TokenKind::Glyph(class) => write!(f, "{}", class.name()),
            TokenKind::Open(_) => write!(f, "open"),
            TokenKind::Close(_) => write!(f, "close"),
            TokenKind::Eof => write!(f, "eof"),
        }
    }
}

/// One lexeme with its byte span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
    /// First token of the document, or preceded by a line break
    pub line_start: bool,
}

impl<'a> Token<'a> {
    /// Whether the lexeme is a non-ASCII glyph or delimiter
    ///
    /// Term names never count, whatever script they are written in.
    pub fn is_symbolic(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Glyph(_) | TokenKind::Open(_) | TokenKind::Close(_)
        ) && !self.text.is_ascii()
    }

    pub fn is_glyph(&self, class: GlyphClass) -> bool {
        self.kind == TokenKind::Glyph(class)
    }

    pub fn is_separator(&self) -> bool {
        self.is_glyph(GlyphClass::Separator)
    }

    /// `≜` or `≔` and their ASCII spellings
    pub fn is_binding_op(&self) -> bool {
        self.is_glyph(GlyphClass::Define) || self.is_glyph(GlyphClass::Assign)
    }
}
