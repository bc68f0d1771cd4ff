//! AST infrastructure types
//!
//! This module contains metadata types used throughout the lexer, parser and
//! checker:
//! - `Span` for tracking byte ranges in the source buffer
//! - `TermId`, `ContextId` and `BindingId` for index-addressed arena entries

use std::fmt;

/// Byte range in the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn from_pest_span(span: pest::Span) -> Self {
        Self {
            start: span.start(),
            end: span.end(),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u16);

        impl $name {
            pub fn new(index: usize) -> Self {
                Self(index as u16)
            }

            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Index of an interned term in a document's term table
    TermId,
    "term_"
);

arena_id!(
    /// Index of a context in a document's context arena
    ContextId,
    "ctx_"
);

arena_id!(
    /// Index of a binding in a document's binding arena
    BindingId,
    "bind_"
);

impl ContextId {
    /// The document root context
    pub const ROOT: ContextId = ContextId(0);
}
