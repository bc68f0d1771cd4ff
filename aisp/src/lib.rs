//! # AISP Kernel
//!
//! **Static validation for dense symbolic documents**
//!
//! AISP is a compact symbolic notation for semantic statements meant for
//! machine consumption. This crate parses a bounded source buffer, checks
//! every term binding against the socket its term expects, scores the
//! document's density and ambiguity, and maps density to a quality tier.
//! Nothing in a document is ever executed.
//!
//! ## Quick Start
//!
//! ```rust
//! use aisp::{AispResult, Registry, Tier};
//!
//! fn main() -> AispResult<()> {
//!     let mut registry = Registry::new();
//!
//!     let handle = registry.parse("x : ℕ ≜ 3\ny ≔ x".as_bytes())?;
//!     registry.validate(handle)?;
//!
//!     let tier = registry.tier(handle)?;
//!     assert!(tier >= Tier::Reject);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`lexer`] segments the buffer into glyphs, names, numerals and
//!   delimiters.
//! - [`parser`] builds a [`Document`]: nested contexts, interned terms and
//!   bindings, with size, term and depth limits enforced as it goes.
//! - [`checker`] classifies each binding as CRASH, NULL, ADAPT or ZERO.
//! - [`metrics`] and [`tier`] derive density, ambiguity and the tier, each
//!   computed once per document.
//! - [`Registry`] owns documents by handle and records the last error;
//!   [`Kernel`] exposes it as a numeric call surface.

pub mod ast;
pub mod checker;
pub mod document;
pub mod error;
pub mod kernel;
pub mod lexer;
pub mod metrics;
pub mod parser;
pub mod registry;
pub mod report;
pub mod resource_limits;
pub mod tier;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use ast::{BindingId, ContextId, Span, TermId};
pub use checker::Verdict;
pub use document::{
    Binding, BindingOp, BlockTag, Compatibility, Context, Document, Header, Literal, Socket,
    Status, Term, ValueShape,
};
pub use error::{AispError, ErrorCode, ErrorState};
pub use kernel::Kernel;
pub use lexer::{Lexer, Token, TokenKind};
pub use metrics::MetricInputs;
pub use parser::{parse, parse_str};
pub use registry::{Handle, Registry, RegistryConfig};
pub use report::DocumentReport;
pub use resource_limits::{ResourceLimits, AISP_MAX_DEPTH, AISP_MAX_DOC_SIZE, AISP_MAX_TERMS};
pub use tier::Tier;

/// Result type for AISP kernel operations
pub type AispResult<T> = Result<T, AispError>;

#[cfg(test)]
mod tests;
