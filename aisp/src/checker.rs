//! Binder and type-checker
//!
//! Resolves every binding's value shape against the socket its term
//! expects and assigns one [`Compatibility`] per binding. Classification
//! is computed once per document and frozen.

use crate::ast::TermId;
use crate::document::{
    Binding, BindingOp, Compatibility, Document, Literal, Socket, Status, ValueShape,
};
use crate::error::AispError;
use crate::AispResult;
use serde::Serialize;
use tracing::debug;

/// Aggregated classification of a document's bindings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub crash: usize,
    pub null: usize,
    pub adapt: usize,
    pub zero: usize,
    /// Combined classification of all bindings; `None` without bindings
    pub worst: Option<Compatibility>,
    /// Offset of the first CRASH binding in document order
    pub first_crash: Option<usize>,
}

impl Verdict {
    fn record(&mut self, compatibility: Compatibility, offset: usize) {
        match compatibility {
            Compatibility::Crash => {
                self.crash += 1;
                self.first_crash.get_or_insert(offset);
            }
            Compatibility::Null => self.null += 1,
            Compatibility::Adapt => self.adapt += 1,
            Compatibility::Zero => self.zero += 1,
        }
        self.worst = Some(
            self.worst
                .map_or(compatibility, |worst| worst.combine(compatibility)),
        );
    }

    pub fn count(&self, compatibility: Compatibility) -> usize {
        match compatibility {
            Compatibility::Crash => self.crash,
            Compatibility::Null => self.null,
            Compatibility::Adapt => self.adapt,
            Compatibility::Zero => self.zero,
        }
    }

    pub fn total(&self) -> usize {
        self.crash + self.null + self.adapt + self.zero
    }

    pub fn has_crash(&self) -> bool {
        self.first_crash.is_some()
    }
}

impl Document {
    /// Classify every binding, or return the frozen verdict
    #[tracing::instrument(skip_all, fields(bindings = self.bindings.len()))]
    pub fn classify(&mut self) -> Verdict {
        if let Some(verdict) = self.verdict.get() {
            return verdict;
        }

        let classes = Checker { document: self }.run();
        let mut verdict = Verdict::default();
        for (binding, compatibility) in self.bindings.iter_mut().zip(classes) {
            binding.compatibility = Some(compatibility);
            verdict.record(compatibility, binding.offset);
        }

        debug!(
            crash = verdict.crash,
            null = verdict.null,
            adapt = verdict.adapt,
            zero = verdict.zero,
            "classified bindings"
        );
        self.verdict.fill(verdict)
    }

    /// Run the type-checker and settle the document's status
    ///
    /// Idempotent: a valid document stays valid, an invalid one keeps
    /// failing with the same error.
    #[tracing::instrument(skip_all)]
    pub fn validate(&mut self) -> AispResult<()> {
        match self.status {
            Status::Valid => return Ok(()),
            Status::Invalid { offset } => return Err(self.conflict(offset)),
            Status::Unvalidated => {}
        }

        match self.classify().first_crash {
            None => {
                self.status = Status::Valid;
                Ok(())
            }
            Some(offset) => {
                self.status = Status::Invalid { offset };
                debug!(offset, "validation failed");
                Err(self.conflict(offset))
            }
        }
    }

    fn conflict(&self, offset: usize) -> AispError {
        let name = self
            .bindings
            .iter()
            .find(|binding| binding.offset == offset)
            .and_then(|binding| self.term(binding.term))
            .map_or("?", |term| term.name.as_str());

        AispError::type_conflict_with_suggestion(
            format!("Binding of '{}' conflicts with an established binding", name),
            offset,
            "Declare each term with a single socket and literal",
        )
    }
}

struct Checker<'d> {
    document: &'d Document,
}

impl<'d> Checker<'d> {
    fn run(&self) -> Vec<Compatibility> {
        self.document
            .bindings
            .iter()
            .enumerate()
            .map(|(index, binding)| self.classify(index, binding))
            .collect()
    }

    fn classify(&self, index: usize, binding: &Binding) -> Compatibility {
        let established = self.document.terms[binding.term.index()].socket;
        if let (Some(declared), Some(established)) = (binding.declared, established) {
            if declared != established {
                return Compatibility::Crash;
            }
        }

        if self.contradicts_definition(index, binding) {
            return Compatibility::Crash;
        }

        let shape = match binding.value.shape {
            ValueShape::Absent => return Compatibility::Null,
            ValueShape::Known(socket) => socket,
            ValueShape::Reference(term) => self.resolve(term, &mut vec![binding.term]),
        };
        let expected = self.resolve(binding.term, &mut Vec::new());

        if shape == expected {
            Compatibility::Zero
        } else if shape.coerces_to(expected) {
            Compatibility::Adapt
        } else {
            Compatibility::Null
        }
    }

    /// A `≜` literal that differs from the first earlier `≜` literal
    fn contradicts_definition(&self, index: usize, binding: &Binding) -> bool {
        if binding.op != BindingOp::Define {
            return false;
        }
        let Some(literal) = binding.value.literal else {
            return false;
        };

        self.document.bindings[..index]
            .iter()
            .filter(|earlier| earlier.term == binding.term && earlier.op == BindingOp::Define)
            .find_map(|earlier| earlier.value.literal)
            .is_some_and(|first: Literal| first != literal)
    }

    /// Socket of a term: declared, else the shape of its first non-absent
    /// binding, else entity. `visiting` breaks reference cycles.
    fn resolve(&self, term: TermId, visiting: &mut Vec<TermId>) -> Socket {
        if let Some(socket) = self.document.terms[term.index()].socket {
            return socket;
        }
        if visiting.contains(&term) {
            return Socket::Entity;
        }
        visiting.push(term);

        let shape = self
            .document
            .bindings
            .iter()
            .filter(|binding| binding.term == term)
            .map(|binding| binding.value.shape)
            .find(|shape| *shape != ValueShape::Absent);

        match shape {
            Some(ValueShape::Known(socket)) => socket,
            Some(ValueShape::Reference(next)) => self.resolve(next, visiting),
            Some(ValueShape::Absent) | None => Socket::Entity,
        }
    }
}
