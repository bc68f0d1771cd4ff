use crate::checker::Verdict;
use crate::document::{Document, Header, Status};
use crate::error::AispError;
use crate::registry::{Handle, Registry};
use crate::tier::Tier;
use crate::AispResult;
use serde::Serialize;

/// Serializable summary of a validated and scored document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    pub bytes: usize,
    pub header: Option<Header>,
    pub status: Status,
    pub error: Option<ErrorReport>,
    pub tier: TierReport,
    pub density: f32,
    pub ambiguity: f32,
    pub completeness: u8,
    pub terms: usize,
    pub contexts: usize,
    pub bindings: BindingBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: i32,
    pub kind: &'static str,
    pub offset: usize,
    pub message: String,
}

impl From<&AispError> for ErrorReport {
    fn from(error: &AispError) -> Self {
        Self {
            code: error.code().as_i32(),
            kind: error.code().name(),
            offset: error.offset(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierReport {
    pub ordinal: i32,
    pub name: &'static str,
    pub symbol: &'static str,
}

impl From<Tier> for TierReport {
    fn from(tier: Tier) -> Self {
        Self {
            ordinal: tier.ordinal(),
            name: tier.name(),
            symbol: tier.symbol(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BindingBreakdown {
    pub total: usize,
    pub zero: usize,
    pub adapt: usize,
    pub null: usize,
    pub crash: usize,
}

impl From<Verdict> for BindingBreakdown {
    fn from(verdict: Verdict) -> Self {
        Self {
            total: verdict.total(),
            zero: verdict.zero,
            adapt: verdict.adapt,
            null: verdict.null,
            crash: verdict.crash,
        }
    }
}

impl DocumentReport {
    /// Validate, score and summarize a document
    pub fn build(document: &mut Document) -> Self {
        let error = document.validate().err().map(|e| ErrorReport::from(&e));
        let verdict = document.classify();

        Self {
            bytes: document.source_len(),
            header: document.header().cloned(),
            status: document.status(),
            error,
            tier: document.tier().into(),
            density: document.density(),
            ambiguity: document.ambiguity(),
            completeness: document.completeness(),
            terms: document.terms().len(),
            contexts: document.contexts().len(),
            bindings: verdict.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == Status::Valid
    }
}

impl Registry {
    /// Report on the document at `handle`
    ///
    /// Validation failures are part of the report, not an error.
    pub fn report(&mut self, handle: Handle) -> AispResult<DocumentReport> {
        self.with_document(handle, |document| Ok(DocumentReport::build(document)))
    }
}
