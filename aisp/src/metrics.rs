//! Density and ambiguity scoring
//!
//! Both metrics are pure functions of a classified document's statistics.
//! [`MetricInputs`] carries those statistics so the formulas can be
//! exercised without building documents.

use crate::checker::Verdict;
use crate::document::Document;
use serde::Serialize;
use tracing::debug;

/// Nesting depth tolerated before ambiguity starts to grow
pub const AMBIGUITY_DEPTH_BASELINE: usize = 4;

const DENSITY_BASE: f64 = 0.40;
const DENSITY_REUSE_WEIGHT: f64 = 0.20;
const DENSITY_HEAD_WEIGHT: f64 = 0.40;
const AMBIGUITY_BINDING_WEIGHT: f64 = 0.85;
const AMBIGUITY_DEPTH_WEIGHT: f64 = 0.15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricInputs {
    pub bindings: usize,
    pub zero: usize,
    pub adapt: usize,
    pub null: usize,
    pub crash: usize,
    pub unique_terms: usize,
    pub references: usize,
    pub tokens: usize,
    /// Symbolic type and operator glyphs in binding heads
    pub head_glyphs: usize,
    pub max_depth: usize,
}

impl MetricInputs {
    pub fn new(document: &Document, verdict: &Verdict) -> Self {
        let stats = document.stats();
        Self {
            bindings: verdict.total(),
            zero: verdict.zero,
            adapt: verdict.adapt,
            null: verdict.null,
            crash: verdict.crash,
            unique_terms: document.terms().len(),
            references: stats.references,
            tokens: stats.tokens,
            head_glyphs: stats.head_glyphs,
            max_depth: stats.max_depth,
        }
    }

    /// Share of name references that hit an already interned term
    pub fn reuse(&self) -> f64 {
        if self.references == 0 {
            return 0.0;
        }
        1.0 - self.unique_terms as f64 / self.references as f64
    }

    /// δ = (Z/B) · (0.40 + 0.20·reuse + 0.40·H/T)
    ///
    /// Tokens outside binding heads only raise T.
    pub fn density(&self) -> f32 {
        if self.bindings == 0 || self.tokens == 0 {
            return 0.0;
        }
        let zero_share = self.zero as f64 / self.bindings as f64;
        let head_share = self.head_glyphs as f64 / self.tokens as f64;
        let packing = DENSITY_BASE
            + DENSITY_REUSE_WEIGHT * self.reuse()
            + DENSITY_HEAD_WEIGHT * head_share;
        (zero_share * packing).clamp(0.0, 1.0) as f32
    }

    /// 0.85·(0.5·A + N + C)/B + 0.15·e/(e + B), e = excess depth
    pub fn ambiguity(&self) -> f32 {
        if self.bindings == 0 {
            return 1.0;
        }
        let bindings = self.bindings as f64;
        let unresolved = 0.5 * self.adapt as f64 + self.null as f64 + self.crash as f64;
        let excess = self.max_depth.saturating_sub(AMBIGUITY_DEPTH_BASELINE) as f64;
        let score = AMBIGUITY_BINDING_WEIGHT * unresolved / bindings
            + AMBIGUITY_DEPTH_WEIGHT * excess / (excess + bindings);
        score.clamp(0.0, 1.0) as f32
    }
}

impl Document {
    pub fn metric_inputs(&mut self) -> MetricInputs {
        let verdict = self.classify();
        MetricInputs::new(self, &verdict)
    }

    /// Density δ in `[0, 1]`, computed once
    pub fn density(&mut self) -> f32 {
        if let Some(density) = self.density.get() {
            return density;
        }
        let density = self.metric_inputs().density();
        debug!(density, "density computed");
        self.density.fill(density)
    }

    /// Ambiguity in `[0, 1]`, computed once
    pub fn ambiguity(&mut self) -> f32 {
        if let Some(ambiguity) = self.ambiguity.get() {
            return ambiguity;
        }
        let ambiguity = self.metric_inputs().ambiguity();
        debug!(ambiguity, "ambiguity computed");
        self.ambiguity.fill(ambiguity)
    }
}
