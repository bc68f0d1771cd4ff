use serde::{Deserialize, Serialize};

/// Maximum document size in bytes.
pub const AISP_MAX_DOC_SIZE: usize = 1024;

/// Maximum number of distinct term names in one document.
pub const AISP_MAX_TERMS: usize = 128;

/// Maximum context nesting depth. The document root sits at depth 0.
pub const AISP_MAX_DEPTH: usize = 32;

/// Capacity of the per-document context and binding pools.
///
/// Every context needs an open and a close byte and every binding needs at
/// least a name, an operator and a separator, so half the byte limit plus
/// the root context bounds both.
pub const AISP_POOL_CAPACITY: usize = AISP_MAX_DOC_SIZE / 2 + 1;

/// Resource limits enforced while parsing a document
///
/// The defaults are the kernel's hard limits. Hosts may tighten them for a
/// smaller target, but never loosen them: the fixed pools are sized by the
/// hard limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    /// Maximum source buffer size in bytes
    pub max_document_bytes: usize,

    /// Maximum number of unique terms
    pub max_terms: usize,

    /// Maximum context nesting depth
    pub max_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_document_bytes: AISP_MAX_DOC_SIZE,
            max_terms: AISP_MAX_TERMS,
            max_depth: AISP_MAX_DEPTH,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap every limit at its hard kernel maximum
    pub fn clamped(self) -> Self {
        Self {
            max_document_bytes: self.max_document_bytes.min(AISP_MAX_DOC_SIZE),
            max_terms: self.max_terms.min(AISP_MAX_TERMS),
            max_depth: self.max_depth.min(AISP_MAX_DEPTH),
        }
    }
}
