use crate::document::Document;
use crate::error::{AispError, ErrorState};
use crate::parser;
use crate::resource_limits::ResourceLimits;
use crate::tier::Tier;
use crate::AispResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Slot table capacity when none is configured
pub const DEFAULT_SLOTS: usize = 8;

/// Small integer identifying a stored document
pub type Handle = i32;

/// Registry configuration, loadable from JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub limits: ResourceLimits,
    pub slots: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            limits: ResourceLimits::default(),
            slots: DEFAULT_SLOTS,
        }
    }
}

/// Fixed table of document slots plus the last-error record
///
/// Every failing operation records its error; `parse` clears the record
/// before it runs. Not synchronized: callers serialize access.
#[derive(Debug, Clone)]
pub struct Registry {
    slots: Vec<Option<Document>>,
    cursor: usize,
    limits: ResourceLimits,
    error: ErrorState,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_config(RegistryConfig::default())
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let slots = config.slots.max(1);
        Self {
            slots: (0..slots).map(|_| None).collect(),
            cursor: 0,
            limits: config.limits.clamped(),
            error: ErrorState::default(),
        }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(index, _)| index as Handle)
    }

    pub fn error(&self) -> ErrorState {
        self.error
    }

    /// Parse a source buffer and store the document
    ///
    /// A failed parse touches no slot. When every slot is occupied the slot
    /// under the round-robin cursor is reused.
    #[tracing::instrument(skip_all, fields(source_len = source.len()))]
    pub fn parse(&mut self, source: &[u8]) -> AispResult<Handle> {
        self.error.clear();
        let document = parser::parse(source, &self.limits).map_err(|e| self.fail(e))?;

        let slot = self.allocate();
        self.slots[slot] = Some(document);
        debug!(handle = slot, "stored document");
        Ok(slot as Handle)
    }

    fn allocate(&mut self) -> usize {
        if let Some(free) = self.slots.iter().position(Option::is_none) {
            return free;
        }
        let slot = self.cursor;
        self.cursor = (self.cursor + 1) % self.slots.len();
        debug!(handle = slot, "reusing occupied slot");
        slot
    }

    pub fn get(&self, handle: Handle) -> Option<&Document> {
        let index = usize::try_from(handle).ok()?;
        self.slots.get(index)?.as_ref()
    }

    /// Run `op` against the document at `handle`, recording any failure
    pub fn with_document<T>(
        &mut self,
        handle: Handle,
        op: impl FnOnce(&mut Document) -> AispResult<T>,
    ) -> AispResult<T> {
        let slot = usize::try_from(handle)
            .ok()
            .and_then(|index| self.slots.get_mut(index))
            .and_then(Option::as_mut);

        let result = match slot {
            Some(document) => op(document),
            None => Err(unknown_handle(handle)),
        };
        result.map_err(|e| self.fail(e))
    }

    pub fn validate(&mut self, handle: Handle) -> AispResult<()> {
        self.with_document(handle, Document::validate)
    }

    pub fn tier(&mut self, handle: Handle) -> AispResult<Tier> {
        self.with_document(handle, |document| Ok(document.tier()))
    }

    pub fn density(&mut self, handle: Handle) -> AispResult<f32> {
        self.with_document(handle, |document| Ok(document.density()))
    }

    pub fn ambiguity(&mut self, handle: Handle) -> AispResult<f32> {
        self.with_document(handle, |document| Ok(document.ambiguity()))
    }

    /// Fail with an ambiguity error when the document exceeds `ceiling`
    ///
    /// The document's validation status is left as it is.
    pub fn check_ambiguity(&mut self, handle: Handle, ceiling: f32) -> AispResult<()> {
        self.with_document(handle, |document| {
            let ambiguity = document.ambiguity();
            if ambiguity > ceiling {
                return Err(AispError::ambiguity(
                    format!(
                        "Ambiguity {:.3} exceeds the ceiling of {:.3}",
                        ambiguity, ceiling
                    ),
                    0,
                ));
            }
            Ok(())
        })
    }

    /// Free the slot at `handle`
    pub fn release(&mut self, handle: Handle) -> AispResult<()> {
        let slot = usize::try_from(handle)
            .ok()
            .and_then(|index| self.slots.get_mut(index))
            .filter(|slot| slot.is_some());

        match slot {
            Some(slot) => {
                *slot = None;
                debug!(handle, "released document");
                Ok(())
            }
            None => Err(self.fail(unknown_handle(handle))),
        }
    }

    /// Drop every document and clear the error record
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.cursor = 0;
        self.error.clear();
    }

    fn fail(&mut self, error: AispError) -> AispError {
        self.error.record(&error);
        error
    }
}

fn unknown_handle(handle: Handle) -> AispError {
    AispError::parse_with_suggestion(
        format!("No document at handle {}", handle),
        0,
        "Use a handle returned by a successful parse",
    )
}
