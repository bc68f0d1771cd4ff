//! Numeric call surface
//!
//! [`Kernel`] mirrors the embedded host interface: handles, tiers and codes
//! are `i32`, metrics are `f32`, and failures are reported as negative codes
//! with `{code, offset}` readable afterwards. Nothing panics across this
//! boundary.

use crate::document::Compatibility;
use crate::error::{AispError, ErrorCode, ErrorState};
use crate::registry::{Handle, Registry, RegistryConfig};
use crate::tier::Tier;
use crate::AispResult;

pub use crate::resource_limits::{AISP_MAX_DEPTH, AISP_MAX_DOC_SIZE, AISP_MAX_TERMS};

pub const AISP_TIER_REJECT: i32 = Tier::Reject as i32;
pub const AISP_TIER_BRONZE: i32 = Tier::Bronze as i32;
pub const AISP_TIER_SILVER: i32 = Tier::Silver as i32;
pub const AISP_TIER_GOLD: i32 = Tier::Gold as i32;
pub const AISP_TIER_PLATINUM: i32 = Tier::Platinum as i32;

pub const AISP_OK: i32 = ErrorCode::Ok as i32;
pub const AISP_ERR_PARSE: i32 = ErrorCode::Parse as i32;
pub const AISP_ERR_TYPE: i32 = ErrorCode::Type as i32;
pub const AISP_ERR_AMBIG: i32 = ErrorCode::Ambiguity as i32;
pub const AISP_ERR_MEMORY: i32 = ErrorCode::Memory as i32;
pub const AISP_ERR_OVERFLOW: i32 = ErrorCode::Overflow as i32;

pub const AISP_BIND_CRASH: i32 = Compatibility::Crash as i32;
pub const AISP_BIND_NULL: i32 = Compatibility::Null as i32;
pub const AISP_BIND_ADAPT: i32 = Compatibility::Adapt as i32;
pub const AISP_BIND_ZERO: i32 = Compatibility::Zero as i32;

/// Host-facing kernel instance
///
/// Holds no registry until [`Kernel::init`] runs; every call before that
/// fails with the memory code.
#[derive(Debug, Clone, Default)]
pub struct Kernel {
    config: RegistryConfig,
    registry: Option<Registry>,
    uninitialized: ErrorState,
}

impl Kernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create the registry, dropping any previous one
    pub fn init(&mut self) -> i32 {
        self.registry = Some(Registry::with_config(self.config));
        self.uninitialized.clear();
        AISP_OK
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    pub fn registry_mut(&mut self) -> Option<&mut Registry> {
        self.registry.as_mut()
    }

    /// Returns a handle, or a negative error code
    pub fn parse(&mut self, source: &[u8]) -> i32 {
        match self.call(|registry| registry.parse(source)) {
            Ok(handle) => handle,
            Err(code) => code,
        }
    }

    /// Returns 0 for a valid document, or a negative error code
    pub fn validate(&mut self, handle: Handle) -> i32 {
        match self.call(|registry| registry.validate(handle)) {
            Ok(()) => AISP_OK,
            Err(code) => code,
        }
    }

    /// Returns the tier ordinal 0..=4, or a negative error code
    pub fn tier(&mut self, handle: Handle) -> i32 {
        match self.call(|registry| registry.tier(handle)) {
            Ok(tier) => tier.ordinal(),
            Err(code) => code,
        }
    }

    pub fn ambig(&mut self, handle: Handle) -> f32 {
        self.call(|registry| registry.ambiguity(handle))
            .unwrap_or_else(|code| code as f32)
    }

    pub fn density(&mut self, handle: Handle) -> f32 {
        self.call(|registry| registry.density(handle))
            .unwrap_or_else(|code| code as f32)
    }

    /// Returns 0, or the ambiguity code when `ceiling` is exceeded
    pub fn check_ambiguity(&mut self, handle: Handle, ceiling: f32) -> i32 {
        match self.call(|registry| registry.check_ambiguity(handle, ceiling)) {
            Ok(()) => AISP_OK,
            Err(code) => code,
        }
    }

    pub fn release(&mut self, handle: Handle) -> i32 {
        match self.call(|registry| registry.release(handle)) {
            Ok(()) => AISP_OK,
            Err(code) => code,
        }
    }

    pub fn error_code(&self) -> i32 {
        self.error().code().as_i32()
    }

    pub fn error_offset(&self) -> u32 {
        u32::try_from(self.error().offset()).unwrap_or(u32::MAX)
    }

    fn error(&self) -> ErrorState {
        self.registry
            .as_ref()
            .map_or(self.uninitialized, Registry::error)
    }

    fn call<T>(&mut self, op: impl FnOnce(&mut Registry) -> AispResult<T>) -> Result<T, i32> {
        let Some(registry) = self.registry.as_mut() else {
            let error = AispError::memory("Kernel used before init", 0);
            self.uninitialized.record(&error);
            return Err(error.code().as_i32());
        };
        op(registry).map_err(|error| error.code().as_i32())
    }
}
