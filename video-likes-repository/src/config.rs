//! Configuration types for the LedgerStore.

use crate::errors::LedgerError;

/// Default operating ceiling for the serialized ledger, in bytes.
pub const DEFAULT_SOFT_CAP_BYTES: usize = 4500;

/// Default field-size limit assumed for the backing store, in bytes.
pub const DEFAULT_HARD_CAP_BYTES: usize = 5000;

/// Default eviction ladder: ledger sizes tried in order once the cap is exceeded.
pub const DEFAULT_EVICTION_LADDER: [usize; 3] = [1000, 500, 200];

/// Configuration for the LedgerStore.
///
/// Controls how large the serialized ledger may grow, how it shrinks once it
/// outgrows that ceiling, and how the store copes with records whose schema
/// predates the ledger field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStoreConfig {
    /// Maximum length of the serialized ledger ever written.
    ///
    /// Kept below `hard_cap_bytes` as a safety margin.
    pub soft_cap_bytes: usize,

    /// Field-size limit of the backing store.
    pub hard_cap_bytes: usize,

    /// Ledger sizes tried, largest first, when the serialized ledger exceeds
    /// `soft_cap_bytes`. The newest members are kept.
    pub eviction_ladder: Vec<usize>,

    /// When the store does not recognize the ledger field, report the legacy
    /// numeric field as the like count instead of failing reads with
    /// `SchemaMismatch`. Toggles fail either way.
    pub legacy_count_fallback: bool,

    /// Rewrite the legacy numeric field with the ledger size on every toggle.
    pub mirror_legacy_count: bool,
}

impl Default for LedgerStoreConfig {
    fn default() -> Self {
        Self {
            soft_cap_bytes: DEFAULT_SOFT_CAP_BYTES,
            hard_cap_bytes: DEFAULT_HARD_CAP_BYTES,
            eviction_ladder: DEFAULT_EVICTION_LADDER.to_vec(),
            legacy_count_fallback: true,
            mirror_legacy_count: true,
        }
    }
}

impl LedgerStoreConfig {
    /// Create a config with custom size limits and the default ladder.
    ///
    /// # Arguments
    ///
    /// * `soft_cap_bytes` - Operating ceiling for the serialized ledger
    /// * `hard_cap_bytes` - Field-size limit of the backing store
    pub fn with_caps(soft_cap_bytes: usize, hard_cap_bytes: usize) -> Self {
        Self {
            soft_cap_bytes,
            hard_cap_bytes,
            ..Self::default()
        }
    }

    /// Replace the eviction ladder.
    pub fn eviction_ladder(mut self, ladder: impl Into<Vec<usize>>) -> Self {
        self.eviction_ladder = ladder.into();
        self
    }

    /// Enable or disable the legacy count fallback for reads.
    pub fn legacy_count_fallback(mut self, enabled: bool) -> Self {
        self.legacy_count_fallback = enabled;
        self
    }

    /// Check the limits are coherent.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The soft cap can hold at least an empty ledger, sits at or
    ///   below the hard cap, and the ladder is non-empty and strictly decreasing
    /// * `Err(LedgerError::Validation)` - Otherwise
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.soft_cap_bytes < 2 {
            return Err(LedgerError::validation(
                "soft_cap_bytes must hold at least an empty ledger",
            ));
        }
        if self.soft_cap_bytes > self.hard_cap_bytes {
            return Err(LedgerError::validation(format!(
                "soft_cap_bytes {} exceeds hard_cap_bytes {}",
                self.soft_cap_bytes, self.hard_cap_bytes
            )));
        }
        if self.eviction_ladder.is_empty() {
            return Err(LedgerError::validation("eviction_ladder must not be empty"));
        }
        if self.eviction_ladder.windows(2).any(|w| w[0] <= w[1]) {
            return Err(LedgerError::validation(
                "eviction_ladder must be strictly decreasing",
            ));
        }
        Ok(())
    }
}
