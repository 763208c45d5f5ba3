//! Configuration and dependency initialization.

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::str::FromStr;

use tracing::warn;
use video_likes_repository::LedgerStoreConfig;

/// Default video the simulation toggles.
const DEFAULT_ITEM_ID: &str = "video-1";

/// Default number of simulated voters.
const DEFAULT_VOTERS: usize = 32;

/// Default number of clicks per voter.
const DEFAULT_ROUNDS: usize = 3;

/// Settings for the local simulation binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Video every simulated voter clicks on.
    pub item_id: String,
    /// Number of concurrent voters.
    pub voters: usize,
    /// Clicks per voter.
    pub rounds: usize,
    /// Ledger limits applied by the store.
    pub ledger: LedgerStoreConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            item_id: DEFAULT_ITEM_ID.to_string(),
            voters: DEFAULT_VOTERS,
            rounds: DEFAULT_ROUNDS,
            ledger: LedgerStoreConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Read the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SIM_ITEM_ID`: Video to toggle (default: video-1)
    /// - `SIM_VOTERS`: Number of simulated voters (default: 32)
    /// - `SIM_ROUNDS`: Clicks per voter (default: 3)
    /// - `LIKES_SOFT_CAP_BYTES`: Ledger operating ceiling (default: 4500)
    /// - `LIKES_HARD_CAP_BYTES`: Store field-size limit (default: 5000)
    /// - `LIKES_LEGACY_FALLBACK`: Read the legacy count when the ledger field
    ///   is unknown, "true" or "false" (default: true)
    ///
    /// Invalid values are logged and replaced by their default.
    pub fn from_env() -> Self {
        let defaults = LedgerStoreConfig::default();
        let ledger = LedgerStoreConfig::with_caps(
            env_or("LIKES_SOFT_CAP_BYTES", defaults.soft_cap_bytes),
            env_or("LIKES_HARD_CAP_BYTES", defaults.hard_cap_bytes),
        )
        .legacy_count_fallback(env_or("LIKES_LEGACY_FALLBACK", defaults.legacy_count_fallback));

        Self {
            item_id: env::var("SIM_ITEM_ID")
                .ok()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ITEM_ID.to_string()),
            voters: env_or("SIM_VOTERS", DEFAULT_VOTERS),
            rounds: env_or("SIM_ROUNDS", DEFAULT_ROUNDS),
            ledger,
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when unset or invalid.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(variable = name, value = %raw, default = ?default, "Invalid value, using default");
                default
            }
        },
        Err(_) => default,
    }
}
