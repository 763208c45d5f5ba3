//! Dependency initialization and wiring for the simulation.

use std::sync::Arc;

use tracing::info;
use video_likes_repository::{FieldMap, InMemoryDocumentStore, LedgerStore};
use video_likes_shared::fields;

use super::SimulationConfig;
use crate::AppError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Backing document store, seeded with the simulated video.
    pub documents: Arc<InMemoryDocumentStore>,
    /// Ledger store the controllers toggle through.
    pub ledger: Arc<LedgerStore>,
    /// Configuration the dependencies were built from.
    pub config: SimulationConfig,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`SimulationConfig::from_env`] for the variables read.
    pub fn new() -> Result<Self, AppError> {
        Self::with_config(SimulationConfig::from_env())
    }

    /// Initialize all dependencies from an explicit configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Store seeded with the simulated video
    /// * `Err(AppError::ConfigError)` - If the ledger limits are incoherent
    pub fn with_config(config: SimulationConfig) -> Result<Self, AppError> {
        info!(
            item_id = %config.item_id,
            voters = config.voters,
            rounds = config.rounds,
            soft_cap_bytes = config.ledger.soft_cap_bytes,
            hard_cap_bytes = config.ledger.hard_cap_bytes,
            legacy_count_fallback = config.ledger.legacy_count_fallback,
            "Initializing dependencies"
        );

        let documents = Arc::new(InMemoryDocumentStore::new());
        let mut record = FieldMap::new();
        record.insert(fields::TITLE.to_string(), format!("Video {}", config.item_id));
        record.insert(fields::LIKES.to_string(), "0".to_string());
        documents.insert_document(config.item_id.clone(), record);

        let ledger = LedgerStore::with_config(documents.clone(), config.ledger.clone())
            .map_err(|e| AppError::config(format!("Invalid ledger configuration: {}", e)))?;

        info!("Ledger store initialized");

        Ok(Self {
            documents,
            ledger: Arc::new(ledger),
            config,
        })
    }
}
