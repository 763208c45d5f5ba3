//! Concurrent toggle simulation.
//!
//! Every simulated voter gets its own controller on the same video, as if each
//! had the page open in a separate browser, and clicks the like button a fixed
//! number of times. All voters click concurrently. Afterwards the ledger count
//! is compared with the number of voters whose last confirmed state is liked.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;
use video_likes_repository::LedgerStore;

use crate::config::SimulationConfig;
use crate::controller::{ClickOutcome, ToggleController};
use crate::errors::AppError;
use crate::interfaces::{IdentityProvider, LikeToggler, StaticIdentity};

/// Outcome of one voter's clicks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct VoterTally {
    toggles: usize,
    rolled_back: usize,
    ends_liked: bool,
}

/// Summary of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationReport {
    pub voters: usize,
    /// Clicks the store confirmed.
    pub toggles: usize,
    /// Clicks that failed and were rolled back.
    pub rolled_back: usize,
    /// Voters whose last confirmed state is liked.
    pub expected_likes: u64,
    /// Like count read back from the store.
    pub final_count: u64,
}

impl SimulationReport {
    /// Whether no toggle was lost.
    pub fn is_consistent(&self) -> bool {
        self.expected_likes == self.final_count
    }
}

/// Drives many controllers against one video.
pub struct Simulation {
    ledger: Arc<LedgerStore>,
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(ledger: Arc<LedgerStore>, config: SimulationConfig) -> Self {
        Self { ledger, config }
    }

    /// Run the simulation to completion.
    ///
    /// # Returns
    ///
    /// * `Ok(SimulationReport)` - Tallies and the final stored count
    /// * `Err(AppError::LedgerError)` - If the initial or final read fails
    /// * `Err(AppError::TaskError)` - If a voter task panicked
    pub async fn run(&self) -> Result<SimulationReport, AppError> {
        info!(
            item_id = %self.config.item_id,
            voters = self.config.voters,
            rounds = self.config.rounds,
            "Starting simulation"
        );

        let handles = (0..self.config.voters).map(|_| {
            let toggler: Arc<dyn LikeToggler> = self.ledger.clone();
            let identity: Arc<dyn IdentityProvider> =
                Arc::new(StaticIdentity::signed_in(Uuid::new_v4().to_string()));
            let item_id = self.config.item_id.clone();
            let rounds = self.config.rounds;
            tokio::spawn(async move { Self::run_voter(item_id, toggler, identity, rounds).await })
        });

        let mut report = SimulationReport {
            voters: self.config.voters,
            toggles: 0,
            rolled_back: 0,
            expected_likes: 0,
            final_count: 0,
        };

        for joined in join_all(handles).await {
            let tally = joined.map_err(|e| AppError::TaskError(e.to_string()))??;
            report.toggles += tally.toggles;
            report.rolled_back += tally.rolled_back;
            if tally.ends_liked {
                report.expected_likes += 1;
            }
        }

        report.final_count = self
            .ledger
            .read_state(&self.config.item_id, None)
            .await?
            .count;

        if report.is_consistent() {
            info!(
                toggles = report.toggles,
                rolled_back = report.rolled_back,
                final_count = report.final_count,
                "Simulation finished"
            );
        } else {
            warn!(
                expected_likes = report.expected_likes,
                final_count = report.final_count,
                "Simulation finished with a count mismatch"
            );
        }

        Ok(report)
    }

    async fn run_voter(
        item_id: String,
        toggler: Arc<dyn LikeToggler>,
        identity: Arc<dyn IdentityProvider>,
        rounds: usize,
    ) -> Result<VoterTally, AppError> {
        let controller = ToggleController::load(item_id, toggler, identity).await?;
        let mut tally = VoterTally {
            ends_liked: controller.view().is_liked,
            ..VoterTally::default()
        };

        for _ in 0..rounds {
            match controller.on_click().await {
                ClickOutcome::Reconciled(result) => {
                    tally.toggles += 1;
                    tally.ends_liked = result.is_liked;
                }
                ClickOutcome::RolledBack(error) => {
                    tally.rolled_back += 1;
                    debug!(item_id = %controller.item_id(), error = %error, "Click rolled back");
                }
                other => debug!(item_id = %controller.item_id(), outcome = ?other, "Click not sent"),
            }
        }

        controller.unmount();
        Ok(tally)
    }
}
