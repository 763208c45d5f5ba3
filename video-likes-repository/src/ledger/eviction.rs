use tracing::warn;
use video_likes_shared::VoterSet;

use super::codec::{encode, encoded_voter_len};
use crate::config::LedgerStoreConfig;
use crate::errors::LedgerError;

/// Encoded ledger that fits under the soft cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fitted {
    pub encoded: String,
    /// Number of voters forgotten to make it fit.
    pub evicted: usize,
}

/// Shrinks a voter set until its encoding fits the soft cap.
///
/// Shrinking walks a fixed ladder of target sizes, keeping the newest members
/// at each rung and re-checking the cap after every step. Rungs at or above
/// the current size are skipped. If identities are so long that even the last
/// rung does not fit, a final pass keeps the longest run of newest members
/// that does. The walk is bounded by the ladder length plus one linear pass.
///
/// Evicted voters lose their like silently: they no longer count and may like
/// again. The newest member is always the last to go, so a voter who just
/// liked is never evicted by their own toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionPolicy {
    soft_cap_bytes: usize,
    ladder: Vec<usize>,
}

impl EvictionPolicy {
    pub fn new(soft_cap_bytes: usize, ladder: Vec<usize>) -> Self {
        Self {
            soft_cap_bytes,
            ladder,
        }
    }

    pub fn from_config(config: &LedgerStoreConfig) -> Self {
        Self::new(config.soft_cap_bytes, config.eviction_ladder.clone())
    }

    pub fn soft_cap_bytes(&self) -> usize {
        self.soft_cap_bytes
    }

    /// Whether a ledger holding only `voter` fits under the cap.
    pub fn admits(&self, voter: &str) -> bool {
        encoded_voter_len(voter).saturating_add(2) <= self.soft_cap_bytes
    }

    /// Encode `set`, evicting its oldest members first if the encoding is too long.
    pub fn fit(&self, set: &mut VoterSet) -> Result<Fitted, LedgerError> {
        let mut encoded = encode(set)?;
        if encoded.len() <= self.soft_cap_bytes {
            return Ok(Fitted {
                encoded,
                evicted: 0,
            });
        }

        let original_len = set.len();
        let original_bytes = encoded.len();
        let mut evicted = 0;

        for &rung in &self.ladder {
            if rung >= set.len() {
                continue;
            }
            evicted += set.retain_newest(rung);
            encoded = encode(set)?;
            if encoded.len() <= self.soft_cap_bytes {
                warn!(
                    original_len,
                    original_bytes,
                    kept = set.len(),
                    evicted,
                    "Ledger exceeded soft cap, evicted oldest votes"
                );
                return Ok(Fitted { encoded, evicted });
            }
        }

        evicted += set.retain_newest(self.newest_fitting(set));
        encoded = encode(set)?;
        warn!(
            original_len,
            original_bytes,
            kept = set.len(),
            evicted,
            "Ledger exceeded soft cap below the last eviction rung, kept newest votes that fit"
        );
        Ok(Fitted { encoded, evicted })
    }

    /// Largest number of newest members whose encoding fits under the cap.
    fn newest_fitting(&self, set: &VoterSet) -> usize {
        let mut total = 2;
        let mut kept = 0;
        for voter in set.as_slice().iter().rev() {
            let separator = usize::from(kept > 0);
            let next = total + encoded_voter_len(voter) + separator;
            if next > self.soft_cap_bytes {
                break;
            }
            total = next;
            kept += 1;
        }
        kept
    }
}
