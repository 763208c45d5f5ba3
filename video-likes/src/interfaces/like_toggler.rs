use async_trait::async_trait;
use video_likes_repository::{LedgerError, LedgerStore};
use video_likes_shared::{LikeState, ToggleResult};

/// Authoritative like operations the controller relies on.
#[async_trait]
pub trait LikeToggler: Send + Sync {
    /// Flip `voter_id`'s like on `item_id` and return the stored outcome.
    async fn toggle(&self, item_id: &str, voter_id: &str) -> Result<ToggleResult, LedgerError>;

    /// Read the current count and, if a voter is given, their membership.
    async fn current_state(
        &self,
        item_id: &str,
        voter_id: Option<&str>,
    ) -> Result<LikeState, LedgerError>;
}

#[async_trait]
impl LikeToggler for LedgerStore {
    async fn toggle(&self, item_id: &str, voter_id: &str) -> Result<ToggleResult, LedgerError> {
        LedgerStore::toggle(self, item_id, voter_id).await
    }

    async fn current_state(
        &self,
        item_id: &str,
        voter_id: Option<&str>,
    ) -> Result<LikeState, LedgerError> {
        self.read_state(item_id, voter_id).await
    }
}
