use serde::{Deserialize, Serialize};

/// Outcome of a single toggle, authoritative as of the moment the write succeeded.
///
/// `new_count` is the size of the ledger after any eviction, so it can differ
/// from what the caller predicted when other voters toggled concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub new_count: u64,
    pub is_liked: bool,
}

impl ToggleResult {
    pub fn new(new_count: u64, is_liked: bool) -> Self {
        Self {
            new_count,
            is_liked,
        }
    }
}

/// Like count and membership of one voter, as read from the store.
///
/// This seeds the resting state of the toggle controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub count: u64,
    pub is_liked: bool,
}

impl LikeState {
    pub fn new(count: u64, is_liked: bool) -> Self {
        Self { count, is_liked }
    }
}

impl From<ToggleResult> for LikeState {
    fn from(result: ToggleResult) -> Self {
        Self {
            count: result.new_count,
            is_liked: result.is_liked,
        }
    }
}
