/// Partial update of the descriptive attributes of a video record.
///
/// Only fields that are `Some` are written; everything else on the record,
/// the like ledger in particular, is left untouched. A like count cannot be
/// expressed here: it is derived from the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadataUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub views: Option<u64>,
    pub verified: Option<bool>,
}

impl VideoMetadataUpdate {
    /// Returns `true` when no attribute would be written.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.views.is_none()
            && self.verified.is_none()
    }
}
