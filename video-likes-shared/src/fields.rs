//! Field names on a video record.
//!
//! The document store is schemaless from the ledger's point of view, so every
//! field the ledger reads or writes is named here once.

/// JSON array of voter identities who currently like the video.
pub const LIKED_BY: &str = "likedBy";

/// Legacy numeric like count, stored as a decimal string.
pub const LIKES: &str = "likes";

/// RFC 3339 timestamp of the last mutation.
pub const UPDATED_AT: &str = "updatedAt";

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const VIEWS: &str = "views";
pub const VERIFIED: &str = "verified";
