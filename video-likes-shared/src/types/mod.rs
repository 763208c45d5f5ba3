//! This module defines the core data structures used across the likes ledger.
//! It re-exports the voter set, the toggle and read results, and metadata updates.

mod like_state;
mod video_metadata;
mod voter_set;

pub use like_state::{LikeState, ToggleResult};
pub use video_metadata::VideoMetadataUpdate;
pub use voter_set::VoterSet;
