//! # Video Likes Shared
//!
//! This crate defines the data structures shared by the likes ledger store and
//! the optimistic toggle controller: the voter set itself, the values a toggle
//! or a read hands back, and the names of the record fields the ledger lives in.

pub mod fields;
pub mod types;

pub use types::{LikeState, ToggleResult, VideoMetadataUpdate, VoterSet};
