//! The serialized like ledger.
//!
//! A ledger is a JSON array of voter identities stored in a single string
//! field. [`codec`] turns that field into a [`VoterSet`](video_likes_shared::VoterSet)
//! and back; [`eviction`] keeps the encoding under the configured byte ceiling.

pub mod codec;
pub mod eviction;

pub use codec::{decode, encode, encoded_voter_len, Decoded};
pub use eviction::{EvictionPolicy, Fitted};
