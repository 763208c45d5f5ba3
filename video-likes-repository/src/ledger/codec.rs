use video_likes_shared::VoterSet;

use crate::errors::LedgerError;

/// Result of decoding the raw ledger field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The field is missing or blank.
    Absent,
    /// The field holds a JSON array of strings.
    Parsed(VoterSet),
    /// The field holds something else. Carries the parser's message.
    Unparseable(String),
}

impl Decoded {
    /// The decoded set, or an empty one if there is nothing usable.
    pub fn into_set(self) -> VoterSet {
        match self {
            Self::Parsed(set) => set,
            Self::Absent | Self::Unparseable(_) => VoterSet::new(),
        }
    }
}

/// Decode the raw value of the ledger field.
pub fn decode(raw: Option<&str>) -> Decoded {
    match raw.map(str::trim) {
        None | Some("") => Decoded::Absent,
        Some(raw) => match serde_json::from_str::<VoterSet>(raw) {
            Ok(set) => Decoded::Parsed(set),
            Err(e) => Decoded::Unparseable(e.to_string()),
        },
    }
}

/// Encode a voter set as the compact JSON array stored in the ledger field.
pub fn encode(set: &VoterSet) -> Result<String, LedgerError> {
    serde_json::to_string(set.as_slice())
        .map_err(|e| LedgerError::unknown(format!("failed to encode ledger: {e}")))
}

/// Bytes one identity occupies inside the encoded array, quotes and escapes included.
pub fn encoded_voter_len(voter: &str) -> usize {
    serde_json::to_string(voter)
        .map(|s| s.len())
        .unwrap_or(usize::MAX)
}
