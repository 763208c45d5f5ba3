use serde::{Deserialize, Serialize};

/// The set of voter identities who currently like a video.
///
/// Members are kept in insertion order, oldest first. That order is what the
/// eviction policy relies on when the serialized ledger outgrows its field, so
/// a voter who likes again after unliking moves to the newest end.
///
/// Deserializing a list that contains the same identity more than once keeps
/// only its first occurrence.
///
/// `==` compares members and their order, which is what the stored encoding
/// depends on. Use [`same_members`](Self::same_members) to compare as sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct VoterSet {
    voters: Vec<String>,
}

impl VoterSet {
    /// Create an empty voter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from identities in insertion order, dropping duplicates.
    pub fn from_voters<I, S>(voters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for voter in voters {
            set.insert(voter.into());
        }
        set
    }

    pub fn contains(&self, voter: &str) -> bool {
        self.voters.iter().any(|v| v == voter)
    }

    /// Append `voter` as the newest member.
    ///
    /// Returns `false` and leaves the set untouched if the voter is already a member.
    pub fn insert(&mut self, voter: impl Into<String>) -> bool {
        let voter = voter.into();
        if self.contains(&voter) {
            return false;
        }
        self.voters.push(voter);
        true
    }

    /// Remove `voter`, keeping the relative order of everyone else.
    ///
    /// Returns `true` if the voter was a member.
    pub fn remove(&mut self, voter: &str) -> bool {
        let before = self.voters.len();
        self.voters.retain(|v| v != voter);
        self.voters.len() != before
    }

    /// Flip the membership of `voter` and return whether they are a member afterwards.
    ///
    /// Applying the same toggle twice restores the original set.
    pub fn toggle(&mut self, voter: &str) -> bool {
        if self.remove(voter) {
            false
        } else {
            self.voters.push(voter.to_string());
            true
        }
    }

    /// Keep only the `count` newest members and return how many were dropped.
    pub fn retain_newest(&mut self, count: usize) -> usize {
        let excess = self.voters.len().saturating_sub(count);
        if excess > 0 {
            self.voters.drain(..excess);
        }
        excess
    }

    /// Whether both sets hold the same voters, in any order.
    pub fn same_members(&self, other: &VoterSet) -> bool {
        self.len() == other.len() && self.iter().all(|voter| other.contains(voter))
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Members in insertion order, oldest first.
    pub fn as_slice(&self) -> &[String] {
        &self.voters
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.voters.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for VoterSet {
    fn from(voters: Vec<String>) -> Self {
        Self::from_voters(voters)
    }
}

impl From<VoterSet> for Vec<String> {
    fn from(set: VoterSet) -> Self {
        set.voters
    }
}

impl<S: Into<String>> FromIterator<S> for VoterSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_voters(iter)
    }
}
