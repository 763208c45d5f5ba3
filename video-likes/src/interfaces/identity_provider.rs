use async_trait::async_trait;

/// Source of the current voter identity.
///
/// Identities are opaque strings issued by the authentication layer.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in voter, or `None` when nobody is signed in.
    async fn current_voter(&self) -> Option<String>;
}

/// Identity provider that always reports the same voter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticIdentity {
    voter: Option<String>,
}

impl StaticIdentity {
    pub fn signed_in(voter: impl Into<String>) -> Self {
        Self {
            voter: Some(voter.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_voter(&self) -> Option<String> {
        self.voter.clone()
    }
}
