//! Collaborator interfaces for the toggle controller.
//!
//! The controller never talks to the authentication layer or the ledger store
//! directly; it goes through these traits so tests can substitute mocks.

mod identity_provider;
mod like_toggler;

pub use identity_provider::{IdentityProvider, StaticIdentity};
pub use like_toggler::LikeToggler;
