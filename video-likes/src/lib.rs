//! # Video Likes
//!
//! Client side of the like ledger: the optimistic toggle controller that backs
//! a like button, plus the wiring used by the local simulation binary.
//!
//! ## Architecture
//!
//! 1. **Identity**: tells the controller who is clicking, if anyone
//! 2. **Controller**: predicts the toggle, then reconciles or rolls back
//! 3. **Toggler**: the authoritative ledger store behind the controller
//! 4. **Simulation**: drives many controllers against one video concurrently
//!
//! ## Modules
//!
//! - [`config`]: Environment configuration and dependency initialization
//! - [`controller`]: Optimistic toggle controller and its state machine
//! - [`interfaces`]: Collaborator traits the controller depends on
//! - [`simulation`]: Concurrent toggle simulation
//! - [`errors`]: User-facing error states and application errors

pub mod config;
pub mod controller;
pub mod errors;
pub mod interfaces;
pub mod simulation;

pub use config::{Dependencies, SimulationConfig};
pub use controller::{ClickOutcome, ControllerState, LikeView, ToggleController};
pub use errors::{AppError, ErrorState, RejectReason};
pub use interfaces::{IdentityProvider, LikeToggler, StaticIdentity};
pub use simulation::{Simulation, SimulationReport};
