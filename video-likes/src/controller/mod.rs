//! Optimistic toggle controller.
//!
//! Drives a like button: the click is reflected immediately as a prediction,
//! then overwritten by the store's answer or rolled back on failure.

mod state;
mod toggle_controller;

pub use state::{ClickOutcome, ControllerState, LikeView};
pub use toggle_controller::ToggleController;
