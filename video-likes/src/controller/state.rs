use video_likes_shared::{LikeState, ToggleResult};

use crate::errors::ErrorState;

/// Lifecycle of one like button.
///
/// `Reconciled` and `RolledBack` are resting states just like `Idle`: the next
/// click predicts from the values they hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Last authoritative read.
    Idle { count: u64, is_liked: bool },
    /// A toggle is in flight; the predicted values are on screen.
    Predicting {
        predicted_count: u64,
        predicted_is_liked: bool,
        previous_count: u64,
        previous_is_liked: bool,
    },
    /// The store's answer replaced the prediction.
    Reconciled { count: u64, is_liked: bool },
    /// The toggle failed; the values from before the click are restored.
    RolledBack { count: u64, is_liked: bool },
}

impl ControllerState {
    pub fn idle(state: LikeState) -> Self {
        Self::Idle {
            count: state.count,
            is_liked: state.is_liked,
        }
    }

    /// Predict the outcome of toggling from `previous`.
    pub fn predict(previous: LikeState) -> Self {
        let (predicted_count, predicted_is_liked) = if previous.is_liked {
            (previous.count.saturating_sub(1), false)
        } else {
            (previous.count.saturating_add(1), true)
        };
        Self::Predicting {
            predicted_count,
            predicted_is_liked,
            previous_count: previous.count,
            previous_is_liked: previous.is_liked,
        }
    }

    pub fn reconciled(result: ToggleResult) -> Self {
        Self::Reconciled {
            count: result.new_count,
            is_liked: result.is_liked,
        }
    }

    /// Restore the values held before the prediction.
    ///
    /// A state that is not predicting has nothing to undo and is returned as is.
    pub fn rolled_back(self) -> Self {
        match self {
            Self::Predicting {
                previous_count,
                previous_is_liked,
                ..
            } => Self::RolledBack {
                count: previous_count,
                is_liked: previous_is_liked,
            },
            other => other,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Predicting { .. })
    }

    /// Values the button shows in this state.
    pub fn displayed(&self) -> LikeState {
        match *self {
            Self::Idle { count, is_liked }
            | Self::Reconciled { count, is_liked }
            | Self::RolledBack { count, is_liked } => LikeState::new(count, is_liked),
            Self::Predicting {
                predicted_count,
                predicted_is_liked,
                ..
            } => LikeState::new(predicted_count, predicted_is_liked),
        }
    }
}

/// What the like button renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeView {
    pub count: u64,
    pub is_liked: bool,
    /// Dismissible notice about the last failure.
    pub error: Option<ErrorState>,
}

impl LikeView {
    pub fn new(state: &ControllerState, error: Option<ErrorState>) -> Self {
        let displayed = state.displayed();
        Self {
            count: displayed.count,
            is_liked: displayed.is_liked,
            error,
        }
    }
}

/// How a click was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The store answered; its result is now displayed.
    Reconciled(ToggleResult),
    /// The toggle failed and the prediction was undone.
    RolledBack(ErrorState),
    /// Nobody is signed in; nothing was sent.
    NotAuthenticated,
    /// A toggle for this video is already in flight; the click was ignored.
    InFlight,
    /// The controller was unmounted; the response, if any, was dropped.
    Discarded,
}
