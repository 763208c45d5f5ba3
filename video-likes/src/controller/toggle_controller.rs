use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};
use video_likes_repository::LedgerError;
use video_likes_shared::LikeState;

use super::state::{ClickOutcome, ControllerState, LikeView};
use crate::errors::ErrorState;
use crate::interfaces::{IdentityProvider, LikeToggler};

struct Inner {
    state: ControllerState,
    error: Option<ErrorState>,
}

/// Like button controller for one video in one UI session.
///
/// A click flips the displayed values at once, sends the toggle, and then
/// either replaces the prediction with the store's result (even when it
/// differs, e.g. because another voter toggled meanwhile) or restores the
/// values from before the click. Only one toggle per controller is in flight
/// at a time; clicks that arrive meanwhile are ignored.
///
/// The rendered values are published on a `watch` channel, see [`subscribe`](Self::subscribe).
///
/// # Example
///
/// ```ignore
/// let controller = ToggleController::load("video-1", ledger, identity).await?;
/// let mut view = controller.subscribe();
///
/// controller.on_click().await;
/// println!("{} likes", view.borrow_and_update().count);
/// ```
pub struct ToggleController {
    item_id: String,
    toggler: Arc<dyn LikeToggler>,
    identity: Arc<dyn IdentityProvider>,
    inner: Mutex<Inner>,
    view: watch::Sender<LikeView>,
    mounted: AtomicBool,
}

impl ToggleController {
    /// Create a controller resting on an already known state.
    pub fn new(
        item_id: impl Into<String>,
        initial: LikeState,
        toggler: Arc<dyn LikeToggler>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let state = ControllerState::idle(initial);
        let (view, _) = watch::channel(LikeView::new(&state, None));
        Self {
            item_id: item_id.into(),
            toggler,
            identity,
            inner: Mutex::new(Inner { state, error: None }),
            view,
            mounted: AtomicBool::new(true),
        }
    }

    /// Create a controller seeded from the store's current state for the current voter.
    pub async fn load(
        item_id: impl Into<String>,
        toggler: Arc<dyn LikeToggler>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, LedgerError> {
        let item_id = item_id.into();
        let voter = identity.current_voter().await;
        let initial = toggler.current_state(&item_id, voter.as_deref()).await?;
        debug!(item_id = %item_id, count = initial.count, is_liked = initial.is_liked, "Like state loaded");
        Ok(Self::new(item_id, initial, toggler, identity))
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Receiver for the rendered `(count, is_liked, error)` values.
    pub fn subscribe(&self) -> watch::Receiver<LikeView> {
        self.view.subscribe()
    }

    /// Currently rendered values.
    pub fn view(&self) -> LikeView {
        self.view.borrow().clone()
    }

    pub async fn state(&self) -> ControllerState {
        self.inner.lock().await.state
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Detach from the view. A toggle still in flight completes, but its
    /// result is dropped and nothing is published afterwards.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Handle a click on the like button.
    pub async fn on_click(&self) -> ClickOutcome {
        if !self.is_mounted() {
            return ClickOutcome::Discarded;
        }

        let Some(voter) = self
            .identity
            .current_voter()
            .await
            .filter(|voter| !voter.trim().is_empty())
        else {
            let mut inner = self.inner.lock().await;
            if !inner.state.is_in_flight() {
                inner.error = Some(ErrorState::NotAuthenticated);
                self.publish(&inner);
            }
            return ClickOutcome::NotAuthenticated;
        };

        {
            let mut inner = self.inner.lock().await;
            if inner.state.is_in_flight() {
                debug!(item_id = %self.item_id, "Toggle already in flight, ignoring click");
                return ClickOutcome::InFlight;
            }
            inner.state = ControllerState::predict(inner.state.displayed());
            inner.error = None;
            self.publish(&inner);
        }

        let result = self.toggler.toggle(&self.item_id, &voter).await;

        if !self.is_mounted() {
            debug!(item_id = %self.item_id, "Controller unmounted, discarding toggle response");
            return ClickOutcome::Discarded;
        }

        let mut inner = self.inner.lock().await;
        let outcome = match result {
            Ok(result) => {
                inner.state = ControllerState::reconciled(result);
                inner.error = None;
                ClickOutcome::Reconciled(result)
            }
            Err(e) => {
                let error_state = ErrorState::from(&e);
                warn!(item_id = %self.item_id, error = %e, "Like toggle failed, rolling back");
                inner.state = inner.state.rolled_back();
                inner.error = Some(error_state.clone());
                ClickOutcome::RolledBack(error_state)
            }
        };
        self.publish(&inner);
        outcome
    }

    /// Re-issue the click after a retryable failure.
    ///
    /// Returns `None` when the last failure is not retryable or nothing failed.
    pub async fn retry(&self) -> Option<ClickOutcome> {
        let retryable = {
            let inner = self.inner.lock().await;
            inner.error.as_ref().is_some_and(ErrorState::is_retryable)
        };
        if !retryable {
            return None;
        }
        Some(self.on_click().await)
    }

    /// Clear the error notice.
    pub async fn dismiss_error(&self) {
        let mut inner = self.inner.lock().await;
        if inner.error.take().is_some() {
            self.publish(&inner);
        }
    }

    fn publish(&self, inner: &Inner) {
        if self.is_mounted() {
            self.view
                .send_replace(LikeView::new(&inner.state, inner.error.clone()));
        }
    }
}
