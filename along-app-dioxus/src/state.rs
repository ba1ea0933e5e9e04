use along_core::{SessionController, SessionSnapshot};
use dioxus::prelude::*;

/// View state mirrored from the session controller.
///
/// The controller stays the single owner of session state; the view only
/// holds the latest snapshot it published.
#[derive(Clone, Copy)]
pub struct SessionView {
    pub snapshot: Signal<SessionSnapshot>,
}

impl SessionView {
    /// Create a view showing the initial, unrevealed intro
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: Signal::new(SessionSnapshot::default()),
        }
    }

    /// Replace the mirrored state with the controller's current snapshot
    pub async fn refresh(mut self, controller: &SessionController) {
        let snapshot = controller.snapshot().await;
        if *self.snapshot.peek() != snapshot {
            self.snapshot.set(snapshot);
        }
    }
}

impl Default for SessionView {
    fn default() -> Self {
        Self::new()
    }
}
