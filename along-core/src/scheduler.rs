//! Deferred delivery of state-setting effects.
//!
//! Every delayed action in the greeting (section reveals, caption swaps, hint
//! and toast expiry) goes through one [`Scheduler`]. Effects are plain values
//! describing an absolute state to set; the owner applies them when they come
//! out of the receiver. Cancelling the scheduler drops everything still
//! pending, so nothing reaches a torn-down session.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const LOG_TARGET: &str = "along::scheduler";

/// Schedules effects of type `E` for delivery after a delay.
pub struct Scheduler<E> {
    tx: mpsc::UnboundedSender<E>,
    cancel_token: CancellationToken,
    /// Runtime the scheduler was created on, if any
    runtime: Option<Handle>,
}

impl<E: Send + 'static> Scheduler<E> {
    /// Create a scheduler and the receiver its effects are delivered to.
    ///
    /// The scheduler stops delivering when `cancel_token` (or a parent of it)
    /// is cancelled. Timers run on the runtime current at construction, so
    /// effects can be scheduled from threads that have none.
    #[must_use]
    pub fn new(cancel_token: CancellationToken) -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runtime = Handle::try_current().ok();
        (
            Self {
                tx,
                cancel_token,
                runtime,
            },
            rx,
        )
    }

    /// Deliver `effect` after `delay`, unless cancelled first.
    ///
    /// Without a captured runtime this must be called from within one.
    pub fn schedule(&self, delay: Duration, effect: E) {
        if self.cancel_token.is_cancelled() {
            return;
        }

        let tx = self.tx.clone();
        let cancel_token = self.cancel_token.clone();
        let timer = async move {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    debug!(target: LOG_TARGET, "Dropped pending effect on cancellation");
                }
                () = tokio::time::sleep(delay) => {
                    if !cancel_token.is_cancelled() {
                        let _ = tx.send(effect);
                    }
                }
            }
        };

        match &self.runtime {
            Some(runtime) => drop(runtime.spawn(timer)),
            None => drop(tokio::spawn(timer)),
        }
    }

    /// Drop every pending effect and refuse new ones.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delivers_after_delay() {
        let (scheduler, mut rx) = Scheduler::new(CancellationToken::new());
        scheduler.schedule(Duration::from_millis(100), 7u32);

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivers_in_deadline_order() {
        let (scheduler, mut rx) = Scheduler::new(CancellationToken::new());
        scheduler.schedule(Duration::from_millis(300), "late");
        scheduler.schedule(Duration::from_millis(100), "early");

        assert_eq!(rx.recv().await, Some("early"));
        assert_eq!(rx.recv().await, Some("late"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (scheduler, mut rx) = Scheduler::new(CancellationToken::new());
        scheduler.schedule(Duration::from_millis(100), 1u8);
        scheduler.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert!(scheduler.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_after_cancel_is_ignored() {
        let (scheduler, mut rx) = Scheduler::new(CancellationToken::new());
        scheduler.cancel();
        scheduler.schedule(Duration::ZERO, 1u8);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_token_cancels() {
        let parent = CancellationToken::new();
        let (scheduler, mut rx) = Scheduler::new(parent.child_token());
        scheduler.schedule(Duration::from_millis(50), 1u8);
        parent.cancel();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
