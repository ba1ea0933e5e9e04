//! The audio resource driven by the controller.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Playback operations on the single audio resource.
///
/// The controller is the only caller. Position updates and end-of-media travel
/// the other way, as calls to
/// [`SessionController::on_position`](crate::SessionController::on_position) and
/// [`SessionController::on_ended`](crate::SessionController::on_ended).
///
/// Implementations must not call back into the controller from these methods.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Start or resume playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses playback (missing resource,
    /// autoplay policy). The controller treats this as non-fatal.
    async fn play(&self) -> Result<()>;

    /// Pause playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is no longer reachable.
    async fn pause(&self) -> Result<()>;

    /// Move the playback position.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is no longer reachable.
    async fn seek(&self, position: Duration) -> Result<()>;
}
