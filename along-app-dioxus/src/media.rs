//! The webview `<audio>` element seen from the session controller.
//!
//! The controller lives on the background runtime while the element can only
//! be reached through `document::eval` on the UI side. [`ChannelMedia`] turns
//! each trait call into a [`MediaCommand`] that the UI drains in
//! [`crate::bridge::use_media_commands`].

use along_core::{CoreError, MediaElement, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};

/// DOM id of the audio element rendered by the app
pub const AUDIO_ELEMENT_ID: &str = "along-audio";

#[derive(Debug)]
pub enum MediaCommand {
    /// Start playback; the reply carries whether the webview accepted it
    Play { reply: oneshot::Sender<bool> },
    Pause,
    Seek { position: Duration },
}

/// [`MediaElement`] backed by a command channel to the UI
pub struct ChannelMedia {
    tx: mpsc::UnboundedSender<MediaCommand>,
}

/// Receiving end handed to the UI through context
#[derive(Clone)]
pub struct MediaCommands {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<MediaCommand>>>,
}

impl ChannelMedia {
    #[must_use]
    pub fn new() -> (Self, MediaCommands) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self { tx },
            MediaCommands {
                rx: Arc::new(Mutex::new(rx)),
            },
        )
    }

    fn send(&self, command: MediaCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| CoreError::MediaDetached)
    }
}

impl MediaCommands {
    /// Wait for the next command, or `None` once every sender is gone
    pub async fn recv(&self) -> Option<MediaCommand> {
        self.rx.lock().await.recv().await
    }
}

#[async_trait]
impl MediaElement for ChannelMedia {
    async fn play(&self) -> Result<()> {
        let (reply, accepted) = oneshot::channel();
        self.send(MediaCommand::Play { reply })?;

        match accepted.await {
            Ok(true) => Ok(()),
            Ok(false) => Err(CoreError::PlaybackFailed {
                reason: "the webview refused to start the audio".into(),
            }),
            Err(_) => Err(CoreError::MediaDetached),
        }
    }

    async fn pause(&self) -> Result<()> {
        self.send(MediaCommand::Pause)
    }

    async fn seek(&self, position: Duration) -> Result<()> {
        self.send(MediaCommand::Seek { position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_play_reports_acceptance() {
        let (media, commands) = ChannelMedia::new();
        let ui = tokio::spawn(async move {
            if let Some(MediaCommand::Play { reply }) = commands.recv().await {
                let _ = reply.send(true);
            }
        });

        assert!(media.play().await.is_ok());
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn test_play_refused() {
        let (media, commands) = ChannelMedia::new();
        tokio::spawn(async move {
            if let Some(MediaCommand::Play { reply }) = commands.recv().await {
                let _ = reply.send(false);
            }
        });

        assert!(matches!(
            media.play().await,
            Err(CoreError::PlaybackFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_detached_when_ui_is_gone() {
        let (media, commands) = ChannelMedia::new();
        drop(commands);

        assert!(matches!(media.pause().await, Err(CoreError::MediaDetached)));
        assert!(matches!(media.play().await, Err(CoreError::MediaDetached)));
    }

    #[tokio::test]
    async fn test_seek_forwards_position() {
        let (media, commands) = ChannelMedia::new();
        media.seek(Duration::from_secs(3)).await.unwrap();

        match commands.recv().await {
            Some(MediaCommand::Seek { position }) => {
                assert_eq!(position, Duration::from_secs(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
