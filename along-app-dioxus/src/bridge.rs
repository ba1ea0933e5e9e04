use crate::media::{MediaCommand, MediaCommands, AUDIO_ELEMENT_ID};
use crate::state::SessionView;
use along_core::SessionController;
use dioxus::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "along::bridge";

/// Messages posted by the audio listener script
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum AudioSignal {
    Time {
        position: f64,
        /// `null` while the element does not know its duration yet
        #[serde(default)]
        duration: Option<f64>,
    },
    Ended,
}

/// Bridge session events to the view signal.
/// Every event re-reads the controller snapshot, so the view never renders a
/// half-applied transition.
pub fn use_session_bridge(controller: Arc<SessionController>, view: SessionView) {
    use_future(move || {
        let controller = controller.clone();
        async move {
            let mut rx = controller.subscribe();
            view.refresh(&controller).await;

            loop {
                match rx.recv().await {
                    Ok(_) => {
                        view.refresh(&controller).await;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                        info!(target: LOG_TARGET, "Session event channel closed");
                        break;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        info!(target: LOG_TARGET, "Missed {} session events", n);
                        view.refresh(&controller).await;
                    }
                }
            }
        }
    });
}

/// Execute media commands from the controller against the `<audio>` element.
pub fn use_media_commands(commands: MediaCommands) {
    use_future(move || {
        let commands = commands.clone();
        async move {
            while let Some(command) = commands.recv().await {
                debug!(target: LOG_TARGET, "Media command: {:?}", command);
                match command {
                    MediaCommand::Play { reply } => {
                        let accepted = matches!(
                            run_script(&play_script()).await,
                            Some(serde_json::Value::Bool(true))
                        );
                        let _ = reply.send(accepted);
                    }
                    MediaCommand::Pause => {
                        run_script(&pause_script()).await;
                    }
                    MediaCommand::Seek { position } => {
                        run_script(&seek_script(position)).await;
                    }
                }
            }
            info!(target: LOG_TARGET, "Media command channel closed");
        }
    });
}

/// Feed position updates and end-of-media from the `<audio>` element into the
/// controller.
pub fn use_audio_listener(controller: Arc<SessionController>) {
    use_future(move || {
        let controller = controller.clone();
        async move {
            let mut eval = document::eval(&listener_script());

            loop {
                match eval.recv::<AudioSignal>().await {
                    Ok(AudioSignal::Time { position, duration }) => {
                        controller
                            .on_position_secs(position, duration.unwrap_or(f64::NAN))
                            .await;
                    }
                    Ok(AudioSignal::Ended) => {
                        controller.on_ended().await;
                    }
                    Err(e) => {
                        warn!(target: LOG_TARGET, "Audio listener stopped: {}", e);
                        break;
                    }
                }
            }
        }
    });
}

async fn run_script(js: &str) -> Option<serde_json::Value> {
    match document::eval(js).await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(target: LOG_TARGET, "Audio script failed: {}", e);
            None
        }
    }
}

/// Resolves to `true` if the element started playing
fn play_script() -> String {
    format!(
        r#"
        const audio = document.getElementById("{AUDIO_ELEMENT_ID}");
        if (!audio) {{
            return false;
        }}
        try {{
            await audio.play();
            return true;
        }} catch (e) {{
            console.warn("play() rejected", e);
            return false;
        }}
        "#
    )
}

fn pause_script() -> String {
    format!(
        r#"
        const audio = document.getElementById("{AUDIO_ELEMENT_ID}");
        if (audio) {{
            audio.pause();
        }}
        return null;
        "#
    )
}

fn seek_script(position: Duration) -> String {
    let secs = position.as_secs_f64();
    format!(
        r#"
        const audio = document.getElementById("{AUDIO_ELEMENT_ID}");
        if (audio) {{
            audio.currentTime = {secs};
        }}
        return null;
        "#
    )
}

/// Waits for the element to mount, then forwards its events until the page
/// goes away.
fn listener_script() -> String {
    format!(
        r#"
        let audio = document.getElementById("{AUDIO_ELEMENT_ID}");
        while (!audio) {{
            await new Promise((resolve) => setTimeout(resolve, 50));
            audio = document.getElementById("{AUDIO_ELEMENT_ID}");
        }}
        const duration = () => (Number.isFinite(audio.duration) ? audio.duration : null);
        audio.addEventListener("timeupdate", () => {{
            dioxus.send({{ kind: "time", position: audio.currentTime, duration: duration() }});
        }});
        audio.addEventListener("ended", () => {{
            dioxus.send({{ kind: "ended" }});
        }});
        await new Promise(() => {{}});
        "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_signal_with_unknown_duration() {
        let signal: AudioSignal =
            serde_json::from_str(r#"{"kind":"time","position":1.5,"duration":null}"#).unwrap();
        match signal {
            AudioSignal::Time { position, duration } => {
                assert!((position - 1.5).abs() < f64::EPSILON);
                assert!(duration.is_none());
            }
            AudioSignal::Ended => panic!("expected a time signal"),
        }
    }

    #[test]
    fn test_ended_signal() {
        let signal: AudioSignal = serde_json::from_str(r#"{"kind":"ended"}"#).unwrap();
        assert!(matches!(signal, AudioSignal::Ended));
    }

    #[test]
    fn test_seek_script_targets_audio_element() {
        let js = seek_script(Duration::from_millis(2500));
        assert!(js.contains(AUDIO_ELEMENT_ID));
        assert!(js.contains("audio.currentTime = 2.5;"));
    }
}
