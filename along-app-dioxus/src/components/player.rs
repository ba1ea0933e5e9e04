use super::section_class;
use along_core::{MediaConfig, SessionController, SessionSnapshot};
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::warn;

const LOG_TARGET: &str = "along::ui";

/// Shown in place of a caption while the song plays before the first cue
const MUSIC_PLACEHOLDER: &str = "♪ ♪ ♪";

/// Width of the cosmetic progress bar fill
fn progress_width(progress: f64) -> String {
    format!("width: {:.2}%;", progress.clamp(0.0, 1.0) * 100.0)
}

/// Spinning disc, progress, controls and the synced caption.
#[component]
pub fn Player(snapshot: SessionSnapshot) -> Element {
    let controller = use_context::<Arc<SessionController>>();
    let media = use_context::<MediaConfig>();
    let disc = media.disc_image;

    let toggle_controller = controller.clone();
    let on_toggle = move |_: MouseEvent| {
        let controller = toggle_controller.clone();
        async move {
            if let Err(e) = controller.toggle_play().await {
                warn!(target: LOG_TARGET, "Ignored play/pause: {e}");
            }
        }
    };

    let on_replay = move |_: MouseEvent| {
        let controller = controller.clone();
        async move {
            if let Err(e) = controller.replay().await {
                warn!(target: LOG_TARGET, "Ignored replay: {e}");
            }
        }
    };

    let playing = snapshot.playing;
    let play_state = if playing { "running" } else { "paused" };
    let progress_style = progress_width(snapshot.progress);
    let play_icon = if playing { "⏸" } else { "▶" };
    let play_label = if playing { "Tạm dừng" } else { "Phát" };

    let mood_intro = snapshot.mood.map(|mood| {
        let lines = mood.intro_lines().iter().enumerate().map(|(i, line)| {
            let delay = format!("animation-delay: {}ms;", i * 400);
            rsx! {
                p { key: "{i}", class: "mood-line", style: "{delay}", "{line}" }
            }
        });
        rsx! {
            div {
                class: if snapshot.mood_intro_visible { "mood-intro" } else { "mood-intro hidden" },
                {lines}
            }
        }
    });

    let hint = (!snapshot.hint.is_empty()).then(|| {
        let text = snapshot.hint.clone();
        rsx! {
            p { key: "{text}", class: "micro-hint", "{text}" }
        }
    });

    let caption = match (snapshot.active_cue, snapshot.caption.clone()) {
        (Some(index), Some(text)) => Some(rsx! {
            p {
                key: "{index}",
                class: if snapshot.caption_visible { "caption" } else { "caption hidden" },
                "{text}"
            }
        }),
        _ if playing => Some(rsx! {
            p { class: "caption-placeholder", "{MUSIC_PLACEHOLDER}" }
        }),
        _ => None,
    };

    rsx! {
        div {
            class: section_class("player fade", snapshot.revealed),

            {mood_intro}

            div {
                class: "disc-wrap",
                div { class: if playing { "disc-glow pulsing" } else { "disc-glow" } }
                div {
                    class: "disc",
                    style: "animation-play-state: {play_state};",
                    img { src: "{disc}", alt: "Vinyl disc" }
                    div { class: "disc-hole" }
                }
            }

            div {
                class: "progress",
                div { class: "progress-fill", style: "{progress_style}" }
            }

            div {
                class: "controls",
                button {
                    class: "play-button",
                    aria_label: "{play_label}",
                    onclick: on_toggle,
                    "{play_icon}"
                }
                button {
                    class: "replay-button",
                    aria_label: "Nghe lại",
                    onclick: on_replay,
                    "↺"
                }
            }

            {hint}

            div { class: "caption-area", {caption} }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_width_is_clamped() {
        assert_eq!(progress_width(0.5), "width: 50.00%;");
        assert_eq!(progress_width(1.7), "width: 100.00%;");
        assert_eq!(progress_width(-0.2), "width: 0.00%;");
    }
}
