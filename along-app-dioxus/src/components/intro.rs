use super::section_class;
use along_core::{MediaConfig, Recipient, SessionController};
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::warn;

const LOG_TARGET: &str = "along::ui";

/// Greeting card addressed to the recipient, leading to the mood picker.
#[component]
pub fn IntroCard(revealed: bool) -> Element {
    let controller = use_context::<Arc<SessionController>>();
    let recipient = use_context::<Recipient>();
    let media = use_context::<MediaConfig>();

    let name = recipient.name().to_string();
    let cover = media.cover_image;

    let on_start = move |_: MouseEvent| {
        let controller = controller.clone();
        async move {
            if let Err(e) = controller.go_to_mood().await {
                warn!(target: LOG_TARGET, "Ignored start: {e}");
            }
        }
    };

    rsx! {
        div {
            class: section_class("intro bounce", revealed),

            div {
                class: "card",
                img { class: "cover", src: "{cover}", alt: "BMO playing music" }
                p { class: "addressed", "Gửi cho " strong { "{name}" } " 💛" }
                p { class: "headline", "Ê bạn ơi 👋" }
                p { class: "subline", "mình gửi bạn một vòng nhạc nè" }
                button {
                    class: "primary-button",
                    onclick: on_start,
                    "🎧 Nghe cùng mình"
                }
            }
            p { class: "floating-note", "♪ come along with me ♪" }
        }
    }
}
