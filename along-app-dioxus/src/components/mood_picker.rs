use super::section_class;
use along_core::{Mood, SessionController};
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::warn;

const LOG_TARGET: &str = "along::ui";

/// "How are you today?" card with one button per mood.
#[component]
pub fn MoodPicker(revealed: bool) -> Element {
    let controller = use_context::<Arc<SessionController>>();

    let buttons = Mood::ALL.into_iter().map(|mood| {
        let controller = controller.clone();
        let key = mood.as_str();
        let class = format!("mood-button mood-{key}");
        let text = format!("{}\u{a0}\u{a0}{}", mood.icon(), mood.label());

        rsx! {
            button {
                key: "{key}",
                class: "{class}",
                onclick: move |_| {
                    let controller = controller.clone();
                    async move {
                        if let Err(e) = controller.select_mood(mood).await {
                            warn!(target: LOG_TARGET, "Ignored mood {mood}: {e}");
                        }
                    }
                },
                "{text}"
            }
        }
    });

    rsx! {
        div {
            class: section_class("mood fade", revealed),

            div {
                class: "card",
                p { class: "title", "trước khi nghe nha…" }
                p { class: "subline accent", "hôm nay bạn thế nào?" }
                div { class: "mood-list", {buttons} }
            }
        }
    }
}
