use super::section_class;
use along_core::SessionController;
use dioxus::prelude::*;
use std::sync::Arc;
use tracing::warn;

const LOG_TARGET: &str = "along::ui";

const CLOSING_NOTE: &str = "hôm qua tự nhiên mình nghĩ mai Valentine, cơ mà mình không có ai \
để đi cùng, và nghĩ ra Who with me, rồi nhớ ra câu along with me, và ngạc nhiên chưa, Come \
along with me? Một bài hát trong Adventure Time, bộ phim hoạt hình mình yêu thích, lâu lâu \
nghe nó mình cứ thấy muốn khóc á. \"All of my collection, I share them all with you\". Cảm \
ơn bạn đã vẫn còn ở đây lắng nghe mình và chia sẻ câu chuyện của bạn.";

const CLOSING_CODE: &str = "49 2019 6D 20 6E 6F 74 20 73 75 72 65 20 68 6F 77 20 49 20 66 65 \
65 6C 2026 20 6D 61 79 62 65 20 49 20 6C 69 6B 65 20 79 6F 75 2E";

/// Thank-you card shown after the song, with a way back in.
#[component]
pub fn EndingCard(revealed: bool) -> Element {
    let controller = use_context::<Arc<SessionController>>();

    let on_replay = move |_: MouseEvent| {
        let controller = controller.clone();
        async move {
            if let Err(e) = controller.replay().await {
                warn!(target: LOG_TARGET, "Ignored replay: {e}");
            }
        }
    };

    rsx! {
        div {
            class: section_class("ending bounce", revealed),

            div {
                class: "card card-mint",
                p { class: "tulip", "🌷" }
                p { class: "thanks", "cảm ơn vì đã nghe tới đây 🌷" }
                p {
                    class: "closing",
                    "{CLOSING_NOTE}"
                    br {}
                    br {}
                    "{CLOSING_CODE}"
                }
                button {
                    class: "outline-button",
                    onclick: on_replay,
                    "↻ Nghe lại ko"
                }
            }
            p { class: "footer-note", "made with gentle love 🌼" }
        }
    }
}
